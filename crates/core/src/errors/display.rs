//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Environment {
                variable,
                value,
                message,
            } => {
                write!(
                    f,
                    "environment variable '{variable}' has invalid value '{value}': {message}"
                )
            }
        }
    }
}
