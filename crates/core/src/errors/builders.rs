//! Builder methods for creating errors with context

use super::types::Error;

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an environment variable error for a value that failed to parse
    #[must_use]
    pub fn environment(
        variable: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Environment {
            variable: variable.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Attach the environment variable a configuration value was read from
    #[must_use]
    pub fn in_variable(self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Error::Configuration { message } => Error::environment(variable, value, message),
            other => other,
        }
    }
}
