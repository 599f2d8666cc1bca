//! Core error type definitions

/// Result type alias for cleaner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cleaner configuration using thiserror
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    Configuration { message: String },

    /// Environment variable related errors
    Environment {
        variable: String,
        value: String,
        message: String,
    },
}
