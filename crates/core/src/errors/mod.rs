//! Error types for cleaner configuration

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
