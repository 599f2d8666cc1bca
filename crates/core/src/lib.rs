//! Core types, errors, and constants shared by the `cleaner` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the `Error` enum and `Result` alias used when
//!   configuration is read or parsed. The rollback register itself is total
//!   and never returns these.
//! - **`constants`**: Environment variable names and defaults.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
