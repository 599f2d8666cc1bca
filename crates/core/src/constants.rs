/// Constants used throughout the cleaner workspace
// Environment variable names
pub const CLEANER_LOG_VAR: &str = "CLEANER_LOG";
pub const CLEANER_ON_PANIC_VAR: &str = "CLEANER_ON_PANIC";
pub const CLEANER_CAPACITY_VAR: &str = "CLEANER_CAPACITY";

// Defaults
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_CAPACITY: usize = 8;

// Upper bound accepted from the environment for the initial capacity
pub const MAX_CAPACITY: usize = 1 << 16;
