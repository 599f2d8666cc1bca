//! Configuration for rollback registers.
//!
//! A [`CleanerConfig`] is fixed when a register is created and travels with
//! its [`Release`](crate::Release) after the handoff, so both the failure
//! path and the success path log under the same name and apply the same
//! [`PanicPolicy`].

use cleaner_core::{
    Error, Result, CLEANER_CAPACITY_VAR, CLEANER_ON_PANIC_VAR, DEFAULT_CAPACITY, MAX_CAPACITY,
};
use std::fmt;
use std::str::FromStr;

/// What to do when a release action panics while a sequence is being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Run every remaining action, then resume the first panic
    #[default]
    Continue,
    /// Propagate the first panic immediately; remaining actions are dropped unrun
    Stop,
}

impl PanicPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanicPolicy::Continue => "continue",
            PanicPolicy::Stop => "stop",
        }
    }
}

impl fmt::Display for PanicPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanicPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(PanicPolicy::Continue),
            "stop" => Ok(PanicPolicy::Stop),
            other => Err(Error::configuration(format!(
                "unknown panic policy '{other}', expected one of: continue, stop"
            ))),
        }
    }
}

/// Configuration for a rollback register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanerConfig {
    /// Name attached to every log event the register emits
    pub name: Option<String>,
    /// Initial capacity of the pending sequence; values above `MAX_CAPACITY`
    /// are clamped when the register is created
    pub capacity: usize,
    /// Behavior when a release action panics
    pub on_panic: PanicPolicy,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            name: None,
            capacity: DEFAULT_CAPACITY,
            on_panic: PanicPolicy::default(),
        }
    }
}

impl CleanerConfig {
    /// Create a default config with a name for log events
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().with_name(name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial capacity, clamped to `MAX_CAPACITY`
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(MAX_CAPACITY);
        self
    }

    #[must_use]
    pub fn with_panic_policy(mut self, on_panic: PanicPolicy) -> Self {
        self.on_panic = on_panic;
        self
    }

    /// Name used in log events, `unnamed` when none was configured
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Build a config from `CLEANER_ON_PANIC` and `CLEANER_CAPACITY`.
    ///
    /// Unset variables keep their defaults. A set but invalid value is an
    /// [`Error::Environment`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CleanerConfig::from_env`] with a caller-supplied variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CLEANER_ON_PANIC_VAR) {
            config.on_panic = raw
                .parse::<PanicPolicy>()
                .map_err(|e| e.in_variable(CLEANER_ON_PANIC_VAR, raw.as_str()))?;
        }

        if let Some(raw) = lookup(CLEANER_CAPACITY_VAR) {
            config.capacity = parse_capacity(&raw)
                .map_err(|e| e.in_variable(CLEANER_CAPACITY_VAR, raw.as_str()))?;
        }

        Ok(config)
    }
}

fn parse_capacity(raw: &str) -> Result<usize> {
    let capacity: usize = raw
        .trim()
        .parse()
        .map_err(|e| Error::configuration(format!("not a valid capacity: {e}")))?;

    if capacity > MAX_CAPACITY {
        return Err(Error::configuration(format!(
            "capacity must not exceed {MAX_CAPACITY}"
        )));
    }

    Ok(capacity)
}
