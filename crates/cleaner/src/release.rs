//! The success-path handoff returned by [`Cleaner::discharge`](crate::Cleaner::discharge).

use crate::action::{self, Action};
use crate::config::CleanerConfig;
use std::fmt;
use std::rc::Rc;

/// Combined release function for every action a register held when it was
/// discharged.
///
/// Running it executes the actions last-added first, exactly once. A
/// `Release` that is dropped without having been run releases its actions
/// on drop, so returning it to a caller transfers ownership of the
/// acquired resources along with it.
///
/// A panic raised by an action propagates to whoever runs the `Release`;
/// see [`PanicPolicy`](crate::PanicPolicy) for whether later actions still
/// run.
#[must_use = "dropping a Release runs its actions immediately"]
pub struct Release {
    actions: Vec<Action>,
    config: Rc<CleanerConfig>,
}

impl Release {
    pub(crate) fn new(actions: Vec<Action>, config: Rc<CleanerConfig>) -> Self {
        Self { actions, config }
    }

    /// A release with nothing to run
    pub fn noop() -> Self {
        Self::new(Vec::new(), Rc::new(CleanerConfig::default()))
    }

    /// Run every captured action in reverse order. Later calls do nothing.
    pub fn run(&mut self) {
        let actions = std::mem::take(&mut self.actions);
        action::run_all(actions, self.config.on_panic, self.config.display_name());
    }

    /// Number of actions that have not run yet
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Name of the register this release came from, if it had one
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Convert into a plain nullary closure with the same run-once behavior
    pub fn into_fn(self) -> impl FnMut() {
        let mut release = self;
        move || release.run()
    }
}

impl Default for Release {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Release")
            .field("name", &self.config.display_name())
            .field("pending", &self.actions.len())
            .finish()
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        self.run();
    }
}
