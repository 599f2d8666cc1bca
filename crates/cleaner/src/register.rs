//! The rollback register and its scope guard.
//!
//! [`new`] hands out two values sharing one pending sequence: the
//! [`Cleaner`], which collects release actions as acquisitions succeed, and
//! the [`Guard`], which releases whatever is still pending when it is
//! dropped. Discharging the cleaner drains the shared sequence into a
//! [`Release`], so exactly one of the two paths ever runs the actions.

use crate::action::{self, Action};
use crate::config::CleanerConfig;
use crate::release::Release;
use crate::tracing as events;
use cleaner_core::MAX_CAPACITY;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct Shared {
    config: Rc<CleanerConfig>,
    pending: RefCell<Vec<Action>>,
}

impl Shared {
    fn drain(&self) -> Vec<Action> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Failure path: drain and run whatever is still pending
    fn release(&self) {
        let actions = self.drain();
        if actions.is_empty() {
            return;
        }

        let config = &self.config;
        events::guard_released(config.display_name(), actions.len());
        action::run_all(actions, config.on_panic, config.display_name());
    }
}

/// Create an empty register and the guard bound to it.
///
/// Bind the guard to a named variable (`_guard`, not `_`) so it lives until
/// the end of the enclosing scope.
pub fn new() -> (Cleaner, Guard) {
    with_config(CleanerConfig::default())
}

/// Create an empty register with an explicit configuration
pub fn with_config(config: CleanerConfig) -> (Cleaner, Guard) {
    let shared = Rc::new(Shared {
        pending: RefCell::new(Vec::with_capacity(config.capacity.min(MAX_CAPACITY))),
        config: Rc::new(config),
    });

    let cleaner = Cleaner {
        shared: Rc::clone(&shared),
    };
    let guard = Guard { shared };

    (cleaner, guard)
}

/// Collects release actions during a multi-step acquisition.
///
/// Once its [`Guard`] is gone, a `Cleaner` that is dropped without being
/// discharged releases any actions added after the guard ran.
pub struct Cleaner {
    shared: Rc<Shared>,
}

impl Cleaner {
    /// Register an action that undoes the acquisition that just succeeded
    pub fn add<F>(&mut self, action: F)
    where
        F: FnOnce() + 'static,
    {
        self.push(Action::new(action));
    }

    /// Register an action with a label carried into log events
    pub fn add_named<F>(&mut self, label: impl Into<Cow<'static, str>>, action: F)
    where
        F: FnOnce() + 'static,
    {
        self.push(Action::named(label, action));
    }

    /// Register the handoff of a nested acquisition as a single action.
    ///
    /// The inner actions run as a unit, in their own reverse order, at the
    /// point where the inner release was added.
    pub fn add_release(&mut self, release: Release) {
        if release.is_empty() {
            return;
        }

        let label = release.name().unwrap_or("nested").to_string();
        self.push(Action::named(label, move || {
            let mut release = release;
            release.run();
        }));
    }

    fn push(&mut self, action: Action) {
        self.shared.pending.borrow_mut().push(action);
    }

    /// Number of actions registered so far
    pub fn len(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.pending.borrow().is_empty()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.shared.config
    }

    /// Hand every registered action to the caller as one [`Release`].
    ///
    /// The register is left empty, so its guard releases nothing when it is
    /// dropped.
    pub fn discharge(self) -> Release {
        let actions = self.shared.drain();
        events::discharged(self.shared.config.display_name(), actions.len());
        Release::new(actions, Rc::clone(&self.shared.config))
    }
}

impl Drop for Cleaner {
    fn drop(&mut self) {
        // the guard still owns the failure path
        if Rc::strong_count(&self.shared) == 1 {
            self.shared.release();
        }
    }
}

impl fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("name", &self.shared.config.display_name())
            .field("pending", &self.len())
            .finish()
    }
}

/// Releases every action still pending in its register when dropped
#[must_use = "the guard releases pending actions when dropped; bind it to a named variable"]
pub struct Guard {
    shared: Rc<Shared>,
}

impl Guard {
    /// Release pending actions now instead of at scope exit.
    ///
    /// Actions added to the [`Cleaner`] afterwards are no longer guarded by
    /// this value; they are released when the `Cleaner` is dropped unless it
    /// is discharged first.
    pub fn run(self) {
        self.shared.release();
    }

    /// Whether the register still holds actions this guard would release
    pub fn is_armed(&self) -> bool {
        !self.shared.pending.borrow().is_empty()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("name", &self.shared.config.display_name())
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.shared.release();
    }
}
