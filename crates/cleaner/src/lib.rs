//! Aggregate rollback actions while acquiring several resources in a row.
//!
//! A function that opens or acquires multiple resources has to destroy all of
//! them if a later step fails, and otherwise hand all of them to its caller.
//! [`new`] returns a [`Cleaner`] that collects one release action per
//! successful step and a [`Guard`] that runs whatever is still registered
//! when the scope exits. Once every step has succeeded,
//! [`Cleaner::discharge`] moves the actions into a single [`Release`] for the
//! caller and leaves the guard with nothing to do.
//!
//! Actions always run last-added first.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! type Log = Rc<RefCell<Vec<&'static str>>>;
//!
//! fn open_pair(log: &Log, fail_second: bool) -> Result<cleaner::Release, &'static str> {
//!     let (mut cleaner, _guard) = cleaner::new();
//!
//!     let first = Rc::clone(log);
//!     cleaner.add(move || first.borrow_mut().push("close file"));
//!
//!     if fail_second {
//!         // the file is closed by the guard on return
//!         return Err("texture unavailable");
//!     }
//!     let second = Rc::clone(log);
//!     cleaner.add(move || second.borrow_mut().push("destroy texture"));
//!
//!     Ok(cleaner.discharge())
//! }
//!
//! let log = Log::default();
//! assert!(open_pair(&log, true).is_err());
//! assert_eq!(*log.borrow(), vec!["close file"]);
//!
//! log.borrow_mut().clear();
//! let mut release = open_pair(&log, false).unwrap();
//! assert!(log.borrow().is_empty());
//! release.run();
//! assert_eq!(*log.borrow(), vec!["destroy texture", "close file"]);
//! ```
//!
//! ## Release failures
//!
//! The register never fails. A panicking release action propagates to
//! whoever runs the sequence: the scope holding the [`Guard`], or the caller
//! of [`Release::run`]. With the default [`PanicPolicy::Continue`] the
//! remaining actions still run before the panic is resumed.
//!
//! Registers are single-threaded; [`Cleaner`], [`Guard`] and [`Release`] are
//! neither `Send` nor `Sync`.

mod action;
pub mod config;
pub mod register;
pub mod release;
pub mod tracing;

pub use config::{CleanerConfig, PanicPolicy};
pub use register::{new, with_config, Cleaner, Guard};
pub use release::Release;

pub use cleaner_core::{Error, Result};
