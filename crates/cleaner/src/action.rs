//! Release actions and the reverse-order runner shared by both release paths.

use crate::config::PanicPolicy;
use crate::tracing as events;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// A single nullary release action, optionally labelled for log events
pub(crate) struct Action {
    label: Option<Cow<'static, str>>,
    run: Box<dyn FnOnce()>,
}

impl Action {
    pub(crate) fn new<F>(action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            label: None,
            run: Box::new(action),
        }
    }

    pub(crate) fn named<F>(label: impl Into<Cow<'static, str>>, action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            label: Some(label.into()),
            run: Box::new(action),
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("anonymous")
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label())
            .finish_non_exhaustive()
    }
}

/// Run `actions` last-added first.
///
/// Under [`PanicPolicy::Continue`] a panicking action does not stop the
/// sequence; the first panic is resumed once every action has run. Under
/// [`PanicPolicy::Stop`] the panic is resumed right after it is logged and
/// the remaining actions are dropped unrun. If the thread is already
/// unwinding the panic is logged and dropped instead, and `Stop` is treated
/// like `Continue`.
pub(crate) fn run_all(actions: Vec<Action>, policy: PanicPolicy, cleaner: &str) {
    if actions.is_empty() {
        return;
    }

    let _span = events::release_span(cleaner, actions.len()).entered();
    let unwinding = std::thread::panicking();
    let stop_early = !unwinding && policy == PanicPolicy::Stop;
    let mut first_panic: Option<Box<dyn Any + Send>> = None;

    for (index, action) in actions.into_iter().enumerate().rev() {
        events::release_action(index, action.label());

        let Action { label, run } = action;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(run)) {
            events::release_action_panicked(
                index,
                label.as_deref().unwrap_or("anonymous"),
                panic_message(payload.as_ref()),
            );
            if stop_early {
                panic::resume_unwind(payload);
            }
            first_panic.get_or_insert(payload);
        }
    }

    if let Some(payload) = first_panic {
        if unwinding {
            events::release_panic_dropped(cleaner, panic_message(payload.as_ref()));
        } else {
            panic::resume_unwind(payload);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing::capture::capture_events;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging(log: &Log, entry: &str) -> Action {
        let log = Rc::clone(log);
        let entry = entry.to_string();
        Action::named(entry.clone(), move || log.borrow_mut().push(entry))
    }

    fn panicking(log: &Log, entry: &str) -> Action {
        let log = Rc::clone(log);
        let entry = entry.to_string();
        Action::new(move || {
            log.borrow_mut().push(entry.clone());
            panic!("{entry} failed");
        })
    }

    #[test]
    fn test_runs_in_reverse() {
        let log = Log::default();
        let actions = vec![logging(&log, "a"), logging(&log, "b"), logging(&log, "c")];

        run_all(actions, PanicPolicy::Continue, "test");

        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_sequence() {
        run_all(Vec::new(), PanicPolicy::Stop, "test");
    }

    #[test]
    fn test_continue_runs_all_then_resumes_first_panic() {
        let log = Log::default();
        let actions = vec![
            logging(&log, "a"),
            panicking(&log, "b"),
            logging(&log, "c"),
            panicking(&log, "d"),
        ];

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_all(actions, PanicPolicy::Continue, "test");
        }));

        let payload = result.unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "d failed");
        assert_eq!(*log.borrow(), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_stop_propagates_immediately() {
        let log = Log::default();
        let actions = vec![logging(&log, "a"), panicking(&log, "b"), logging(&log, "c")];

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_all(actions, PanicPolicy::Stop, "test");
        }));

        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec!["c", "b"]);
    }

    #[test]
    fn test_stop_logs_panic_before_propagating() {
        let log = Log::default();
        let actions = vec![logging(&log, "a"), panicking(&log, "b")];

        let (result, events) = capture_events(|| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                run_all(actions, PanicPolicy::Stop, "test");
            }))
        });

        let payload = result.unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "b failed");
        assert_eq!(*log.borrow(), vec!["b"]);
        assert_eq!(
            events
                .iter()
                .filter(|e| e.message == "release_action_panicked")
                .count(),
            1
        );
    }

    #[test]
    fn test_continue_logs_every_panic() {
        let log = Log::default();
        let actions = vec![panicking(&log, "a"), panicking(&log, "b")];

        let (result, events) = capture_events(|| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                run_all(actions, PanicPolicy::Continue, "test");
            }))
        });

        assert!(result.is_err());
        let panicked: Vec<_> = events
            .iter()
            .filter(|e| e.message == "release_action_panicked")
            .map(|e| e.field("label"))
            .collect();
        assert_eq!(panicked, vec![Some("anonymous"), Some("anonymous")]);
    }

    #[test]
    fn test_panic_message() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_debug_shows_label() {
        let action = Action::named("close file", || {});
        assert!(format!("{action:?}").contains("close file"));
        assert_eq!(Action::new(|| {}).label(), "anonymous");
    }
}
