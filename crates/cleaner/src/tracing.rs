use cleaner_core::{CLEANER_LOG_VAR, DEFAULT_LOG_FILTER};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, span, trace, Level, Span};

/// Initialize a stderr subscriber for applications that embed the cleaner.
///
/// The filter is read from `CLEANER_LOG` and falls back to `warn`. The
/// library itself never calls this; it only emits events.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(CLEANER_LOG_VAR)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one run of a release sequence
pub fn release_span(cleaner: &str, pending: usize) -> Span {
    span!(Level::DEBUG, "release", cleaner = %cleaner, pending = %pending)
}

/// Emit a structured event for a success-path handoff
pub fn discharged(cleaner: &str, pending: usize) {
    debug!(
        cleaner = %cleaner,
        pending = %pending,
        "cleaner_discharged"
    );
}

/// Emit a structured event for a failure-path release
pub fn guard_released(cleaner: &str, actions: usize) {
    debug!(
        cleaner = %cleaner,
        actions = %actions,
        "guard_released"
    );
}

/// Emit a structured event before a single release action runs
pub fn release_action(index: usize, label: &str) {
    trace!(index = %index, label = %label, "release_action");
}

/// Emit a structured event for a release action that panicked
pub fn release_action_panicked(index: usize, label: &str, message: &str) {
    error!(
        index = %index,
        label = %label,
        panic = %message,
        "release_action_panicked"
    );
}

/// Emit a structured event for a panic that could not be resumed because
/// the thread was already unwinding
pub fn release_panic_dropped(cleaner: &str, message: &str) {
    error!(
        cleaner = %cleaner,
        panic = %message,
        "release_panic_dropped"
    );
}


#[cfg(test)]
mod tests {
    use super::capture::capture_events;
    use super::*;

    #[test]
    fn test_init_only_once() {
        let _ = init();
        assert!(init().is_err());
    }

    #[test]
    fn test_helpers_emit_structured_events() {
        let ((), events) = capture_events(|| {
            let _span = release_span("pair", 2).entered();
            discharged("pair", 2);
            guard_released("pair", 1);
            release_action(0, "close");
            release_action_panicked(0, "close", "boom");
            release_panic_dropped("pair", "boom");
        });

        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "cleaner_discharged",
                "guard_released",
                "release_action",
                "release_action_panicked",
                "release_panic_dropped",
            ]
        );

        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].field("cleaner"), Some("pair"));
        assert_eq!(events[0].field("pending"), Some("2"));
        assert_eq!(events[1].field("actions"), Some("1"));
        assert_eq!(events[2].level, Level::TRACE);
        assert_eq!(events[3].level, Level::ERROR);
        assert_eq!(events[3].field("label"), Some("close"));
        assert_eq!(events[3].field("panic"), Some("boom"));
        assert_eq!(events[4].level, Level::ERROR);
    }
}
