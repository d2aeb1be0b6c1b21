//! Compatibility bridge for the Rust `log` crate.
//!
//! [`LogBridge`] implements `log::Log` and forwards records into a
//! [`Dispatcher`], so libraries that log through `log` reach the same sinks
//! as code using this crate's macros.

use std::cell::Cell;

use log::{Level, Metadata, Record};

use crate::dispatcher::Dispatcher;
use crate::location::Location;
use crate::severity::Severity;

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Maps a `log` level onto the severity of the same name.
impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Severity::Trace,
            Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

/// Marks the current thread as forwarding until dropped, so a panicking
/// backend cannot leave the bridge disabled.
struct ForwardingGuard;

impl ForwardingGuard {
    fn enter() -> Option<Self> {
        if FORWARDING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(Self)
        }
    }
}

impl Drop for ForwardingGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(false));
    }
}

/// Adapter implementing the Rust `log::Log` trait on top of a dispatcher.
///
/// Records are never routed at `Throw` or `Failure` severity, so a `log`
/// call cannot terminate the process. Records emitted while the bridge is
/// already forwarding on the same thread (for example a backend's own failure
/// warning) are dropped to avoid unbounded recursion.
#[derive(Debug)]
pub struct LogBridge {
    dispatcher: &'static Dispatcher,
}

impl LogBridge {
    pub fn new(dispatcher: &'static Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Install the bridge as the global `log` logger.
    ///
    /// Fails if another logger is already installed. On success the global
    /// maximum level is opened up to `Trace`; per-sink filters decide the rest.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    fn forward(&self, record: &Record<'_>) {
        let location = Location::new(
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
            record.module_path().unwrap_or_else(|| record.target()),
        );
        let message = record.args().to_string();
        // Bridged severities never throw or fail.
        let _ = self
            .dispatcher
            .log(Severity::from(record.level()), location, &message);
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.dispatcher.enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let Some(_guard) = ForwardingGuard::enter() else {
            return;
        };
        self.forward(record);
    }

    fn flush(&self) {
        self.dispatcher.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::frontend::LightFrontend;
    use crate::predicate::Placeholder;
    use crate::test_utils::CollectingBackend;
    use log::Log;
    use once_cell::sync::Lazy;
    use rstest::rstest;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;

    static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);
    static BACKEND: Lazy<CollectingBackend> = Lazy::new(|| {
        let backend = CollectingBackend::new();
        let frontend = LightFrontend::with_filter(Placeholder.at_least(Severity::Debug))
            .expect("satisfiable");
        DISPATCHER.add(Arc::new(frontend), Arc::new(backend.clone()));
        backend
    });

    #[rstest]
    #[case(Level::Trace, Severity::Trace)]
    #[case(Level::Debug, Severity::Debug)]
    #[case(Level::Info, Severity::Info)]
    #[case(Level::Warn, Severity::Warning)]
    #[case(Level::Error, Severity::Error)]
    fn maps_levels_by_name(#[case] level: Level, #[case] expected: Severity) {
        assert_eq!(Severity::from(level), expected);
    }

    #[test]
    fn forwards_records_with_location() {
        let backend = &*BACKEND;
        let bridge = LogBridge::new(&DISPATCHER);
        bridge.log(
            &Record::builder()
                .args(format_args!("cache miss for {}", "key"))
                .level(Level::Warn)
                .target("app::cache")
                .module_path(Some("app::cache"))
                .file(Some("cache.rs"))
                .line(Some(42))
                .build(),
        );
        assert!(
            backend
                .records()
                .contains(&"WRN cache.rs:42 [app::cache] cache miss for key".to_owned())
        );
        assert!(bridge.enabled(&Metadata::builder().level(Level::Debug).build()));
        assert!(!bridge.enabled(&Metadata::builder().level(Level::Trace).build()));
    }

    #[test]
    fn nested_records_on_the_same_thread_are_dropped() {
        let backend = &*BACKEND;
        let bridge = LogBridge::new(&DISPATCHER);
        FORWARDING.with(|flag| flag.set(true));
        bridge.log(
            &Record::builder()
                .args(format_args!("reentrant"))
                .level(Level::Error)
                .build(),
        );
        FORWARDING.with(|flag| flag.set(false));
        assert!(!backend.records().iter().any(|line| line.ends_with("reentrant")));
    }

    struct Exploding;

    impl Backend for Exploding {
        fn consume(&self, text: &str) {
            if text.ends_with("boom") {
                panic!("backend exploded");
            }
        }
    }

    #[test]
    fn panicking_backend_does_not_disable_the_bridge() {
        let dispatcher: &'static Dispatcher = Box::leak(Box::new(Dispatcher::new()));
        let collected = CollectingBackend::new();
        dispatcher.add(Arc::new(LightFrontend::new()), Arc::new(Exploding));
        dispatcher.add(Arc::new(LightFrontend::new()), Arc::new(collected.clone()));
        let bridge = LogBridge::new(dispatcher);
        let record = |text: &str| {
            bridge.log(
                &Record::builder()
                    .args(format_args!("{text}"))
                    .level(Level::Error)
                    .build(),
            )
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| record("boom")));
        assert!(outcome.is_err());
        assert!(!FORWARDING.with(Cell::get));

        record("recovered");
        let records = collected.records();
        assert!(records.iter().any(|line| line.ends_with("recovered")), "{records:?}");
    }
}
