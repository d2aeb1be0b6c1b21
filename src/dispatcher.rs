//! The sink registry that fans each log call out to every sink.
//!
//! Sinks are registered up front and never removed. Dispatch takes a snapshot
//! of the sink list (one reference-count bump) and runs without holding any
//! lock, so backends may block on I/O without stalling registration or other
//! threads' dispatch.
//!
//! Two severities have effects beyond delivery, applied after every sink has
//! seen the event whether or not any matched:
//!
//! * [`Severity::Failure`] flushes all backends and terminates the process.
//! * [`Severity::Throw`] hands a [`ThrownError`] carrying the message back to
//!   the caller.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::ThrownError;
use crate::frontend::Frontend;
use crate::location::Location;
use crate::message;
use crate::severity::Severity;
use crate::sink::{SharedBackend, SharedFrontend, Sink};

/// Diverging function run after a `Failure` record has been delivered.
pub type Terminator = fn() -> !;

fn exit_failure() -> ! {
    std::process::exit(1)
}

static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

/// Process-wide default dispatcher, created on first use and never torn down.
pub fn dispatcher() -> &'static Dispatcher {
    &DISPATCHER
}

/// Ordered collection of sinks with fan-out dispatch.
pub struct Dispatcher {
    sinks: RwLock<Arc<Vec<Sink>>>,
    terminate: Terminator,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher with no sinks that exits with status 1 on `Failure`.
    pub fn new() -> Self {
        Self::with_terminator(exit_failure)
    }

    /// Dispatcher that calls `terminate` instead of exiting on `Failure`.
    pub fn with_terminator(terminate: Terminator) -> Self {
        Self {
            sinks: RwLock::new(Arc::new(Vec::new())),
            terminate,
        }
    }

    /// Append a sink; it sees every event logged after this returns.
    ///
    /// Registration is meant to finish before logging starts. Calls racing
    /// with dispatch are safe but an in-flight event may miss the new sink.
    pub fn add_sink(&self, sink: Sink) {
        self.add_sinks(std::iter::once(sink));
    }

    /// Pair `frontend` with `backend` and register the result.
    pub fn add(&self, frontend: SharedFrontend, backend: SharedBackend) {
        self.add_sink(Sink::new(frontend, backend));
    }

    /// Append several sinks at once, so no event sees only some of them.
    pub fn add_sinks(&self, sinks: impl IntoIterator<Item = Sink>) {
        let mut guard = self.sinks.write();
        Arc::make_mut(&mut guard).extend(sinks);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Snapshot of the registered sinks in registration order.
    pub fn sinks(&self) -> Arc<Vec<Sink>> {
        Arc::clone(&self.sinks.read())
    }

    /// Whether any registered sink's filter accepts `severity`.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.sinks()
            .iter()
            .any(|sink| sink.frontend().matches(severity))
    }

    /// Deliver `message` to every sink whose filter accepts `severity`.
    ///
    /// Returns `Err` for [`Severity::Throw`] and does not return for
    /// [`Severity::Failure`]; other severities always give `Ok(())`.
    pub fn log(
        &self,
        severity: Severity,
        location: Location<'_>,
        message: &str,
    ) -> Result<(), ThrownError> {
        self.fan_out(severity, &location, message);
        match severity {
            Severity::Failure => self.terminate(),
            Severity::Throw => Err(ThrownError::new(message)),
            _ => Ok(()),
        }
    }

    /// Substitute `args` into `template` and [`log`](Self::log) the result.
    pub fn log_args(
        &self,
        severity: Severity,
        location: Location<'_>,
        template: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<(), ThrownError> {
        self.log(severity, location, &message::render(template, args))
    }

    /// Log at `Throw` severity and return the error for the caller to raise.
    pub fn throw(&self, location: Location<'_>, message: &str) -> ThrownError {
        self.fan_out(Severity::Throw, &location, message);
        ThrownError::new(message)
    }

    /// Log at `Failure` severity, flush every backend and terminate.
    pub fn fail(&self, location: Location<'_>, message: &str) -> ! {
        self.fan_out(Severity::Failure, &location, message);
        self.terminate()
    }

    /// Flush every backend, returning whether all of them succeeded.
    pub fn flush(&self) -> bool {
        self.sinks()
            .iter()
            .fold(true, |ok, sink| sink.backend().flush() && ok)
    }

    fn fan_out(&self, severity: Severity, location: &Location<'_>, message: &str) {
        let sinks = self.sinks();
        for sink in sinks.iter() {
            sink.deliver(severity, location, message);
        }
    }

    fn terminate(&self) -> ! {
        self.flush();
        (self.terminate)()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sinks", &self.sink_count())
            .finish_non_exhaustive()
    }
}
