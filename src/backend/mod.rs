//! Backends: destinations for finished record text.
//!
//! Every backend synchronises its own resource so [`Backend::consume`] can be
//! called from many threads at once. Failures are absorbed and reported
//! through the `log` crate at a limited rate; they never reach the caller.

mod stream;
mod syslog;

pub use stream::StreamBackend;
pub use syslog::{SyslogBackend, SyslogFacility, SyslogOptions, SyslogPriority, SyslogTarget};

/// Trait implemented by all backends.
pub trait Backend: Send + Sync {
    /// Deliver one rendered record.
    fn consume(&self, text: &str);

    /// Push buffered output to its destination.
    ///
    /// Returns `false` if the backend could not flush.
    fn flush(&self) -> bool {
        true
    }
}
