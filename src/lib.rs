//! Process-local logging core with per-sink severity predicates.
//!
//! A [`Dispatcher`] holds an ordered list of [`Sink`]s. Each sink pairs a
//! [`Frontend`], which owns a [`Predicate`] filter and renders accepted events
//! into text, with a [`Backend`], which delivers that text to a stream, a file
//! or the system log. A log call is offered to every sink in registration
//! order and each matching sink renders the event for itself.
//!
//! ```
//! use std::sync::Arc;
//!
//! use sievelog::{
//!     Dispatcher, LightFrontend, Placeholder, Predicate, Severity, StreamBackend, log_info,
//! };
//!
//! let dispatcher = Dispatcher::new();
//! let chatty = Predicate::from(Severity::Debug) | Predicate::from(Severity::Info);
//! dispatcher.add(
//!     Arc::new(LightFrontend::with_filter(chatty)?),
//!     Arc::new(StreamBackend::stdout()),
//! );
//! dispatcher.add(
//!     Arc::new(LightFrontend::with_filter(Placeholder.at_least(Severity::Warning))?),
//!     Arc::new(StreamBackend::stderr()),
//! );
//!
//! log_info!(&dispatcher, "argc: %1%", 5);
//! # Ok::<(), sievelog::ConfigError>(())
//! ```

mod backend;
pub mod config;
mod dispatcher;
mod error;
mod frontend;
mod layout;
mod location;
pub mod message;
mod predicate;
mod rate_limited_warner;
mod severity;
mod sink;

mod logging_macros;

#[cfg(feature = "log-compat")]
mod log_compat;
#[cfg(feature = "tracing-compat")]
mod tracing_compat;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use backend::{
    Backend, StreamBackend, SyslogBackend, SyslogFacility, SyslogOptions, SyslogPriority,
    SyslogTarget,
};
pub use config::{BackendConfig, FrontendKind, LoggingConfig, SinkConfig};
pub use dispatcher::{Dispatcher, Terminator, dispatcher};
pub use error::{ConfigError, ThrownError};
pub use frontend::{Frontend, FullFrontend, LightFrontend, check_time_format};
pub use layout::{
    DEFAULT_TIME_FORMAT, FULL_LAYOUT, LIGHT_LAYOUT, RecordLayout, RenderContext, Slot, Stamp,
};
pub use location::Location;
pub use message::FormatAnomaly;
pub use predicate::{Operand, Placeholder, Predicate, Relation, compare};
pub use rate_limited_warner::{DEFAULT_WARN_INTERVAL, RateLimitedWarner};
pub use severity::Severity;
pub use sink::{SharedBackend, SharedFrontend, Sink, SinkBuilder};

#[cfg(feature = "log-compat")]
pub use log_compat::LogBridge;
#[cfg(feature = "tracing-compat")]
pub use tracing_compat::{DispatchLayer, severity_for};
