//! Error types surfaced to callers.
//!
//! [`ConfigError`] covers everything that can go wrong while setting up
//! sinks. [`ThrownError`] is the value produced by a `Throw`-severity log
//! call. Formatting problems never reach callers except through
//! [`render_checked`](crate::message::render_checked).

use std::io;

use thiserror::Error;

/// Errors raised while configuring frontends, backends and sinks.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sink was built without a frontend.
    #[error("sink is missing a frontend")]
    MissingFrontend,
    /// A sink was built without a backend.
    #[error("sink is missing a backend")]
    MissingBackend,
    /// A filter that matches no severity was supplied.
    #[error("filter `{0}` matches no severity")]
    UnsatisfiableFilter(String),
    /// Both comparison operands were placeholders.
    #[error("comparison needs at least one concrete severity operand")]
    NoConcreteOperand,
    /// A filter expression could not be parsed.
    #[error("invalid filter expression `{expression}`: {reason}")]
    InvalidFilter { expression: String, reason: String },
    #[error("unknown severity `{0}`")]
    UnknownSeverity(String),
    /// A record layout could not be parsed.
    #[error("invalid layout `{layout}`: {reason}")]
    InvalidLayout { layout: String, reason: String },
    /// A light frontend was given a layout that needs the clock or thread.
    #[error("layout slot `{{{slot}}}` is not available to a light frontend")]
    LayoutNeedsClock { slot: &'static str },
    #[error("invalid time format `{0}`")]
    InvalidTimeFormat(String),
    /// A configuration key had a value outside its accepted set.
    #[error("invalid value `{value}` for `{key}`")]
    UnknownOption { key: String, value: String },
    /// A configuration section contained a key that does not apply to it.
    #[error("unsupported option `{key}` in [{section}]")]
    UnknownKey { section: String, key: String },
    /// A mandatory configuration key was absent.
    #[error("missing required option `{0}`")]
    MissingOption(String),
    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),
    #[error("configuration is not valid {encoding}")]
    Decode { encoding: &'static str },
    /// The INI source could not be parsed.
    #[error("invalid configuration file: {0}")]
    Ini(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A named sink failed to build.
    #[error("sink `{name}`: {source}")]
    Sink {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_sink(self, name: &str) -> Self {
        Self::Sink {
            name: name.to_owned(),
            source: Box::new(self),
        }
    }
}

/// Error handed back by a `Throw`-severity log call.
///
/// Carries the rendered message verbatim; `Display` prints exactly that text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ThrownError {
    message: String,
}

impl ThrownError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The rendered message that was logged.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}
