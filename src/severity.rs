//! Severity levels carried by log events.
//!
//! The ordering is fixed: `Trace < Debug < Info < Warning < Throw < Error <
//! Failure`. `Throw` and `Failure` are ordinary levels for filtering purposes;
//! their side effects live in the dispatcher.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    /// Dispatched like any other level, then handed back to the caller as a
    /// [`ThrownError`](crate::ThrownError).
    Throw,
    Error,
    /// Dispatched, then the process exits.
    Failure,
}

impl Severity {
    /// Every severity in ascending order.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Throw,
        Severity::Error,
        Severity::Failure,
    ];

    /// Upper-case name used by `Display` and filter expressions.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Throw => "THROW",
            Severity::Error => "ERROR",
            Severity::Failure => "FAILURE",
        }
    }

    /// Three-letter tag written into rendered records.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Trace => "TRC",
            Severity::Debug => "DBG",
            Severity::Info => "INF",
            Severity::Warning => "WRN",
            Severity::Throw => "THR",
            Severity::Error => "ERR",
            Severity::Failure => "FLR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "TRC" => Ok(Self::Trace),
            "DEBUG" | "DBG" => Ok(Self::Debug),
            "INFO" | "INF" => Ok(Self::Info),
            "WARNING" | "WARN" | "WRN" => Ok(Self::Warning),
            "THROW" | "THR" => Ok(Self::Throw),
            "ERROR" | "ERR" => Ok(Self::Error),
            "FAILURE" | "FLR" => Ok(Self::Failure),
            _ => Err(ConfigError::UnknownSeverity(s.to_owned())),
        }
    }
}
