//! Type definitions and builder structs for sink configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::backend::{SyslogOptions, SyslogPriority};
use crate::error::ConfigError;
use crate::predicate::Predicate;
use crate::sink::SharedBackend;

/// Which built-in frontend a sink uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrontendKind {
    /// [`LightFrontend`](crate::LightFrontend): no clock or thread lookup.
    #[default]
    Light,
    /// [`FullFrontend`](crate::FullFrontend): time and thread on every record.
    Full,
}

impl FromStr for FrontendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "full" => Ok(Self::Full),
            _ => Err(ConfigError::UnknownOption {
                key: "frontend".to_owned(),
                value: s.to_owned(),
            }),
        }
    }
}

/// Concrete backend variants a sink can be built with.
#[derive(Clone)]
pub enum BackendConfig {
    Stdout,
    Stderr,
    /// Append to a file, creating it if needed.
    File(PathBuf),
    Syslog {
        priority: SyslogPriority,
        options: SyslogOptions,
    },
    /// An already-constructed backend, possibly shared with other sinks.
    Shared(SharedBackend),
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Syslog { priority, options } => f
                .debug_struct("Syslog")
                .field("priority", priority)
                .field("options", options)
                .finish(),
            Self::Shared(_) => f.write_str("Shared(<dyn Backend>)"),
        }
    }
}

/// Builder for one sink.
#[derive(Clone, Debug, Default)]
pub struct SinkConfig {
    pub(crate) frontend: Option<FrontendKind>,
    pub(crate) filter: Option<Predicate>,
    pub(crate) layout: Option<String>,
    pub(crate) time_format: Option<String>,
    pub(crate) backend: Option<BackendConfig>,
}

impl SinkConfig {
    /// Create a new empty `SinkConfig`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frontend(mut self, frontend: FrontendKind) -> Self {
        self.frontend = Some(frontend);
        self
    }

    /// Set the filter; `_ >= Info` when unset.
    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the record layout template.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Set the `strftime` pattern; only valid with [`FrontendKind::Full`].
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }
}

/// Ordered collection of named sink configurations.
#[derive(Clone, Debug, Default)]
pub struct LoggingConfig {
    sinks: Vec<(String, SinkConfig)>,
}

impl LoggingConfig {
    /// Create a new empty `LoggingConfig`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named sink. Reusing a name replaces that sink in place.
    pub fn with_sink(mut self, name: impl Into<String>, sink: SinkConfig) -> Self {
        let name = name.into();
        match self.sinks.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = sink,
            None => self.sinks.push((name, sink)),
        }
        self
    }

    /// Sink names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sinks.iter().map(|(name, _)| name.as_str())
    }

    pub fn sink(&self, name: &str) -> Option<&SinkConfig> {
        self.sinks
            .iter()
            .find_map(|(existing, sink)| (existing == name).then_some(sink))
    }

    pub(crate) fn sinks(&self) -> &[(String, SinkConfig)] {
        &self.sinks
    }
}
