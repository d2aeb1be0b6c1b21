//! Construction and realisation of configuration.

use std::sync::Arc;

use crate::backend::{StreamBackend, SyslogBackend};
use crate::dispatcher::Dispatcher;
use crate::error::ConfigError;
use crate::frontend::{FullFrontend, LightFrontend};
use crate::layout::RecordLayout;
use crate::sink::{SharedBackend, SharedFrontend, Sink};

use super::types::{BackendConfig, FrontendKind, LoggingConfig, SinkConfig};

impl SinkConfig {
    /// Build the frontend, open the backend and pair them.
    pub fn build(&self) -> Result<Sink, ConfigError> {
        let kind = self.frontend.ok_or(ConfigError::MissingFrontend)?;
        let backend = self.backend.as_ref().ok_or(ConfigError::MissingBackend)?;
        let frontend = self.build_frontend(kind)?;
        Ok(Sink::new(frontend, build_backend(backend)?))
    }

    fn build_frontend(&self, kind: FrontendKind) -> Result<SharedFrontend, ConfigError> {
        let filter = self.filter.clone().unwrap_or_default();
        let layout = self.layout.as_deref().map(RecordLayout::parse).transpose()?;
        match kind {
            FrontendKind::Light => {
                if let Some(format) = &self.time_format {
                    return Err(ConfigError::UnknownOption {
                        key: "time_format".to_owned(),
                        value: format.clone(),
                    });
                }
                let mut frontend = LightFrontend::with_filter(filter)?;
                if let Some(layout) = layout {
                    frontend = frontend.with_layout(layout)?;
                }
                Ok(Arc::new(frontend))
            }
            FrontendKind::Full => {
                let mut frontend = FullFrontend::with_filter(filter)?;
                if let Some(layout) = layout {
                    frontend = frontend.with_layout(layout);
                }
                if let Some(format) = &self.time_format {
                    frontend = frontend.with_time_format(format.as_str())?;
                }
                Ok(Arc::new(frontend))
            }
        }
    }
}

fn build_backend(config: &BackendConfig) -> Result<SharedBackend, ConfigError> {
    let backend: SharedBackend = match config {
        BackendConfig::Stdout => Arc::new(StreamBackend::stdout()),
        BackendConfig::Stderr => Arc::new(StreamBackend::stderr()),
        BackendConfig::File(path) => Arc::new(StreamBackend::append_to(path)?),
        BackendConfig::Syslog { priority, options } => {
            Arc::new(SyslogBackend::with_options(*priority, options.clone())?)
        }
        BackendConfig::Shared(backend) => Arc::clone(backend),
    };
    Ok(backend)
}

impl LoggingConfig {
    /// Build every sink in order, naming the first one that fails.
    pub fn build(&self) -> Result<Vec<Sink>, ConfigError> {
        self.sinks()
            .iter()
            .map(|(name, sink)| sink.build().map_err(|err| err.in_sink(name)))
            .collect()
    }

    /// Build every sink and register them with `dispatcher`.
    ///
    /// Nothing is registered unless every sink builds. Returns the number of
    /// sinks added.
    pub fn apply(&self, dispatcher: &Dispatcher) -> Result<usize, ConfigError> {
        let sinks = self.build()?;
        let count = sinks.len();
        dispatcher.add_sinks(sinks);
        Ok(count)
    }
}
