//! Sinks pair one frontend with one backend.

use std::fmt;
use std::sync::Arc;

use crate::backend::Backend;
use crate::error::ConfigError;
use crate::frontend::Frontend;
use crate::location::Location;
use crate::severity::Severity;

/// Shared frontend trait object.
pub type SharedFrontend = Arc<dyn Frontend>;
/// Shared backend trait object.
pub type SharedBackend = Arc<dyn Backend>;

/// An immutable `(frontend, backend)` pair.
///
/// Both halves are reference counted so a frontend can keep being reconfigured
/// through another handle, and one backend can serve several sinks.
#[derive(Clone)]
pub struct Sink {
    frontend: SharedFrontend,
    backend: SharedBackend,
}

impl Sink {
    pub fn new(frontend: SharedFrontend, backend: SharedBackend) -> Self {
        Self { frontend, backend }
    }

    /// Start a builder that checks both halves are present.
    pub fn builder() -> SinkBuilder {
        SinkBuilder::default()
    }

    pub fn frontend(&self) -> &SharedFrontend {
        &self.frontend
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Filter, render and deliver one event. Returns whether it was delivered.
    pub(crate) fn deliver(&self, severity: Severity, location: &Location<'_>, message: &str) -> bool {
        if !self.frontend.matches(severity) {
            return false;
        }
        let text = self.frontend.render(severity, location, message);
        self.backend.consume(&text);
        true
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("filter", &self.frontend.filter().to_string())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Sink`] when either half may be missing.
#[derive(Clone, Default)]
pub struct SinkBuilder {
    frontend: Option<SharedFrontend>,
    backend: Option<SharedBackend>,
}

impl SinkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frontend(mut self, frontend: SharedFrontend) -> Self {
        self.frontend = Some(frontend);
        self
    }

    pub fn with_backend(mut self, backend: SharedBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the sink, reporting which half is missing.
    pub fn build(self) -> Result<Sink, ConfigError> {
        let frontend = self.frontend.ok_or(ConfigError::MissingFrontend)?;
        let backend = self.backend.ok_or(ConfigError::MissingBackend)?;
        Ok(Sink::new(frontend, backend))
    }
}

impl fmt::Debug for SinkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkBuilder")
            .field("has_frontend", &self.frontend.is_some())
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}
