//! Frontends: per-sink filtering and rendering.
//!
//! A frontend decides whether a severity is wanted and turns an accepted event
//! into the final line of text. Two variants are provided. [`LightFrontend`]
//! renders without touching the clock or the current thread. [`FullFrontend`]
//! captures both for every record it renders.

use chrono::format::{Item, StrftimeItems};
use parking_lot::RwLock;

use crate::error::ConfigError;
use crate::layout::{DEFAULT_TIME_FORMAT, RecordLayout, RenderContext, Stamp};
use crate::location::Location;
use crate::predicate::Predicate;
use crate::severity::Severity;

/// Trait implemented by all frontends.
///
/// Implementors must be thread-safe (`Send + Sync`) so a frontend can be
/// shared by a sink that many threads log through.
pub trait Frontend: Send + Sync {
    /// Evaluate the current filter for `severity`.
    fn matches(&self, severity: Severity) -> bool;

    /// Produce the final record text. Never fails.
    fn render(&self, severity: Severity, location: &Location<'_>, message: &str) -> String;

    /// Snapshot of the current filter.
    fn filter(&self) -> Predicate;

    /// Replace the filter.
    ///
    /// A filter accepting no severity is rejected with
    /// [`ConfigError::UnsatisfiableFilter`] and the previous filter is kept.
    fn set_filter(&self, filter: Predicate) -> Result<(), ConfigError>;
}

/// Replaceable filter shared by the built-in frontends.
#[derive(Debug)]
struct FilterSlot(RwLock<Predicate>);

impl FilterSlot {
    fn new(filter: Predicate) -> Result<Self, ConfigError> {
        check_satisfiable(&filter)?;
        Ok(Self(RwLock::new(filter)))
    }

    fn matches(&self, severity: Severity) -> bool {
        self.0.read().evaluate(severity)
    }

    fn get(&self) -> Predicate {
        self.0.read().clone()
    }

    fn set(&self, filter: Predicate) -> Result<(), ConfigError> {
        check_satisfiable(&filter)?;
        *self.0.write() = filter;
        Ok(())
    }
}

impl Default for FilterSlot {
    fn default() -> Self {
        Self(RwLock::new(Predicate::default()))
    }
}

fn check_satisfiable(filter: &Predicate) -> Result<(), ConfigError> {
    if filter.is_satisfiable() {
        Ok(())
    } else {
        Err(ConfigError::UnsatisfiableFilter(filter.to_string()))
    }
}

/// Validate a `strftime` pattern for the `{time}` slot.
pub fn check_time_format(format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        Err(ConfigError::InvalidTimeFormat(format.to_owned()))
    } else {
        Ok(())
    }
}

/// Frontend that never reads the clock or identifies the thread.
///
/// Its layout may use every slot except `{time}` and `{thread}`.
#[derive(Debug, Default)]
pub struct LightFrontend {
    filter: FilterSlot,
    layout: RecordLayout,
}

impl LightFrontend {
    /// Light frontend with the default filter and layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light frontend with the default layout and the given filter.
    pub fn with_filter(filter: Predicate) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: FilterSlot::new(filter)?,
            layout: RecordLayout::light(),
        })
    }

    /// Replace the layout, rejecting slots this frontend cannot fill.
    pub fn with_layout(mut self, layout: RecordLayout) -> Result<Self, ConfigError> {
        if let Some(slot) = layout.clock_slot() {
            return Err(ConfigError::LayoutNeedsClock { slot: slot.name() });
        }
        self.layout = layout;
        Ok(self)
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }
}

impl Frontend for LightFrontend {
    fn matches(&self, severity: Severity) -> bool {
        self.filter.matches(severity)
    }

    fn render(&self, severity: Severity, location: &Location<'_>, message: &str) -> String {
        self.layout.render(&RenderContext {
            severity,
            location: *location,
            message,
            stamp: None,
            time_format: DEFAULT_TIME_FORMAT,
        })
    }

    fn filter(&self) -> Predicate {
        self.filter.get()
    }

    fn set_filter(&self, filter: Predicate) -> Result<(), ConfigError> {
        self.filter.set(filter)
    }
}

/// Frontend that stamps every record with local time and thread identity.
#[derive(Debug)]
pub struct FullFrontend {
    filter: FilterSlot,
    layout: RecordLayout,
    time_format: String,
    stamped: bool,
}

impl Default for FullFrontend {
    fn default() -> Self {
        Self {
            filter: FilterSlot::default(),
            layout: RecordLayout::full(),
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
            stamped: true,
        }
    }
}

impl FullFrontend {
    /// Full frontend with the default filter, layout and time format.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: Predicate) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: FilterSlot::new(filter)?,
            ..Self::default()
        })
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.stamped = layout.clock_slot().is_some();
        self.layout = layout;
        self
    }

    /// Replace the `strftime` pattern used by the `{time}` slot.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Result<Self, ConfigError> {
        let format = format.into();
        check_time_format(&format)?;
        self.time_format = format;
        Ok(self)
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }
}

impl Frontend for FullFrontend {
    fn matches(&self, severity: Severity) -> bool {
        self.filter.matches(severity)
    }

    fn render(&self, severity: Severity, location: &Location<'_>, message: &str) -> String {
        // A custom layout without time or thread slots skips the capture too.
        let stamp = self.stamped.then(Stamp::capture);
        self.layout.render(&RenderContext {
            severity,
            location: *location,
            message,
            stamp,
            time_format: &self.time_format,
        })
    }

    fn filter(&self) -> Predicate {
        self.filter.get()
    }

    fn set_filter(&self, filter: Predicate) -> Result<(), ConfigError> {
        self.filter.set(filter)
    }
}
