//! Bridge forwarding `tracing` events into a [`Dispatcher`].
//!
//! Add [`DispatchLayer`] to a `tracing_subscriber` registry. Each event's
//! `message` field becomes the record text and every other field is appended
//! as `name=value`.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::dispatcher::Dispatcher;
use crate::location::Location;
use crate::severity::Severity;

/// Maps a `tracing` level onto the severity of the same name.
pub fn severity_for(level: &Level) -> Severity {
    match *level {
        Level::ERROR => Severity::Error,
        Level::WARN => Severity::Warning,
        Level::INFO => Severity::Info,
        Level::DEBUG => Severity::Debug,
        _ => Severity::Trace,
    }
}

/// `tracing_subscriber` layer that logs every event through a dispatcher.
#[derive(Debug)]
pub struct DispatchLayer {
    dispatcher: &'static Dispatcher,
}

impl DispatchLayer {
    pub fn new(dispatcher: &'static Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl<S: Subscriber> Layer<S> for DispatchLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let location = Location::new(
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
            metadata.module_path().unwrap_or_else(|| metadata.target()),
        );
        let _ = self.dispatcher.log(
            severity_for(metadata.level()),
            location,
            &visitor.finish(),
        );
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if !self.fields.is_empty() {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            self.message.push_str(&self.fields);
        }
        self.message
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::LightFrontend;
    use crate::layout::RecordLayout;
    use crate::predicate::Placeholder;
    use crate::test_utils::CollectingBackend;
    use once_cell::sync::Lazy;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);
    static BACKEND: Lazy<CollectingBackend> = Lazy::new(|| {
        let backend = CollectingBackend::new();
        let frontend = LightFrontend::with_filter(Placeholder.at_least(Severity::Trace))
            .expect("satisfiable")
            .with_layout(RecordLayout::parse("{severity} {message}").expect("valid layout"))
            .expect("no clock slots");
        DISPATCHER.add(Arc::new(frontend), Arc::new(backend.clone()));
        backend
    });

    #[test]
    fn forwards_events_with_fields() {
        let backend = &*BACKEND;
        let subscriber = tracing_subscriber::registry().with(DispatchLayer::new(&DISPATCHER));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(user = "bob", attempts = 3, "login failed");
            tracing::trace!("plain");
        });
        let records = backend.records();
        assert!(
            records.contains(&"WRN login failed user=bob attempts=3".to_owned()),
            "{records:?}"
        );
        assert!(records.contains(&"TRC plain".to_owned()), "{records:?}");
    }

    #[test]
    fn maps_levels_by_name() {
        assert_eq!(severity_for(&Level::ERROR), Severity::Error);
        assert_eq!(severity_for(&Level::WARN), Severity::Warning);
        assert_eq!(severity_for(&Level::TRACE), Severity::Trace);
    }
}
