//! A backend that accumulates records in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::Backend;

/// Backend that stores every record it consumes for later inspection.
///
/// Clones share the same storage, so a test can keep one handle while the
/// other is registered with a dispatcher.
#[derive(Clone, Debug, Default)]
pub struct CollectingBackend {
    records: Arc<Mutex<Vec<String>>>,
    flushes: Arc<Mutex<usize>>,
}

impl CollectingBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all records consumed so far.
    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// How many times the backend was flushed.
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }
}

impl Backend for CollectingBackend {
    fn consume(&self, text: &str) {
        self.records.lock().push(text.to_owned());
    }

    fn flush(&self) -> bool {
        *self.flushes.lock() += 1;
        true
    }
}
