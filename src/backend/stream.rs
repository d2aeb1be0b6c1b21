//! Backend writing newline-terminated records to an `io::Write` stream.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::warn;
use parking_lot::Mutex;

use super::Backend;
use crate::rate_limited_warner::RateLimitedWarner;

/// Backend that appends each record as one line to a stream.
///
/// The writer sits behind a single lock held for the whole write and flush,
/// so lines from concurrent callers never interleave.
pub struct StreamBackend {
    writer: Mutex<Box<dyn Write + Send>>,
    warner: RateLimitedWarner,
}

impl StreamBackend {
    /// Backend writing to `stdout`.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Backend writing to `stderr`.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Backend writing to an arbitrary writer.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::with_warner(writer, RateLimitedWarner::default())
    }

    /// Backend with a custom failure-warning policy.
    pub fn with_warner<W>(writer: W, warner: RateLimitedWarner) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
            warner,
        }
    }

    /// Backend appending to the file at `path`, creating it if needed.
    pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(file))
    }

    fn report_failures(&self) {
        self.warner.warn_if_due(|count| {
            warn!("StreamBackend: failed to write {count} record(s)");
        });
    }
}

impl Backend for StreamBackend {
    fn consume(&self, text: &str) {
        let result = {
            let mut writer = self.writer.lock();
            writer
                .write_all(text.as_bytes())
                .and_then(|()| writer.write_all(b"\n"))
                .and_then(|()| writer.flush())
        };
        if result.is_err() {
            self.warner.record_failure();
            self.report_failures();
        }
    }

    fn flush(&self) -> bool {
        let flushed = self.writer.lock().flush().is_ok();
        self.warner.flush(|count| {
            warn!("StreamBackend: failed to write {count} record(s)");
        });
        flushed
    }
}

impl fmt::Debug for StreamBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamBackend")
            .field("pending_failures", &self.warner.pending())
            .finish_non_exhaustive()
    }
}
