//! Shared buffer used to capture stream backend output in tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Thread-safe byte buffer that can be handed to a `StreamBackend`.
///
/// Clones share the same storage, so a test keeps one handle and gives the
/// other to the backend.
#[derive(Clone, Default)]
pub struct SharedBuf {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer contents decoded as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8(self.buffer.lock().expect("SharedBuf mutex poisoned").clone())
            .expect("buffer contains invalid UTF-8")
    }

    /// Buffer contents split into lines without terminators.
    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("SharedBuf mutex poisoned")
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
