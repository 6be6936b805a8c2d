//! Output sinks for encoded frames.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination of the write stage.
///
/// Called once per non-empty frame from the write thread, with the complete
/// encoded frame.
pub trait PlatformWrite: Send {
    /// Write all of `bytes`.
    fn platform_write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// Writes to the process's standard output.
///
/// Uses `write_all` followed by `flush`, so short writes are retried until
/// the whole frame is out.
#[derive(Debug, Default)]
pub struct StdoutSink {
    stdout: Option<io::Stdout>,
}

impl StdoutSink {
    /// Create a sink bound to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: Some(io::stdout()),
        }
    }
}

impl PlatformWrite for StdoutSink {
    fn platform_write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stdout = self.stdout.get_or_insert_with(io::stdout);
        let mut lock = stdout.lock();
        lock.write_all(bytes)?;
        lock.flush()
    }
}

/// Any `Write + Send` can be a sink.
impl<W: Write + Send> PlatformWrite for Box<W> {
    fn platform_write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }
}

/// Sink that records every write call for inspection.
///
/// Clones share the same record, so a test keeps one handle while the
/// canvas owns the other.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl CaptureSink {
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Each write call's bytes, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    /// Number of write calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().len()
    }

    /// All bytes written so far, concatenated.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().concat()
    }

    /// Remove and return the recorded writes.
    pub fn take(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlatformWrite for CaptureSink {
    fn platform_write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.lock().push(bytes.to_vec());
        Ok(())
    }
}
