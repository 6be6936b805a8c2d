//! On-disk dump of encoded frames.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const HEADER: &[u8] = b"Buffer Dump\n\n";

/// Appends the next few encoded frames to a text file, escape bytes shown
/// as `\x1b` so the file reads as plain text.
#[derive(Debug)]
pub struct FrameDump {
    out: BufWriter<File>,
    remaining: usize,
}

impl FrameDump {
    /// Truncate `path`, write the header and arm for `frames` frames.
    pub fn create(path: &Path, frames: usize) -> io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(HEADER)?;
        out.flush()?;
        Ok(Self {
            out,
            remaining: frames,
        })
    }

    /// Frames still to record.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether every requested frame has been recorded.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Append one frame followed by a blank line.
    pub fn record(&mut self, frame: &[u8]) -> io::Result<()> {
        if self.is_done() {
            return Ok(());
        }
        writeln!(self.out, "{}\n", frame.escape_ascii())?;
        self.out.flush()?;
        self.remaining -= 1;
        Ok(())
    }
}
