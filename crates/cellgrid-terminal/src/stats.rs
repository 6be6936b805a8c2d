//! Pipeline statistics.
//!
//! Counters are updated by whichever stage owns the measured event and read
//! as a [`PipelineStats`] snapshot. Nothing in the pipeline branches on them.

use crate::encoder::EncodeStats;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Aggregated durations of one spin-wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitStats {
    /// Most recent wait.
    pub last: Duration,
    /// Sum of all waits.
    pub total: Duration,
    /// Longest wait.
    pub max: Duration,
    /// Number of waits.
    pub count: u64,
}

impl WaitStats {
    /// Average wait.
    #[must_use]
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((self.total.as_nanos() / u128::from(self.count)) as u64)
        }
    }
}

/// Snapshot of the pipeline's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Producer waiting in `flush` for the render stage to go idle.
    pub producer_wait: WaitStats,
    /// Render thread waiting for a frame.
    pub render_wait: WaitStats,
    /// Render thread waiting for the write stage to go idle.
    pub render_write_wait: WaitStats,
    /// Write thread waiting for output.
    pub writer_wait: WaitStats,
    /// Frames handed off by `flush`.
    pub frames_flushed: u64,
    /// Frames diffed and encoded.
    pub frames_rendered: u64,
    /// Sink calls made.
    pub writes: u64,
    /// Bytes passed to the sink.
    pub bytes_written: u64,
    /// Sink calls that returned an error.
    pub write_errors: u64,
    /// Encoder statistics of the last rendered frame.
    pub last_frame: EncodeStats,
}

#[derive(Debug, Default)]
pub(crate) struct WaitCounter {
    last_ns: AtomicU64,
    total_ns: AtomicU64,
    max_ns: AtomicU64,
    count: AtomicU64,
}

impl WaitCounter {
    pub(crate) fn record(&self, waited: Duration) {
        let ns = waited.as_nanos().min(u128::from(u64::MAX)) as u64;
        self.last_ns.store(ns, Ordering::Relaxed);
        self.total_ns.fetch_add(ns, Ordering::Relaxed);
        self.max_ns.fetch_max(ns, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> WaitStats {
        WaitStats {
            last: Duration::from_nanos(self.last_ns.load(Ordering::Relaxed)),
            total: Duration::from_nanos(self.total_ns.load(Ordering::Relaxed)),
            max: Duration::from_nanos(self.max_ns.load(Ordering::Relaxed)),
            count: self.count.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) producer_wait: WaitCounter,
    pub(crate) render_wait: WaitCounter,
    pub(crate) render_write_wait: WaitCounter,
    pub(crate) writer_wait: WaitCounter,
    pub(crate) frames_flushed: AtomicU64,
    pub(crate) frames_rendered: AtomicU64,
    pub(crate) writes: AtomicU64,
    pub(crate) bytes_written: AtomicU64,
    pub(crate) write_errors: AtomicU64,
    last_cells_written: AtomicUsize,
    last_cursor_moves: AtomicUsize,
    last_color_changes: AtomicUsize,
    last_style_changes: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn record_frame(&self, encoded: EncodeStats) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
        self.last_cells_written
            .store(encoded.cells_written, Ordering::Relaxed);
        self.last_cursor_moves
            .store(encoded.cursor_moves, Ordering::Relaxed);
        self.last_color_changes
            .store(encoded.color_changes, Ordering::Relaxed);
        self.last_style_changes
            .store(encoded.style_changes, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            producer_wait: self.producer_wait.snapshot(),
            render_wait: self.render_wait.snapshot(),
            render_write_wait: self.render_write_wait.snapshot(),
            writer_wait: self.writer_wait.snapshot(),
            frames_flushed: self.frames_flushed.load(Ordering::Relaxed),
            frames_rendered: self.frames_rendered.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            last_frame: EncodeStats {
                cells_written: self.last_cells_written.load(Ordering::Relaxed),
                cursor_moves: self.last_cursor_moves.load(Ordering::Relaxed),
                color_changes: self.last_color_changes.load(Ordering::Relaxed),
                style_changes: self.last_style_changes.load(Ordering::Relaxed),
            },
        }
    }
}
