//! Three-stage render pipeline.
//!
//! ```text
//!  producer ──frames──▶ render thread ──writes──▶ write thread ──▶ sink
//!  (Canvas)   (2 slots)  diff + encode   (2 slots)  one write call
//! ```
//!
//! Each boundary is a [`DoubleBuffer`] plus a request flag. The upstream
//! side fills the back slot, waits until the downstream side has cleared
//! its flag, swaps, and raises the flag again. Waits spin with
//! `thread::yield_now` instead of parking, trading idle CPU for wake-up
//! latency.

use crate::config::CanvasConfig;
use crate::double_buffer::DoubleBuffer;
use crate::dump::FrameDump;
use crate::encoder::{write_init_sequence, FrameEncoder};
use crate::error::CanvasError;
use crate::sink::PlatformWrite;
use crate::stats::{PipelineStats, StatsCounters};
use cellgrid_core::{CellMap, DiffEngine, FrameDiff, GridSize, StyleTable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One frame handed from the producer to the render thread.
#[derive(Debug)]
struct FrameSlot {
    pending: CellMap,
    diff: FrameDiff,
    grid: GridSize,
}

impl FrameSlot {
    fn new(grid: GridSize, capacity: usize) -> Self {
        Self {
            pending: CellMap::with_capacity(grid.cell_count(), capacity),
            diff: FrameDiff::with_capacity(capacity),
            grid,
        }
    }
}

/// State shared by the producer and both stage threads.
#[derive(Debug)]
struct Shared {
    frames: DoubleBuffer<FrameSlot>,
    writes: DoubleBuffer<Vec<u8>>,
    render_requested: AtomicBool,
    write_requested: AtomicBool,
    /// Set by a resize; the render thread drops its on-screen set and codec
    /// state before the next frame.
    reset_requested: AtomicBool,
    shutdown: AtomicBool,
    dump: Mutex<Option<FrameDump>>,
    stats: StatsCounters,
}

/// Owner of the render and write threads.
///
/// Dropping it lets in-flight work finish, then stops and joins both
/// threads.
pub(crate) struct Pipeline {
    shared: Arc<Shared>,
    render: Option<JoinHandle<()>>,
    write: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Start both stage threads.
    pub(crate) fn start(
        grid: GridSize,
        config: &CanvasConfig,
        sink: Box<dyn PlatformWrite>,
    ) -> Result<Self, CanvasError> {
        let shared = Arc::new(Shared {
            frames: DoubleBuffer::new(
                FrameSlot::new(grid, config.frame_capacity),
                FrameSlot::new(grid, config.frame_capacity),
            ),
            writes: DoubleBuffer::new(
                Vec::with_capacity(config.write_capacity),
                Vec::with_capacity(config.write_capacity),
            ),
            render_requested: AtomicBool::new(false),
            write_requested: AtomicBool::new(false),
            reset_requested: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            dump: Mutex::new(None),
            stats: StatsCounters::default(),
        });

        let mut pipeline = Self {
            shared,
            render: None,
            write: None,
        };

        let table = Arc::new(StyleTable::new());
        let render_stage = RenderStage {
            shared: Arc::clone(&pipeline.shared),
            engine: DiffEngine::new(grid.cell_count(), config.frame_capacity),
            encoder: FrameEncoder::new(table, grid),
        };
        pipeline.render = Some(
            thread::Builder::new()
                .name("cellgrid-render".to_string())
                .spawn(move || render_stage.run())
                .map_err(CanvasError::ThreadSpawn)?,
        );

        let write_stage = WriteStage {
            shared: Arc::clone(&pipeline.shared),
            sink,
        };
        pipeline.write = Some(
            thread::Builder::new()
                .name("cellgrid-write".to_string())
                .spawn(move || write_stage.run())
                .map_err(CanvasError::ThreadSpawn)?,
        );

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            "render pipeline started"
        );
        Ok(pipeline)
    }

    /// Hand `pending` to the render thread and leave it empty.
    ///
    /// Blocks until the previous frame has been rendered.
    pub(crate) fn submit(&self, pending: &mut CellMap) {
        let shared = &*self.shared;
        let waited = spin_until(|| !shared.render_requested.load(Ordering::Acquire));
        shared.stats.producer_wait.record(waited);

        {
            let mut back = shared.frames.back();
            std::mem::swap(&mut back.pending, pending);
            back.diff.clear();
        }
        pending.clear();

        shared.frames.swap();
        shared.stats.frames_flushed.fetch_add(1, Ordering::Relaxed);
        shared.render_requested.store(true, Ordering::Release);
    }

    /// Reset both frame slots and the render thread's state for `grid`,
    /// then send the init sequence through the write stage.
    ///
    /// Blocks until neither stage has work in flight.
    pub(crate) fn reset(&self, grid: GridSize) {
        self.wait_idle();
        let shared = &*self.shared;
        shared.frames.for_each(|slot| {
            slot.pending.reset_grid(grid.cell_count());
            slot.diff.clear();
            slot.grid = grid;
        });
        shared.reset_requested.store(true, Ordering::Release);
        self.send_init(grid);
    }

    /// Queue the full-screen init sequence for the write stage.
    ///
    /// Must only be called while the render stage is idle.
    pub(crate) fn send_init(&self, grid: GridSize) {
        let shared = &*self.shared;
        spin_until(|| !shared.write_requested.load(Ordering::Acquire));
        {
            let mut back = shared.writes.back();
            back.clear();
            // Writing into a Vec cannot fail.
            let _ = write_init_sequence(grid, &mut *back);
        }
        shared.writes.swap();
        shared.write_requested.store(true, Ordering::Release);
    }

    /// Arm `dump`; the write stage records frames into it until it is done.
    pub(crate) fn start_dump(&self, dump: FrameDump) {
        *self
            .shared
            .dump
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(dump);
    }

    /// Block until no frame is in flight in either stage.
    pub(crate) fn wait_idle(&self) {
        let shared = &*self.shared;
        let render_done = finished(self.render.as_ref());
        let write_done = finished(self.write.as_ref());
        spin_until(|| {
            let render_idle = !shared.render_requested.load(Ordering::Acquire) || render_done();
            let write_idle = !shared.write_requested.load(Ordering::Acquire) || write_done();
            render_idle && write_idle
        });
    }

    /// Snapshot of the counters.
    pub(crate) fn stats(&self) -> PipelineStats {
        self.shared.stats.snapshot()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.wait_idle();
        self.shared.shutdown.store(true, Ordering::Release);
        for handle in [self.render.take(), self.write.take()].into_iter().flatten() {
            if handle.join().is_err() {
                tracing::warn!("pipeline thread panicked");
            }
        }
        tracing::info!("render pipeline stopped");
    }
}

/// Render thread state: the on-screen set and the codec state live here and
/// nowhere else.
struct RenderStage {
    shared: Arc<Shared>,
    engine: DiffEngine,
    encoder: FrameEncoder,
}

impl RenderStage {
    fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        loop {
            let waited = spin_until(|| {
                shared.render_requested.load(Ordering::Acquire)
                    || shared.shutdown.load(Ordering::Acquire)
            });
            if !shared.render_requested.load(Ordering::Acquire) {
                break;
            }
            shared.stats.render_wait.record(waited);

            self.render_frame(&shared);

            let waited = spin_until(|| !shared.write_requested.load(Ordering::Acquire));
            shared.stats.render_write_wait.record(waited);
            shared.writes.swap();
            shared.write_requested.store(true, Ordering::Release);
            shared.render_requested.store(false, Ordering::Release);
        }
    }

    fn render_frame(&mut self, shared: &Shared) {
        let mut front = shared.frames.front();
        let slot = &mut *front;

        if shared.reset_requested.swap(false, Ordering::AcqRel) {
            self.engine.reset(slot.grid.cell_count());
            self.encoder.reset(slot.grid);
            tracing::debug!(
                width = slot.grid.width(),
                height = slot.grid.height(),
                "render state reset"
            );
        }

        self.engine.reconcile(&slot.pending, &mut slot.diff);

        let mut out = shared.writes.back();
        out.clear();
        // Writing into a Vec cannot fail.
        let _ = self.encoder.encode(&slot.diff, &mut *out);

        let encoded = self.encoder.stats();
        shared.stats.record_frame(encoded);
        tracing::trace!(
            cleared = slot.diff.to_clear.len(),
            drawn = slot.diff.to_draw.len(),
            skipped = slot.diff.to_skip.len(),
            bytes = out.len(),
            "frame rendered"
        );
    }
}

struct WriteStage {
    shared: Arc<Shared>,
    sink: Box<dyn PlatformWrite>,
}

impl WriteStage {
    fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        loop {
            let waited = spin_until(|| {
                shared.write_requested.load(Ordering::Acquire)
                    || shared.shutdown.load(Ordering::Acquire)
            });
            if !shared.write_requested.load(Ordering::Acquire) {
                break;
            }
            shared.stats.writer_wait.record(waited);

            {
                let front = shared.writes.front();
                if !front.is_empty() {
                    self.write_frame(&shared, &front);
                }
            }

            shared.write_requested.store(false, Ordering::Release);
        }
    }

    fn write_frame(&mut self, shared: &Shared, bytes: &[u8]) {
        match self.sink.platform_write(bytes) {
            Ok(()) => {
                shared.stats.writes.fetch_add(1, Ordering::Relaxed);
                shared
                    .stats
                    .bytes_written
                    .fetch_add(bytes.len() as u64, Ordering::Relaxed);
            }
            Err(err) => {
                shared.stats.write_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, bytes = bytes.len(), "terminal write failed");
            }
        }

        let mut dump = shared.dump.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = dump.as_mut() {
            if let Err(err) = active.record(bytes) {
                tracing::warn!(error = %err, "buffer dump failed, disarming");
                *dump = None;
            } else if active.is_done() {
                tracing::debug!("buffer dump complete");
                *dump = None;
            }
        }
    }
}

fn spin_until(mut ready: impl FnMut() -> bool) -> Duration {
    let start = Instant::now();
    while !ready() {
        thread::yield_now();
    }
    start.elapsed()
}

/// Liveness probe for a stage thread; a missing or exited thread never
/// holds a flag again.
fn finished(handle: Option<&JoinHandle<()>>) -> impl Fn() -> bool + '_ {
    move || handle.map_or(true, JoinHandle::is_finished)
}
