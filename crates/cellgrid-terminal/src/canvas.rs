//! Canvas façade.
//!
//! The application side of the renderer. Cell writes accumulate in a
//! pending map; [`Canvas::flush`] hands them to the render thread as one
//! frame. Rendering is immediate-mode: every frame describes the whole
//! screen, and anything not written since the last flush is cleared.

use crate::config::CanvasConfig;
use crate::dump::FrameDump;
use crate::error::CanvasError;
use crate::pipeline::Pipeline;
use crate::sink::{PlatformWrite, StdoutSink};
use crate::stats::PipelineStats;
use cellgrid_core::{Cell, CellMap, Color24, GridSize, StyleMask};

/// A terminal-sized grid of cells backed by a threaded render pipeline.
///
/// All mutators take `&mut self`; a canvas has a single producer.
pub struct Canvas {
    grid: GridSize,
    pending: CellMap,
    config: CanvasConfig,
    pipeline: Pipeline,
}

impl Canvas {
    /// Create a canvas that writes to stdout.
    ///
    /// Zero dimensions in `config` are taken from the terminal size.
    pub fn new(config: CanvasConfig) -> Result<Self, CanvasError> {
        Self::with_sink(config, StdoutSink::new())
    }

    /// Create a canvas that writes to `sink`.
    ///
    /// Starts the render and write threads and sends the init sequence.
    pub fn with_sink(
        config: CanvasConfig,
        sink: impl PlatformWrite + 'static,
    ) -> Result<Self, CanvasError> {
        config.validate()?;
        let grid = resolve_grid(config.width, config.height)?;
        let pipeline = Pipeline::start(grid, &config, Box::new(sink))?;
        pipeline.send_init(grid);

        Ok(Self {
            grid,
            pending: CellMap::with_capacity(grid.cell_count(), config.frame_capacity),
            config,
            pipeline,
        })
    }

    /// Grid width in columns.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.grid.width()
    }

    /// Grid height in rows.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Cells written since the last flush.
    #[must_use]
    pub const fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pending cell at `(x, y)`, after wrapping.
    #[must_use]
    pub fn pending_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.pending.get(self.grid.wrap_index(x, y)).copied()
    }

    /// Request `glyph` at `(x, y)` for the next frame.
    ///
    /// Coordinates wrap onto the grid. A space over the default background
    /// with no style is not stored, and drops any earlier write to the same
    /// cell this frame.
    pub fn write_cell(
        &mut self,
        x: i32,
        y: i32,
        glyph: char,
        fg: Color24,
        bg: Color24,
        style: StyleMask,
    ) {
        let index = self.grid.wrap_index(x, y);
        self.put(index, glyph, fg, bg, style);
    }

    /// Store a write at an already wrapped grid index, culling blanks.
    pub(crate) fn put(
        &mut self,
        index: usize,
        glyph: char,
        fg: Color24,
        bg: Color24,
        style: StyleMask,
    ) {
        let cell = Cell::new(index, glyph, fg, bg, style);
        if cell.is_blank() {
            self.pending.remove(index);
        } else {
            self.pending.insert(cell);
        }
    }

    /// Write `text` left to right starting at `(x, y)`, one cell per char.
    pub fn write_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Color24,
        bg: Color24,
        style: StyleMask,
    ) {
        let mut column = x;
        for glyph in text.chars() {
            self.write_cell(column, y, glyph, fg, bg, style);
            column = column.wrapping_add(1);
        }
    }

    /// Write `text` in the default colors with no style.
    pub fn write_str(&mut self, x: i32, y: i32, text: &str) {
        self.write_text(
            x,
            y,
            text,
            Color24::DEFAULT_FG,
            Color24::DEFAULT_BG,
            StyleMask::NONE,
        );
    }

    /// End the frame and hand it to the render thread.
    ///
    /// Blocks until the previous frame has been rendered. Returns once the
    /// frame is queued, not once it is on screen.
    pub fn flush(&mut self) {
        self.pipeline.submit(&mut self.pending);
    }

    /// Change the grid size and reinitialize the terminal.
    ///
    /// A zero dimension is taken from the terminal size. Waits for both
    /// stages to go idle, discards pending writes and everything believed
    /// to be on screen, and sends the init sequence. The next frame is
    /// drawn in full.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), CanvasError> {
        let grid = resolve_grid(width, height)?;
        self.pipeline.reset(grid);
        self.pending.reset_grid(grid.cell_count());
        self.grid = grid;
        self.config.width = width;
        self.config.height = height;
        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            "canvas resized"
        );
        Ok(())
    }

    /// Record the next `frames` non-empty encoded frames to the dump file.
    ///
    /// The file at `dump_path` is truncated and given a header right away.
    pub fn dump_buffer(&mut self, frames: usize) -> Result<(), CanvasError> {
        let dump = FrameDump::create(&self.config.dump_path, frames)?;
        self.pipeline.start_dump(dump);
        tracing::debug!(
            frames,
            path = %self.config.dump_path.display(),
            "buffer dump armed"
        );
        Ok(())
    }

    /// Block until every flushed frame has reached the sink.
    pub fn wait_idle(&self) {
        self.pipeline.wait_idle();
    }

    /// Snapshot of the pipeline counters.
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("grid", &self.grid)
            .field("pending", &self.pending.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Resolve requested dimensions, querying the terminal for zeros.
fn resolve_grid(width: u16, height: u16) -> Result<GridSize, CanvasError> {
    if width != 0 && height != 0 {
        return Ok(GridSize::new(width, height));
    }
    let (cols, rows) =
        crossterm::terminal::size().map_err(|_| CanvasError::TerminalNotAvailable)?;
    let width = if width == 0 { cols } else { width };
    let height = if height == 0 { rows } else { height };
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidGeometry { width, height });
    }
    Ok(GridSize::new(width, height))
}
