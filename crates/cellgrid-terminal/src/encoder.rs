//! Escape-sequence encoder.
//!
//! Turns a [`FrameDiff`] into the bytes that bring the terminal in line with
//! it. Minimizes output by:
//! - Skipping cursor positioning when the next cell follows the last one
//! - Using a relative forward move within a row
//! - Emitting colors only when they change
//! - Emitting style changes as precomputed transition sequences

use cellgrid_core::{Cell, CellOp, Color24, FrameDiff, GridSize, StyleTable};
use crossterm::cursor::{MoveRight, MoveTo};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use std::io::{self, Write};
use std::sync::Arc;

/// Cursor home in the form the init sequence has always used.
const HOME: &[u8] = b"\x1b[;H";

const SPACES: [u8; 256] = [b' '; 256];

/// Per-frame encoder statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Cells emitted (clears and draws).
    pub cells_written: usize,
    /// Explicit cursor positioning sequences (absolute or relative).
    pub cursor_moves: usize,
    /// Foreground or background color sequences.
    pub color_changes: usize,
    /// Style transition sequences.
    pub style_changes: usize,
}

/// Stateful encoder for one terminal.
///
/// Remembers the last cell it emitted, so cursor, colors and style are only
/// sent when they differ. After [`FrameEncoder::reset`] the encoder is
/// unanchored: the terminal was just initialized, the cursor is home and the
/// colors and style are the defaults, and the first cell is always
/// positioned absolutely.
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    table: Arc<StyleTable>,
    grid: GridSize,
    last: Cell,
    anchored: bool,
    stats: EncodeStats,
}

impl FrameEncoder {
    /// Create an encoder for `grid` sharing a prebuilt style table.
    #[must_use]
    pub fn new(table: Arc<StyleTable>, grid: GridSize) -> Self {
        Self {
            table,
            grid,
            last: Cell::blank(0),
            anchored: false,
            stats: EncodeStats::default(),
        }
    }

    /// Forget the codec state, as after writing the init sequence.
    pub fn reset(&mut self, grid: GridSize) {
        self.grid = grid;
        self.last = Cell::blank(0);
        self.anchored = false;
        self.stats = EncodeStats::default();
    }

    /// Grid the encoder positions against.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Statistics of the last [`FrameEncoder::encode`] call.
    #[must_use]
    pub const fn stats(&self) -> EncodeStats {
        self.stats
    }

    /// Last cell emitted.
    #[must_use]
    pub const fn last(&self) -> Cell {
        self.last
    }

    /// Append the bytes for every clear, then every draw, in `diff`.
    pub fn encode<W: Write>(&mut self, diff: &FrameDiff, out: &mut W) -> io::Result<()> {
        self.stats = EncodeStats::default();
        for op in diff.ops() {
            self.encode_op(op, out)?;
        }
        Ok(())
    }

    /// Append the bytes for a single operation.
    ///
    /// A clear is written as the blank cell so colors and style are back to
    /// their defaults under the space.
    pub fn encode_op<W: Write>(&mut self, op: CellOp, out: &mut W) -> io::Result<()> {
        let cell = op.cell();
        self.position(cell.index, out)?;

        if cell.fg != self.last.fg {
            queue!(out, SetForegroundColor(truecolor(cell.fg)))?;
            self.stats.color_changes += 1;
        }
        if cell.bg != self.last.bg {
            queue!(out, SetBackgroundColor(truecolor(cell.bg)))?;
            self.stats.color_changes += 1;
        }
        let style = self.table.sequence(self.last.style, cell.style);
        if !style.is_empty() {
            out.write_all(style)?;
            self.stats.style_changes += 1;
        }

        queue!(out, Print(cell.glyph))?;

        self.last = cell;
        self.anchored = true;
        self.stats.cells_written += 1;
        Ok(())
    }

    fn position<W: Write>(&mut self, index: usize, out: &mut W) -> io::Result<()> {
        if self.anchored {
            let last = self.last.index;
            if index == last + 1 {
                return Ok(());
            }
            if index > last && self.grid.row(index) == self.grid.row(last) {
                queue!(out, MoveRight((index - last - 1) as u16))?;
                self.stats.cursor_moves += 1;
                return Ok(());
            }
        }
        let (col, row) = self.grid.coords(index);
        queue!(out, MoveTo(col, row))?;
        self.stats.cursor_moves += 1;
        Ok(())
    }
}

/// Append the full-screen initialization sequence for `grid`.
///
/// Resets attributes, sets the default colors, paints every cell with a
/// space and homes the cursor.
pub fn write_init_sequence<W: Write>(grid: GridSize, out: &mut W) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(truecolor(Color24::DEFAULT_FG)),
        SetBackgroundColor(truecolor(Color24::DEFAULT_BG)),
    )?;
    let mut remaining = grid.cell_count();
    while remaining > 0 {
        let n = remaining.min(SPACES.len());
        out.write_all(&SPACES[..n])?;
        remaining -= n;
    }
    out.write_all(HOME)
}

const fn truecolor(color: Color24) -> CrosstermColor {
    CrosstermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
