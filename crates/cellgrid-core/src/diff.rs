//! Frame diffing.
//!
//! Reduces "what is on screen" and "what this frame asks for" to the cells
//! that must be blanked and the cells that must be drawn:
//!
//! ```text
//! to_skip  = on_screen ∩ pending            (full value equality)
//! to_clear = indices(on_screen) − indices(to_skip)
//! to_draw  = pending − to_skip
//! on_screen' = to_skip ∪ to_draw            (= pending)
//! ```
//!
//! Output order follows insertion order of the source maps. Nothing is
//! sorted: the application's left-to-right write order is what keeps
//! consecutive indices adjacent for the encoder's cursor-advance shortcut.

use crate::cell::{Cell, CellMap};

/// One encoder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOp {
    /// Blank the cell at this index.
    Clear(usize),
    /// Write this cell.
    Draw(Cell),
}

impl CellOp {
    /// The cell the terminal shows after the operation.
    #[must_use]
    pub const fn cell(self) -> Cell {
        match self {
            Self::Clear(index) => Cell::blank(index),
            Self::Draw(cell) => cell,
        }
    }
}

/// The clear/draw/skip lists produced for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiff {
    /// Synthetic blank cells for on-screen positions that are not kept.
    pub to_clear: Vec<Cell>,
    /// Requested cells that are not already on screen.
    pub to_draw: Vec<Cell>,
    /// Requested cells that are already on screen unchanged.
    pub to_skip: Vec<Cell>,
}

impl FrameDiff {
    /// Create empty lists with room for `capacity` cells each.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_clear: Vec::with_capacity(capacity),
            to_draw: Vec::with_capacity(capacity),
            to_skip: Vec::with_capacity(capacity),
        }
    }

    /// Empty all three lists, keeping allocations.
    pub fn clear(&mut self) {
        self.to_clear.clear();
        self.to_draw.clear();
        self.to_skip.clear();
    }

    /// Whether the frame changes nothing on screen.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_clear.is_empty() && self.to_draw.is_empty()
    }

    /// Encoder operations in emission order: all clears, then all draws.
    pub fn ops(&self) -> impl Iterator<Item = CellOp> + '_ {
        self.to_clear
            .iter()
            .map(|cell| CellOp::Clear(cell.index))
            .chain(self.to_draw.iter().copied().map(CellOp::Draw))
    }
}

/// Reconcile `pending` against `on_screen`, filling `out` and updating
/// `on_screen` to the new truth.
///
/// An empty `on_screen` (first frame, or right after a resize) turns every
/// pending cell into a draw.
pub fn reconcile(on_screen: &mut CellMap, pending: &CellMap, out: &mut FrameDiff) {
    out.clear();

    if on_screen.cell_count() != pending.cell_count() {
        on_screen.reset_grid(pending.cell_count());
    }

    if on_screen.is_empty() {
        out.to_draw.extend(pending.iter().copied());
        on_screen.copy_from(pending);
        return;
    }

    for cell in pending.iter() {
        if on_screen.contains(cell) {
            out.to_skip.push(*cell);
        } else {
            out.to_draw.push(*cell);
        }
    }

    for cell in on_screen.iter() {
        if !pending.contains(cell) {
            out.to_clear.push(Cell::blank(cell.index));
        }
    }

    on_screen.copy_from(pending);
}

/// Owner of the on-screen set.
///
/// Lives on the render thread; nothing else touches the set.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    on_screen: CellMap,
}

impl DiffEngine {
    /// Create an engine for a grid of `cell_count` cells.
    #[must_use]
    pub fn new(cell_count: usize, capacity: usize) -> Self {
        Self {
            on_screen: CellMap::with_capacity(cell_count, capacity),
        }
    }

    /// Cells believed to be on screen.
    #[must_use]
    pub const fn on_screen(&self) -> &CellMap {
        &self.on_screen
    }

    /// Forget the on-screen set and re-key it for `cell_count` cells.
    ///
    /// The next frame is reconciled as a first frame.
    pub fn reset(&mut self, cell_count: usize) {
        self.on_screen.reset_grid(cell_count);
    }

    /// See [`reconcile`].
    pub fn reconcile(&mut self, pending: &CellMap, out: &mut FrameDiff) {
        reconcile(&mut self.on_screen, pending, out);
    }
}
