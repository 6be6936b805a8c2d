//! Core types for the cellgrid terminal renderer.
//!
//! This crate provides the pure, thread-agnostic parts of the renderer:
//! - Colors and cells: [`Color24`], [`Cell`], [`CellMap`]
//! - Style attributes and the SGR transition codec: [`StyleMask`], [`StyleTable`]
//! - Grid arithmetic: [`GridSize`]
//! - Frame diffing: [`reconcile`], [`DiffEngine`], [`FrameDiff`]

mod cell;
mod color;
mod diff;
mod grid;
mod style;

pub use cell::{Cell, CellMap};
pub use color::{Color24, ColorParseError};
pub use diff::{reconcile, CellOp, DiffEngine, FrameDiff};
pub use grid::GridSize;
pub use style::{pack, transition, unpack, Attribute, StyleMask, StyleTable};
