//! Terminal renderer for cellgrid.
//!
//! Keeps a logical grid of cells in sync with a truecolor terminal while
//! writing as few bytes as possible. Each frame passes through three
//! stages:
//!
//! 1. the application writes cells into a [`Canvas`] and calls
//!    [`Canvas::flush`];
//! 2. a render thread diffs the frame against what is on screen and encodes
//!    the changes as escape sequences;
//! 3. a write thread hands the encoded frame to a [`PlatformWrite`] sink in
//!    a single call.
//!
//! Stages hand work over through double buffers, so diffing frame *n* can
//! overlap writing frame *n − 1*.
//!
//! # Example
//!
//! ```no_run
//! use cellgrid_terminal::{Canvas, CanvasConfig, Color24, StyleMask};
//!
//! let mut canvas = Canvas::new(CanvasConfig::default())?;
//! canvas.write_text(0, 0, "hello", Color24::GREEN, Color24::BLACK, StyleMask::BOLD);
//! canvas.draw_box(0, 1, 20, 5, Some("box"));
//! canvas.flush();
//! # Ok::<(), cellgrid_terminal::CanvasError>(())
//! ```

mod canvas;
mod config;
mod double_buffer;
mod draw;
mod dump;
mod encoder;
mod error;
mod pipeline;
mod sink;
mod stats;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use double_buffer::DoubleBuffer;
pub use draw::BorderStyle;
pub use dump::FrameDump;
pub use encoder::{write_init_sequence, EncodeStats, FrameEncoder};
pub use error::CanvasError;
pub use sink::{CaptureSink, PlatformWrite, StdoutSink};
pub use stats::{PipelineStats, WaitStats};

pub use cellgrid_core::{Attribute, Cell, Color24, GridSize, StyleMask};
