//! Error types for cellgrid-terminal.

use thiserror::Error;

/// Errors that can occur while setting up or reconfiguring a canvas.
///
/// The per-frame path (`write_cell`, `flush`) never fails; these come from
/// construction, resize, configuration and the dump file.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// IO error from terminal or file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Grid dimensions that cannot be rendered.
    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A pipeline stage thread could not be started.
    #[error("Failed to spawn pipeline thread: {0}")]
    ThreadSpawn(std::io::Error),

    /// Terminal size could not be determined.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}

impl From<toml::de::Error> for CanvasError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
