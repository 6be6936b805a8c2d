//! Canvas configuration.

use crate::error::CanvasError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [`Canvas`](crate::Canvas).
///
/// Loadable from TOML; missing keys take their defaults.
///
/// ```toml
/// width = 120
/// height = 40
/// frame_capacity = 4800
/// dump_path = "frames.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Grid width in columns. 0 queries the terminal.
    pub width: u16,
    /// Grid height in rows. 0 queries the terminal.
    pub height: u16,
    /// Initial capacity of the per-frame cell lists.
    pub frame_capacity: usize,
    /// Initial capacity of each encoded write buffer, in bytes.
    pub write_capacity: usize,
    /// File that [`Canvas::dump_buffer`](crate::Canvas::dump_buffer) writes to.
    pub dump_path: PathBuf,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            frame_capacity: 1000,
            write_capacity: 16 * 1024,
            dump_path: PathBuf::from("BufferDump.txt"),
        }
    }
}

impl CanvasConfig {
    /// A fixed-size grid that never queries the terminal.
    #[must_use]
    pub fn fixed(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, CanvasError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CanvasError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, CanvasError> {
        toml::to_string(self).map_err(|e| CanvasError::Config(e.to_string()))
    }

    /// Check that capacities are usable.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.frame_capacity == 0 {
            return Err(CanvasError::Config(
                "frame_capacity must be non-zero".to_string(),
            ));
        }
        if self.write_capacity == 0 {
            return Err(CanvasError::Config(
                "write_capacity must be non-zero".to_string(),
            ));
        }
        if self.dump_path.as_os_str().is_empty() {
            return Err(CanvasError::Config("dump_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether either dimension defers to the terminal size.
    #[must_use]
    pub const fn queries_terminal(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CanvasConfig::default();
        assert_eq!(config.width, 0);
        assert_eq!(config.height, 0);
        assert_eq!(config.frame_capacity, 1000);
        assert_eq!(config.write_capacity, 16384);
        assert_eq!(config.dump_path, PathBuf::from("BufferDump.txt"));
        assert!(config.queries_terminal());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_fixed() {
        let config = CanvasConfig::fixed(80, 24);
        assert_eq!((config.width, config.height), (80, 24));
        assert!(!config.queries_terminal());
        assert_eq!(config.frame_capacity, 1000);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let config = CanvasConfig::from_toml_str("width = 120\nheight = 40\n").unwrap();
        assert_eq!(config.width, 120);
        assert_eq!(config.height, 40);
        assert_eq!(config.write_capacity, 16384);
    }

    #[test]
    fn test_config_from_toml_full() {
        let text = r#"
            width = 10
            height = 2
            frame_capacity = 20
            write_capacity = 256
            dump_path = "frames.txt"
        "#;
        let config = CanvasConfig::from_toml_str(text).unwrap();
        assert_eq!(config.frame_capacity, 20);
        assert_eq!(config.write_capacity, 256);
        assert_eq!(config.dump_path, PathBuf::from("frames.txt"));
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let err = CanvasConfig::from_toml_str("frame_capacity = 0").unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
        let err = CanvasConfig::from_toml_str("write_capacity = 0").unwrap_err();
        assert!(err.to_string().contains("write_capacity"));
    }

    #[test]
    fn test_config_rejects_empty_dump_path() {
        let config = CanvasConfig {
            dump_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        assert!(matches!(
            CanvasConfig::from_toml_str("width = \"wide\""),
            Err(CanvasError::Config(_))
        ));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = CanvasConfig::fixed(33, 7);
        let text = config.to_toml_string().unwrap();
        assert_eq!(CanvasConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = CanvasConfig::from_toml_file("/nonexistent/cellgrid.toml").unwrap_err();
        assert!(matches!(err, CanvasError::Io(_)));
    }
}
