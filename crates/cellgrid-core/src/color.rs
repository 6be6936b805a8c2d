//! 24-bit terminal colors.

use serde::{Deserialize, Serialize};

/// 24-bit RGB color as sent in truecolor SGR sequences.
///
/// Serialized as a `#rrggbb` hex string so configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color24 {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color24 {
    /// White (255, 255, 255).
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Black (0, 0, 0).
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Red (255, 0, 0).
    pub const RED: Self = Self::new(255, 0, 0);
    /// Green (0, 255, 0).
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Blue (0, 0, 255).
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Foreground every fresh screen is initialized with.
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Background every fresh screen is initialized with.
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Create a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        let component = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorParseError::InvalidHex)
        };
        Ok(Self::new(component(0..2)?, component(2..4)?, component(4..6)?))
    }

    /// Convert to a `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Color24 {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl TryFrom<String> for Color24 {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color24> for String {
    fn from(color: Color24) -> Self {
        color.to_hex()
    }
}

/// Error when parsing a color from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    /// Invalid hex characters
    InvalidHex,
    /// Invalid string length
    InvalidLength,
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHex => write!(f, "invalid hex characters"),
            Self::InvalidLength => write!(f, "invalid hex string length (expected 6 digits)"),
        }
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn test_color_defaults() {
        assert_eq!(Color24::DEFAULT_FG, Color24::new(255, 255, 255));
        assert_eq!(Color24::DEFAULT_BG, Color24::new(0, 0, 0));
        assert_ne!(Color24::DEFAULT_FG, Color24::DEFAULT_BG);
        assert_eq!(Cell::blank(0).bg, Color24::BLACK);
    }

    #[test]
    fn test_color_equality_is_componentwise() {
        assert_eq!(Color24::new(1, 2, 3), Color24::new(1, 2, 3));
        assert_ne!(Color24::new(1, 2, 3), Color24::new(1, 2, 4));
        assert_ne!(Color24::new(1, 2, 3), Color24::new(0, 2, 3));
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color24::from_hex("#ff0000"), Ok(Color24::RED));
        assert_eq!(Color24::from_hex("00ff00"), Ok(Color24::GREEN));
        assert_eq!(Color24::from_hex("#12ab9F"), Ok(Color24::new(0x12, 0xab, 0x9f)));
    }

    #[test]
    fn test_color_from_hex_errors() {
        assert_eq!(Color24::from_hex("#fff"), Err(ColorParseError::InvalidLength));
        assert_eq!(Color24::from_hex("#gg0000"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color24::from_hex("#ff00é"), Err(ColorParseError::InvalidHex));
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color24::new(0x0a, 0xbc, 0xff).to_hex(), "#0abcff");
        assert_eq!(String::from(Color24::BLACK), "#000000");
    }

    #[test]
    fn test_color_from_tuple() {
        assert_eq!(Color24::from((9, 8, 7)), Color24::new(9, 8, 7));
    }

    #[test]
    fn test_color_parse_error_display() {
        assert!(ColorParseError::InvalidHex.to_string().contains("hex"));
        assert!(ColorParseError::InvalidLength.to_string().contains("length"));
    }
}
