//! Color parsing and pixel packing.
//!
//! Colors arrive as compact CSS hex strings (`#RGB` or `#RRGGBB`) and are
//! packed once into the `u32` layout the pixel buffer stores, so the
//! rasterizer never touches strings.

use crate::error::{LifeviewError, Result};

/// Fully opaque alpha, shifted into the top byte of a packed pixel.
pub const OPAQUE: u32 = 0xFF << 24;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`.
    ///
    /// # Errors
    /// Returns [`LifeviewError::Configuration`] for anything else.
    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex(s).ok_or_else(|| {
            LifeviewError::Configuration(format!(
                "invalid color {s:?}: expected \"#RGB\" or \"#RRGGBB\""
            ))
        })
    }

    /// Pack into buffer order: `R | G<<8 | B<<16 | A<<24`, alpha always opaque.
    pub const fn pack(self) -> u32 {
        (self.r as u32) | (self.g as u32) << 8 | (self.b as u32) << 16 | OPAQUE
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            // #RGB - each digit doubled
            let r = u8::from_str_radix(hex.get(0..1)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(1..2)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(2..3)?, 16).ok()?;
            Some(Rgb::new(r * 0x11, g * 0x11, b * 0x11))
        }
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Parse a color string straight into a packed pixel.
///
/// # Errors
/// Returns [`LifeviewError::Configuration`] for malformed input.
pub fn parse_packed(s: &str) -> Result<u32> {
    Rgb::from_hex(s).map(Rgb::pack)
}

/// Default colors.
pub mod palette {
    pub const BLACK: &str = "#000000";
    pub const WHITE: &str = "#FFFFFF";

    /// Empty space behind the universe
    pub const BACKGROUND: &str = BLACK;

    /// Live cells
    pub const CELL: &str = WHITE;
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#FFF", Rgb::new(255, 255, 255) ; "short white")]
    #[test_case("#FFFFFF", Rgb::new(255, 255, 255) ; "long white")]
    #[test_case("#000", Rgb::new(0, 0, 0) ; "short black")]
    #[test_case("#1a2B3c", Rgb::new(0x1A, 0x2B, 0x3C) ; "mixed case")]
    #[test_case("#f80", Rgb::new(0xFF, 0x88, 0x00) ; "short orange")]
    fn parses_valid_hex(input: &str, expected: Rgb) {
        assert_eq!(Rgb::from_hex(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("FFF" ; "missing hash")]
    #[test_case("#FFFF" ; "four digits")]
    #[test_case("#GGGGGG" ; "not hex")]
    #[test_case("#+1+2+3" ; "sign characters")]
    #[test_case("#FFFFFFFF" ; "alpha form")]
    fn rejects_malformed(input: &str) {
        let err = Rgb::from_hex(input).unwrap_err();
        assert!(matches!(err, LifeviewError::Configuration(_)));
    }

    #[test]
    fn packs_little_endian_rgba() {
        let packed = Rgb::new(0x11, 0x22, 0x33).pack();
        assert_eq!(packed, 0xFF33_2211);
        assert_eq!(packed.to_le_bytes(), [0x11, 0x22, 0x33, 0xFF]);
    }

    #[test]
    fn background_and_foreground_are_opaque() {
        assert_eq!(parse_packed(palette::BACKGROUND).unwrap() >> 24, 0xFF);
        assert_eq!(parse_packed(palette::CELL).unwrap(), 0xFFFF_FFFF);
    }
}
