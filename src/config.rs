//! Render configuration.
//!
//! [`RenderConfig`] is the serializable form hosts and the CLI pass in;
//! [`RenderConfig::palette`] validates it once into the packed [`Palette`]
//! the rasterizer uses.

use serde::{Deserialize, Serialize};

use crate::error::{LifeviewError, Result};
use crate::render::colors::{palette, parse_packed, Rgb};

/// Host-facing render settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Background color, `#RGB` or `#RRGGBB`
    pub background: String,
    /// Live cell color, `#RGB` or `#RRGGBB`
    pub cell_color: String,
    /// Fraction of the cell width left as a gap between cells
    pub border_fraction: f64,
    /// Margin multiplier applied by autoframe
    pub overscan: f64,
    /// Cell width used when there is nothing to frame
    pub default_zoom: f64,
    /// Keyboard/button pan distance in logical pixels
    pub pan_step: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: palette::BACKGROUND.to_string(),
            cell_color: palette::CELL.to_string(),
            border_fraction: 0.1,
            overscan: 1.1,
            default_zoom: 16.0,
            pan_step: 50.0,
        }
    }
}

impl RenderConfig {
    /// Parse from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric ranges and colors.
    ///
    /// # Errors
    /// Returns [`LifeviewError::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.border_fraction) {
            return Err(LifeviewError::Configuration(format!(
                "borderFraction must be in [0, 0.5), got {}",
                self.border_fraction
            )));
        }
        if !(self.overscan.is_finite() && self.overscan >= 1.0) {
            return Err(LifeviewError::Configuration(format!(
                "overscan must be >= 1, got {}",
                self.overscan
            )));
        }
        if !(self.default_zoom.is_finite() && self.default_zoom > 0.0) {
            return Err(LifeviewError::Configuration(format!(
                "defaultZoom must be positive, got {}",
                self.default_zoom
            )));
        }
        if !self.pan_step.is_finite() {
            return Err(LifeviewError::Configuration(format!(
                "panStep must be finite, got {}",
                self.pan_step
            )));
        }
        Rgb::from_hex(&self.background)?;
        Rgb::from_hex(&self.cell_color)?;
        Ok(())
    }

    /// Resolve colors into packed pixels.
    ///
    /// # Errors
    /// Invalid colors or border fraction.
    pub fn palette(&self) -> Result<Palette> {
        self.validate()?;
        Ok(Palette {
            background: parse_packed(&self.background)?,
            cell: parse_packed(&self.cell_color)?,
            border_fraction: self.border_fraction,
        })
    }
}

/// Packed colors and cell geometry consumed by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: u32,
    pub cell: u32,
    pub border_fraction: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(0, 0, 0).pack(),
            cell: Rgb::new(0xFF, 0xFF, 0xFF).pack(),
            border_fraction: 0.1,
        }
    }
}

impl Palette {
    /// Gap in device pixels between adjacent cells at `cell_width`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn border(&self, cell_width: f64) -> i64 {
        (self.border_fraction * cell_width).floor() as i64
    }
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

    #[test]
    fn defaults_resolve_to_black_and_white() {
        let palette = RenderConfig::default().palette().unwrap();
        assert_eq!(palette, Palette::default());
        assert_eq!(palette.background, 0xFF00_0000);
        assert_eq!(palette.cell, 0xFFFF_FFFF);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RenderConfig::from_json(r##"{"cellColor": "#0f0", "panStep": 10}"##).unwrap();
        assert_eq!(config.cell_color, "#0f0");
        assert_eq!(config.pan_step, 10.0);
        assert_eq!(config.overscan, 1.1);
        assert_eq!(config.palette().unwrap().cell, 0xFF00_FF00);
    }

    #[test]
    fn bad_color_is_configuration_error() {
        let err = RenderConfig::from_json(r#"{"background": "black"}"#).unwrap_err();
        assert!(matches!(err, LifeviewError::Configuration(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = RenderConfig::from_json("{").unwrap_err();
        assert!(matches!(err, LifeviewError::Json(_)));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        for json in [
            r#"{"borderFraction": 0.5}"#,
            r#"{"overscan": 0.9}"#,
            r#"{"defaultZoom": 0}"#,
        ] {
            assert!(RenderConfig::from_json(json).is_err(), "{json}");
        }
    }

    #[test]
    fn border_floors_fraction() {
        let palette = Palette::default();
        assert_eq!(palette.border(10.0), 1);
        assert_eq!(palette.border(8.0), 0);
        assert_eq!(palette.border(16.0), 1);
        assert_eq!(palette.border(0.5), 0);
    }
}
