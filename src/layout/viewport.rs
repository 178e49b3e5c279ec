//! Viewport state and coordinate transforms.
//!
//! Three coordinate spaces meet here:
//! - logical (CSS) pixels, as reported by pointer events
//! - device pixels, the size of the pixel buffer (`logical * pixel_ratio`)
//! - cell coordinates of the universe
//!
//! `offset_x/offset_y` is the device-pixel position of cell `(0, 0)`'s
//! top-left corner.

use serde::Serialize;

/// Camera state: translation, zoom and canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Device-pixel x of cell (0, 0)
    pub offset_x: i64,
    /// Device-pixel y of cell (0, 0)
    pub offset_y: i64,
    /// Device pixels per cell; always a power of two
    pub cell_width: f64,
    /// Device pixels per logical pixel
    pub pixel_ratio: f64,
    /// Canvas width in device pixels
    pub canvas_width: u32,
    /// Canvas height in device pixels
    pub canvas_height: u32,
}

/// Serializable snapshot handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    pub offset_x: i64,
    pub offset_y: i64,
    pub cell_width: f64,
    pub pixel_ratio: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a viewport at zoom 1 with no canvas yet.
    pub fn new() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            cell_width: 1.0,
            pixel_ratio: 1.0,
            canvas_width: 0,
            canvas_height: 0,
        }
    }

    /// Create a viewport for a canvas of the given device size.
    pub fn with_canvas(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..Self::new()
        }
    }

    /// Convert cell coordinates to device pixels (top-left corner of the cell).
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_to_pixel(&self, cx: i64, cy: i64) -> (f64, f64) {
        (
            cx as f64 * self.cell_width + self.offset_x as f64,
            cy as f64 * self.cell_width + self.offset_y as f64,
        )
    }

    /// Convert logical (CSS) pixels to the cell under them.
    pub fn pixel_to_cell(&self, px: f64, py: f64) -> (i64, i64) {
        self.device_to_cell(px * self.pixel_ratio, py * self.pixel_ratio)
    }

    /// Convert device pixels to the cell under them.
    ///
    /// Exact inverse of [`Self::cell_to_pixel`] while `cell_width >= 1`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn device_to_cell(&self, px: f64, py: f64) -> (i64, i64) {
        (
            ((px - self.offset_x as f64) / self.cell_width).floor() as i64,
            ((py - self.offset_y as f64) / self.cell_width).floor() as i64,
        )
    }

    /// Resize from logical dimensions.
    ///
    /// Returns true when the device-pixel size actually changed, in which
    /// case the pixel buffer must be reallocated. Non-positive or non-finite
    /// sizes are ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let device_w = (width * self.pixel_ratio).round();
        let device_h = (height * self.pixel_ratio).round();
        if !(device_w.is_finite() && device_h.is_finite()) || device_w < 1.0 || device_h < 1.0 {
            return false;
        }
        let (w, h) = (
            device_w.min(f64::from(u32::MAX)) as u32,
            device_h.min(f64::from(u32::MAX)) as u32,
        );
        if w == self.canvas_width && h == self.canvas_height {
            return false;
        }
        self.canvas_width = w;
        self.canvas_height = h;
        true
    }

    /// Update the device pixel ratio. Ignored unless finite and positive.
    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        if ratio.is_finite() && ratio > 0.0 {
            self.pixel_ratio = ratio;
        }
    }

    /// Device-pixel center of the canvas.
    pub fn center(&self) -> (i64, i64) {
        (
            i64::from(self.canvas_width >> 1),
            i64::from(self.canvas_height >> 1),
        )
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            cell_width: self.cell_width,
            pixel_ratio: self.pixel_ratio,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
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
    fn new_viewport_starts_at_zoom_one() {
        let vp = Viewport::new();
        assert_eq!(vp.cell_width, 1.0);
        assert_eq!(vp.pixel_ratio, 1.0);
        assert_eq!((vp.canvas_width, vp.canvas_height), (0, 0));
    }

    #[test]
    fn cell_to_pixel_applies_zoom_and_offset() {
        let mut vp = Viewport::with_canvas(100, 100);
        vp.cell_width = 8.0;
        vp.offset_x = 50;
        vp.offset_y = 20;
        assert_eq!(vp.cell_to_pixel(0, 0), (50.0, 20.0));
        assert_eq!(vp.cell_to_pixel(-2, 3), (34.0, 44.0));
    }

    #[test]
    fn pixel_to_cell_scales_logical_input() {
        let mut vp = Viewport::with_canvas(200, 200);
        vp.pixel_ratio = 2.0;
        vp.cell_width = 4.0;
        vp.offset_x = 100;
        vp.offset_y = 100;
        // logical 50 -> device 100 -> cell 0
        assert_eq!(vp.pixel_to_cell(50.0, 50.0), (0, 0));
        // logical 49.5 -> device 99 -> cell -1
        assert_eq!(vp.pixel_to_cell(49.5, 51.0), (-1, 0));
        assert_eq!(vp.pixel_to_cell(54.0, 46.0), (2, -2));
    }

    #[test]
    fn device_to_cell_floors_at_sub_pixel_zoom() {
        let mut vp = Viewport::with_canvas(100, 100);
        vp.cell_width = 0.25;
        assert_eq!(vp.device_to_cell(1.0, 0.0), (4, 0));
        assert_eq!(vp.device_to_cell(-1.0, 0.5), (-4, 2));
    }

    #[test]
    fn resize_uses_pixel_ratio_and_reports_change() {
        let mut vp = Viewport::new();
        vp.set_pixel_ratio(1.5);
        assert!(vp.resize(101.0, 50.0));
        assert_eq!((vp.canvas_width, vp.canvas_height), (152, 75));
        assert!(!vp.resize(101.0, 50.0));
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let mut vp = Viewport::with_canvas(10, 10);
        assert!(!vp.resize(0.0, 10.0));
        assert!(!vp.resize(10.0, -3.0));
        assert!(!vp.resize(f64::NAN, 10.0));
        assert_eq!((vp.canvas_width, vp.canvas_height), (10, 10));
    }

    #[test]
    fn invalid_pixel_ratio_is_ignored() {
        let mut vp = Viewport::new();
        vp.set_pixel_ratio(0.0);
        vp.set_pixel_ratio(f64::INFINITY);
        vp.set_pixel_ratio(-2.0);
        assert_eq!(vp.pixel_ratio, 1.0);
    }

    #[test]
    fn center_uses_integer_halves() {
        let vp = Viewport::with_canvas(101, 40);
        assert_eq!(vp.center(), (50, 20));
    }
}
