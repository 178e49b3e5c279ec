//! Camera operations: pan, power-of-two zoom and autoframe.
//!
//! Zoom only ever doubles or halves `cell_width`, so every zoom level is
//! `2^k` and independent zoom sequences line up exactly. Each step moves the
//! offset so the anchor pixel keeps showing the same content.

use super::Viewport;
use crate::universe::Bounds;

/// Smallest zoom exponent: `cell_width >= 2^MIN_ZOOM_EXP`.
pub const MIN_ZOOM_EXP: i32 = -32;
/// Largest zoom exponent: `cell_width <= 2^MAX_ZOOM_EXP`.
pub const MAX_ZOOM_EXP: i32 = 16;

fn min_cell_width() -> f64 {
    2f64.powi(MIN_ZOOM_EXP)
}

fn max_cell_width() -> f64 {
    2f64.powi(MAX_ZOOM_EXP)
}

/// Round to a device-pixel offset. NaN maps to 0.
#[allow(clippy::cast_possible_truncation)]
fn to_offset(v: f64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    v.round() as i64
}

/// Pan direction for keyboard/button nudges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a host direction name (`"up"`, `"down"`, `"left"`, `"right"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Offset delta, in logical pixels, that moves the view `step` in this direction.
    ///
    /// Looking further up means the content slides down.
    pub fn delta(self, step: f64) -> (f64, f64) {
        match self {
            Self::Up => (0.0, step),
            Self::Down => (0.0, -step),
            Self::Left => (step, 0.0),
            Self::Right => (-step, 0.0),
        }
    }
}

/// Snap a scale factor to a power of two.
///
/// Above 1 this is the largest `2^k <= factor`; at or below 1 it halves from
/// 1 until it is `<= factor`. The result stays inside the zoom limits.
pub fn snap_power_of_two(factor: f64) -> f64 {
    let mut zoom = 1.0;
    if factor > 1.0 {
        while zoom * 2.0 <= factor && zoom * 2.0 <= max_cell_width() {
            zoom *= 2.0;
        }
    } else {
        while zoom > factor && zoom / 2.0 >= min_cell_width() {
            zoom /= 2.0;
        }
    }
    zoom
}

impl Viewport {
    /// Zoom one step around a device-pixel anchor.
    ///
    /// Steps that would leave the zoom limits are ignored.
    #[allow(clippy::cast_precision_loss)]
    pub fn zoom(&mut self, out: bool, anchor_x: i64, anchor_y: i64) {
        if out {
            if self.cell_width * 0.5 < min_cell_width() {
                return;
            }
            let dx = self.offset_x as f64 - anchor_x as f64;
            let dy = self.offset_y as f64 - anchor_y as f64;
            self.offset_x = to_offset(self.offset_x as f64 - (dx * 0.5).round());
            self.offset_y = to_offset(self.offset_y as f64 - (dy * 0.5).round());
            self.cell_width *= 0.5;
        } else {
            if self.cell_width * 2.0 > max_cell_width() {
                return;
            }
            let dx = self.offset_x as f64 - anchor_x as f64;
            let dy = self.offset_y as f64 - anchor_y as f64;
            self.offset_x = to_offset(self.offset_x as f64 + dx);
            self.offset_y = to_offset(self.offset_y as f64 + dy);
            self.cell_width *= 2.0;
        }
    }

    /// Zoom one step around the canvas center.
    pub fn zoom_centered(&mut self, out: bool) {
        let (cx, cy) = self.center();
        self.zoom(out, cx, cy);
    }

    /// Zoom one step around a logical-pixel point (e.g. the pointer).
    pub fn zoom_at(&mut self, out: bool, x: f64, y: f64) {
        let ax = to_offset(x * self.pixel_ratio);
        let ay = to_offset(y * self.pixel_ratio);
        self.zoom(out, ax, ay);
    }

    /// Step the zoom toward `target` one centered step at a time.
    ///
    /// Ends with `cell_width <= target < 2 * cell_width` (within the zoom
    /// limits). Stepping keeps the center fixed at every intermediate level.
    pub fn zoom_to(&mut self, target: f64) {
        if !(target.is_finite() && target > 0.0) {
            return;
        }
        while self.cell_width > target {
            let before = self.cell_width;
            self.zoom_centered(true);
            if self.cell_width >= before {
                break;
            }
        }
        while self.cell_width * 2.0 <= target {
            let before = self.cell_width;
            self.zoom_centered(false);
            if self.cell_width <= before {
                break;
            }
        }
    }

    /// Put cell (0, 0) at the canvas center.
    pub fn center_view(&mut self) {
        let (cx, cy) = self.center();
        self.offset_x = cx;
        self.offset_y = cy;
    }

    /// Translate by a logical-pixel delta (drag panning, nudges).
    pub fn move_offset(&mut self, dx: f64, dy: f64) {
        self.offset_x = self.offset_x.saturating_add(to_offset(dx * self.pixel_ratio));
        self.offset_y = self.offset_y.saturating_add(to_offset(dy * self.pixel_ratio));
    }

    /// Nudge the view by `step` logical pixels.
    pub fn pan(&mut self, direction: Direction, step: f64) {
        let (dx, dy) = direction.delta(step);
        self.move_offset(dx, dy);
    }

    /// Zoom and translate so `bounds` is fully visible and centered.
    ///
    /// `overscan` (>= 1) leaves a margin around the content. Non-finite
    /// bounds (empty universe) fall back to `default_zoom` at the origin.
    pub fn fit_to_bounds(&mut self, bounds: &Bounds, overscan: f64, default_zoom: f64) {
        let overscan = if overscan.is_finite() && overscan >= 1.0 {
            overscan
        } else {
            1.0
        };

        let factor = if bounds.is_finite() {
            let width = (bounds.width() * overscan).ceil().max(1.0);
            let height = (bounds.height() * overscan).ceil().max(1.0);
            (f64::from(self.canvas_width) / width).min(f64::from(self.canvas_height) / height)
        } else {
            f64::NAN
        };

        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("fit_to_bounds: nothing to frame, using default zoom {default_zoom}");
            self.zoom_to(default_zoom);
            self.center_view();
            return;
        }

        let zoom = snap_power_of_two(factor);
        self.zoom_to(zoom);

        let (cx, cy) = bounds.center();
        self.offset_x = to_offset(f64::from(self.canvas_width) / 2.0 - cx * self.cell_width);
        self.offset_y = to_offset(f64::from(self.canvas_height) / 2.0 - cy * self.cell_width);
        log::debug!(
            "fit_to_bounds: factor {factor:.3} -> cell width {}, offset ({}, {})",
            self.cell_width,
            self.offset_x,
            self.offset_y
        );
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
    use test_case::test_case;

    fn is_power_of_two(v: f64) -> bool {
        v > 0.0 && v.log2().fract() == 0.0
    }

    fn viewport(w: u32, h: u32) -> Viewport {
        let mut vp = Viewport::with_canvas(w, h);
        vp.center_view();
        vp
    }

    #[test]
    fn zoom_out_keeps_anchor_content_fixed() {
        let mut vp = viewport(400, 400);
        vp.cell_width = 8.0;
        // Cell under device pixel (300, 120) before zooming.
        let before = vp.device_to_cell(300.0, 120.0);
        vp.zoom(true, 300, 120);
        assert_eq!(vp.cell_width, 4.0);
        assert_eq!(vp.device_to_cell(300.0, 120.0), before);
    }

    #[test]
    fn zoom_in_keeps_anchor_content_fixed() {
        let mut vp = viewport(400, 400);
        vp.cell_width = 4.0;
        let before = vp.device_to_cell(40.0, 360.0);
        vp.zoom(false, 40, 360);
        assert_eq!(vp.cell_width, 8.0);
        assert_eq!(vp.device_to_cell(40.0, 360.0), before);
    }

    #[test]
    fn zoom_centered_round_trip_restores_cell_width() {
        let mut vp = viewport(640, 480);
        vp.cell_width = 16.0;
        vp.zoom_centered(true);
        vp.zoom_centered(false);
        assert_eq!(vp.cell_width, 16.0);
        assert_eq!((vp.offset_x, vp.offset_y), (320, 240));
    }

    #[test]
    fn zoom_at_converts_logical_anchor() {
        let mut a = viewport(200, 200);
        a.pixel_ratio = 2.0;
        let mut b = a.clone();
        a.zoom_at(false, 25.0, 30.0);
        b.zoom(false, 50, 60);
        assert_eq!(a, b);
    }

    #[test_case(16.0, 16.0 ; "exact power")]
    #[test_case(20.0, 16.0 ; "rounds down")]
    #[test_case(0.3, 0.25 ; "below one")]
    #[test_case(1.0, 1.0 ; "unit")]
    #[test_case(2.0, 2.0 ; "two")]
    fn zoom_to_lands_on_power_not_exceeding(target: f64, expected: f64) {
        let mut vp = viewport(300, 300);
        vp.zoom_to(target);
        assert_eq!(vp.cell_width, expected);
        vp.zoom_to(target);
        assert_eq!(vp.cell_width, expected, "second zoom_to must be a no-op");
    }

    #[test]
    fn zoom_to_ignores_degenerate_targets() {
        let mut vp = viewport(300, 300);
        vp.cell_width = 4.0;
        for target in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            vp.zoom_to(target);
            assert_eq!(vp.cell_width, 4.0);
        }
    }

    #[test]
    fn zoom_to_keeps_center_cell() {
        let mut vp = viewport(300, 300);
        vp.cell_width = 1.0;
        vp.offset_x = 100;
        vp.offset_y = 180;
        let center = vp.device_to_cell(150.0, 150.0);
        vp.zoom_to(32.0);
        assert_eq!(vp.device_to_cell(150.0, 150.0), center);
    }

    #[test]
    fn cell_width_stays_power_of_two_through_mixed_operations() {
        let mut vp = viewport(333, 257);
        let mut step = 0u32;
        for out in [true, true, false, true, false, false, false, true] {
            vp.zoom_centered(out);
            vp.zoom_at(!out, f64::from(step * 13), f64::from(step * 7));
            vp.move_offset(3.7, -2.2);
            vp.zoom_to(f64::from(step) * 3.3 + 0.1);
            assert!(is_power_of_two(vp.cell_width), "{}", vp.cell_width);
            step += 1;
        }
        vp.fit_to_bounds(&Bounds::new(-3.0, 40.0, 5.0, 17.0), 1.1, 16.0);
        assert!(is_power_of_two(vp.cell_width));
    }

    #[test]
    fn zoom_stops_at_limits() {
        let mut vp = viewport(100, 100);
        for _ in 0..200 {
            vp.zoom_centered(false);
        }
        assert_eq!(vp.cell_width, max_cell_width());
        for _ in 0..200 {
            vp.zoom_centered(true);
        }
        assert_eq!(vp.cell_width, min_cell_width());
    }

    #[test]
    fn coordinate_round_trip_at_integer_zoom() {
        let mut vp = viewport(500, 300);
        for cw in [1.0, 2.0, 8.0, 64.0] {
            vp.cell_width = cw;
            vp.move_offset(-17.0, 9.0);
            for (cx, cy) in [(0, 0), (-1, -1), (12, -40), (-300, 77)] {
                let (px, py) = vp.cell_to_pixel(cx, cy);
                assert_eq!(vp.device_to_cell(px, py), (cx, cy));
                assert_eq!(vp.pixel_to_cell(px, py), (cx, cy));
            }
        }
    }

    #[test]
    fn center_view_puts_origin_mid_canvas() {
        let mut vp = Viewport::with_canvas(101, 99);
        vp.offset_x = -7;
        vp.center_view();
        assert_eq!((vp.offset_x, vp.offset_y), (50, 49));
    }

    #[test]
    fn move_offset_scales_by_pixel_ratio() {
        let mut vp = Viewport::with_canvas(10, 10);
        vp.pixel_ratio = 1.5;
        vp.move_offset(3.0, -3.0);
        assert_eq!((vp.offset_x, vp.offset_y), (5, -5));
    }

    #[test]
    fn pan_moves_content_opposite_to_view() {
        let mut vp = Viewport::with_canvas(10, 10);
        vp.pan(Direction::Up, 20.0);
        assert_eq!(vp.offset_y, 20);
        vp.pan(Direction::Right, 5.0);
        assert_eq!(vp.offset_x, -5);
        assert_eq!(Direction::parse(" Left "), Some(Direction::Left));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test_case(18.18, 16.0 ; "above one")]
    #[test_case(1.0, 1.0 ; "one")]
    #[test_case(0.7, 0.5 ; "just below one")]
    #[test_case(0.01, 0.0078125 ; "far below one")]
    fn snaps_factor(factor: f64, expected: f64) {
        assert_eq!(snap_power_of_two(factor), expected);
    }

    #[test]
    fn autoframe_centers_symmetric_bounds() {
        let mut vp = viewport(400, 400);
        let overscan = 1.1;
        vp.fit_to_bounds(&Bounds::new(-10.0, 10.0, -10.0, 10.0), overscan, 16.0);
        assert!(20.0 * overscan * vp.cell_width <= 400.0);
        assert_eq!(vp.cell_width, 16.0);
        let (px, py) = vp.cell_to_pixel(0, 0);
        assert!((px - 200.0).abs() <= 1.0 && (py - 200.0).abs() <= 1.0);
    }

    #[test]
    fn autoframe_centers_offset_content() {
        let mut vp = viewport(800, 600);
        let bounds = Bounds::new(100.0, 140.0, -60.0, -20.0);
        vp.fit_to_bounds(&bounds, 1.1, 16.0);
        let (cx, cy) = bounds.center();
        let sx = cx * vp.cell_width + vp.offset_x as f64;
        let sy = cy * vp.cell_width + vp.offset_y as f64;
        assert!((sx - 400.0).abs() <= 1.0);
        assert!((sy - 300.0).abs() <= 1.0);
        assert!(bounds.width() * vp.cell_width <= 800.0);
    }

    #[test]
    fn autoframe_reaches_distant_content() {
        let mut vp = viewport(400, 400);
        let bounds = Bounds::new(1e8, 1e8 + 1.0, -3e9, -3e9 + 1.0);
        vp.fit_to_bounds(&bounds, 1.1, 16.0);
        assert_eq!(vp.cell_width, 128.0);
        assert_eq!(vp.offset_x, 200 - 12_800_000_064);
        assert_eq!(vp.device_to_cell(200.0, 200.0), (100_000_000, -3_000_000_000));
    }

    #[test]
    fn autoframe_zooms_out_for_large_content() {
        let mut vp = viewport(400, 400);
        vp.fit_to_bounds(&Bounds::new(0.0, 5000.0, 0.0, 100.0), 1.1, 16.0);
        assert!(vp.cell_width < 1.0);
        assert!(5000.0 * vp.cell_width <= 400.0);
    }

    #[test]
    fn autoframe_falls_back_for_empty_universe() {
        let mut vp = viewport(400, 300);
        vp.cell_width = 2.0;
        vp.offset_x = -99;
        vp.fit_to_bounds(&Bounds::EMPTY, 1.1, 16.0);
        assert_eq!(vp.cell_width, 16.0);
        assert_eq!((vp.offset_x, vp.offset_y), (200, 150));
    }

    #[test]
    fn autoframe_without_canvas_does_not_hang() {
        let mut vp = Viewport::new();
        vp.fit_to_bounds(&Bounds::new(0.0, 10.0, 0.0, 10.0), 1.1, 16.0);
        assert_eq!(vp.cell_width, 16.0);
    }
}
