//! Camera and coordinate tests
//!
//! Tests for zoom anchoring, power-of-two zoom levels, autoframe,
//! and transforms between logical pixels, device pixels and cells.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod fixtures;
use fixtures::{glider, view_with, PatternBuilder};
use lifeview::layout::snap_power_of_two;
use lifeview::{Bounds, Direction, Viewport};
use test_case::test_case;

fn centered(w: u32, h: u32, cell_width: f64) -> Viewport {
    let mut vp = Viewport::with_canvas(w, h);
    vp.cell_width = cell_width;
    vp.center_view();
    vp
}

// ============================================================================
// Zoom
// ============================================================================

#[test_case(1.0 ; "unit")]
#[test_case(4.0 ; "four")]
#[test_case(0.5 ; "half")]
fn test_zoom_to_is_idempotent(start: f64) {
    let mut vp = centered(640, 480, start);
    vp.zoom_to(12.0);
    let once = vp.clone();
    vp.zoom_to(12.0);
    assert_eq!(vp, once);
    assert_eq!(vp.cell_width, 8.0);
}

#[test]
fn test_zoom_out_then_in_restores_cell_width() {
    let mut vp = centered(333, 222, 32.0);
    vp.offset_x += 17;
    for _ in 0..5 {
        vp.zoom_centered(true);
    }
    for _ in 0..5 {
        vp.zoom_centered(false);
    }
    assert_eq!(vp.cell_width, 32.0);
}

#[test]
fn test_zoom_at_pointer_keeps_cell_under_pointer() {
    let mut vp = centered(400, 300, 4.0);
    vp.set_pixel_ratio(2.0);
    let (x, y) = (37.5, 120.0);
    let before = vp.pixel_to_cell(x, y);
    vp.zoom_at(false, x, y);
    assert_eq!(vp.pixel_to_cell(x, y), before);
    vp.zoom_at(false, x, y);
    assert_eq!(vp.pixel_to_cell(x, y), before);
}

#[test]
fn test_cell_width_is_always_power_of_two() {
    let mut vp = centered(500, 500, 1.0);
    let ops: [fn(&mut Viewport); 6] = [
        |v| v.zoom_centered(true),
        |v| v.zoom_at(false, 13.0, 400.0),
        |v| v.zoom_to(37.0),
        |v| v.zoom_to(0.07),
        |v| v.move_offset(-9.5, 3.25),
        |v| v.fit_to_bounds(&Bounds::new(-5.0, 70.0, 2.0, 9.0), 1.1, 16.0),
    ];
    for round in 0..3 {
        for op in ops {
            op(&mut vp);
            let exp = vp.cell_width.log2();
            assert_eq!(exp, exp.round(), "round {round}: {}", vp.cell_width);
        }
    }
}

#[test_case(17.3, 16.0)]
#[test_case(0.3, 0.25)]
#[test_case(1.5, 1.0)]
fn test_snap_power_of_two(factor: f64, expected: f64) {
    assert_eq!(snap_power_of_two(factor), expected);
}

// ============================================================================
// Autoframe
// ============================================================================

#[test]
fn test_autoframe_symmetric_bounds() {
    let mut vp = centered(400, 400, 1.0);
    vp.fit_to_bounds(&Bounds::new(-10.0, 10.0, -10.0, 10.0), 1.1, 16.0);
    assert!(22.0 * vp.cell_width <= 400.0);
    assert_eq!((vp.offset_x, vp.offset_y), (200, 200));
}

#[test]
fn test_autoframe_through_viewer_shows_all_cells() {
    let pattern = PatternBuilder::new()
        .row("O.........O")
        .row("...........")
        .row("O.........O")
        .at(40, -7);
    let mut view = view_with(300.0, 200.0, &pattern);
    view.fit_view();
    let cell = view.palette().cell;
    for (x, y) in pattern.cells() {
        let (px, py) = view.viewport().cell_to_pixel(x, y);
        assert!(px >= 0.0 && px < 300.0 && py >= 0.0 && py < 200.0);
        assert_eq!(view.buffer().pixel(px as u32, py as u32), Some(cell));
    }
}

#[test]
fn test_autoframe_empty_universe_resets() {
    let mut view = view_with(120.0, 80.0, &PatternBuilder::new());
    view.zoom_to(2.0);
    view.move_offset(33.0, -12.0);
    view.fit_view();
    assert_eq!(view.cell_width(), 16.0);
    assert_eq!(view.pixel_to_cell(60.0, 40.0), (0, 0));
}

#[test]
fn test_autoframe_respects_device_pixels() {
    let mut view = lifeview::LifeView::new_test(200.0, 200.0, 2.0);
    view.set_universe(glider().at(-1, -1).build());
    view.fit_view();
    // 400 device px / ceil(3 * 1.1) = 100 -> 64
    assert_eq!(view.cell_width(), 64.0);
    assert_eq!(view.pixel_to_cell(100.0, 100.0), (0, 0));
}

// ============================================================================
// Coordinates & panning
// ============================================================================

#[test]
fn test_round_trip_for_integer_zoom() {
    for cw in [1.0, 2.0, 16.0] {
        let mut vp = centered(300, 300, cw);
        vp.offset_x -= 7;
        for (x, y) in [(0, 0), (-1, 0), (5, -9), (-40, 33)] {
            let (px, py) = vp.cell_to_pixel(x, y);
            assert_eq!(vp.device_to_cell(px, py), (x, y));
        }
    }
}

#[test_case(Direction::Up, (0, 50))]
#[test_case(Direction::Down, (0, -50))]
#[test_case(Direction::Left, (50, 0))]
#[test_case(Direction::Right, (-50, 0))]
fn test_pan_direction(direction: Direction, delta: (i64, i64)) {
    let mut view = view_with(100.0, 100.0, &PatternBuilder::new().row("O"));
    view.center_view();
    view.pan_direction(direction);
    let vp = view.viewport_state();
    assert_eq!((vp.offset_x - 50, vp.offset_y - 50), delta);
}
