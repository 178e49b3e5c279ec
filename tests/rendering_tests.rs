//! Headless rendering tests.
//!
//! These tests drive the full pipeline (universe -> viewport -> rasterizer ->
//! pixel buffer) without a browser and check pixels directly.
//!
//! Test categories:
//! - End-to-end frames
//! - Culling and clipping
//! - Zoomed-out collapse
//! - Byte layout of presented frames
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
use fixtures::{block, glider, l_tromino, view_with, PatternBuilder};
use lifeview::render::{redraw, PixelBuffer, Rgb};
use lifeview::{Automaton, Palette, Viewport};

// ============================================================================
// End-to-end frames
// ============================================================================

#[test]
fn test_l_tromino_three_squares() {
    let universe = l_tromino().build();
    let mut vp = Viewport::with_canvas(100, 100);
    vp.cell_width = 10.0;
    vp.center_view();
    let mut buffer = PixelBuffer::new(100, 100);
    let palette = Palette::default();

    redraw(universe.root(), &vp, &mut buffer, &palette);

    let mut expected = vec![palette.background; 100 * 100];
    for (x0, y0) in [(50usize, 50usize), (60, 50), (60, 40)] {
        for y in y0..y0 + 9 {
            for x in x0..x0 + 9 {
                expected[y * 100 + x] = palette.cell;
            }
        }
    }
    assert_eq!(buffer.pixels(), expected.as_slice());
}

#[test]
fn test_glider_frame_through_viewer() {
    let mut view = view_with(64.0, 64.0, &glider().at(-1, -1));
    view.zoom_to(8.0);
    view.center_view();
    let cell = view.palette().cell;
    // 5 live cells, 8 px wide minus no border (floor(0.8) == 0)
    assert_eq!(view.buffer().count(cell), 5 * 64);
    // Top-middle cell (0, -1) starts at (32, 24).
    assert_eq!(view.buffer().pixel(32, 24), Some(cell));
    assert_eq!(view.buffer().pixel(24, 24), Some(view.palette().background));
}

#[test]
fn test_frame_independent_of_root_padding() {
    // Same cells, one universe grown far beyond them by a distant edit.
    let pattern = block().at(3, 3);
    let compact = pattern.build();
    let mut padded = pattern.build();
    padded.set_cell(1 << 20, 1 << 20, true);
    padded.set_cell(1 << 20, 1 << 20, false);
    assert!(padded.level() > compact.level());

    let mut vp = Viewport::with_canvas(80, 80);
    vp.cell_width = 4.0;
    vp.center_view();
    let palette = Palette::default();
    let mut a = PixelBuffer::new(80, 80);
    let mut b = PixelBuffer::new(80, 80);
    redraw(compact.root(), &vp, &mut a, &palette);
    redraw(padded.root(), &vp, &mut b, &palette);
    assert_eq!(a.pixels(), b.pixels());
}

// ============================================================================
// Culling and clipping
// ============================================================================

#[test]
fn test_content_left_of_canvas_is_culled() {
    let universe = PatternBuilder::new().row("OOOO").at(-100, 0).build();
    let mut vp = Viewport::with_canvas(50, 50);
    vp.cell_width = 2.0;
    vp.center_view();
    let mut buffer = PixelBuffer::new(50, 50);
    let palette = Palette::default();
    redraw(universe.root(), &vp, &mut buffer, &palette);
    assert_eq!(buffer.count(palette.background), 50 * 50);
}

#[test]
fn test_square_on_every_edge_is_clipped() {
    let palette = Palette {
        border_fraction: 0.0,
        ..Palette::default()
    };
    let universe = PatternBuilder::new().row("O").build();
    for (ox, oy) in [(-4, 10), (26, 10), (10, -4), (10, 26), (-4, -4), (26, 26)] {
        let mut vp = Viewport::with_canvas(30, 30);
        vp.cell_width = 8.0;
        vp.offset_x = ox;
        vp.offset_y = oy;
        let mut buffer = PixelBuffer::new(30, 30);
        redraw(universe.root(), &vp, &mut buffer, &palette);
        let visible_w = (ox + 8).min(30) - ox.max(0);
        let visible_h = (oy + 8).min(30) - oy.max(0);
        assert_eq!(
            buffer.count(palette.cell),
            (visible_w * visible_h) as usize,
            "offset ({ox}, {oy})"
        );
        assert_eq!(buffer.pixels().len(), 900);
    }
}

// ============================================================================
// Zoomed-out collapse
// ============================================================================

#[test]
fn test_far_zoom_out_collapses_to_one_pixel() {
    let universe = glider().at(-1, -1).build();
    let mut vp = Viewport::with_canvas(20, 20);
    vp.zoom_to(1.0 / 64.0);
    vp.center_view();
    let mut buffer = PixelBuffer::new(20, 20);
    let palette = Palette::default();
    redraw(universe.root(), &vp, &mut buffer, &palette);
    assert_eq!(buffer.count(palette.cell), 1);
}

#[test]
fn test_unit_zoom_lights_one_pixel_per_cell() {
    let pattern = glider().at(-1, -1);
    let universe = pattern.build();
    let mut vp = Viewport::with_canvas(16, 16);
    vp.center_view();
    let mut buffer = PixelBuffer::new(16, 16);
    let palette = Palette::default();
    redraw(universe.root(), &vp, &mut buffer, &palette);
    assert_eq!(buffer.count(palette.cell), 5);
    for (x, y) in pattern.cells() {
        let (px, py) = vp.cell_to_pixel(x, y);
        assert_eq!(buffer.pixel(px as u32, py as u32), Some(palette.cell));
    }
}

// ============================================================================
// Presented bytes
// ============================================================================

#[test]
fn test_presented_bytes_are_rgba() {
    let mut view = view_with(10.0, 10.0, &PatternBuilder::new().row("O"));
    view.set_background_color("#102030").unwrap();
    view.set_cell_color("#A0B0C0").unwrap();
    view.zoom_to(4.0);
    view.center_view();
    let bytes = view.present_buffer();
    assert_eq!(bytes.len(), 10 * 10 * 4);
    assert_eq!(&bytes[..4], &[0x10, 0x20, 0x30, 0xFF]);
    let lit = (5 * 10 + 5) * 4;
    assert_eq!(&bytes[lit..lit + 4], &[0xA0, 0xB0, 0xC0, 0xFF]);
    assert_eq!(Rgb::from_hex("#A0B0C0").unwrap().pack().to_le_bytes(), [0xA0, 0xB0, 0xC0, 0xFF]);
}
