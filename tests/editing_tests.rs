//! Tests for interactive editing: direct paints and pointer strokes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;
use fixtures::{l_tromino, view_with, PatternBuilder};
use lifeview::render::{redraw, PixelBuffer};
use lifeview::viewer::events::{PointerMode, PointerState};
use lifeview::{Automaton, LifeView};

/// Tromino at cell width 10, origin at the canvas center.
fn tromino_view() -> LifeView {
    let mut view = view_with(100.0, 100.0, &l_tromino());
    view.zoom_to(10.0);
    view
}

fn full_redraw(view: &LifeView) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(view.buffer().width(), view.buffer().height());
    redraw(view.universe().root(), view.viewport(), &mut buffer, view.palette());
    buffer
}

#[test]
fn test_paint_overlay_matches_redraw() {
    let mut view = tromino_view();
    view.center_view();
    for (x, y, alive) in [(-3, -3, true), (0, 0, false), (2, 1, true), (2, 1, false)] {
        view.paint_cell(x, y, alive).unwrap();
        assert_eq!(view.is_alive(x, y), alive);
        assert_eq!(view.buffer().pixels(), full_redraw(&view).pixels());
    }
}

#[test]
fn test_paint_reports_change() {
    let mut view = tromino_view();
    assert!(!view.paint_cell(1, -1, true).unwrap().changed);
    assert!(view.paint_cell(1, -1, false).unwrap().changed);
    assert_eq!(view.population(), 2);
}

#[test]
fn test_draw_stroke_paints_each_cell_once() {
    let mut view = view_with(100.0, 100.0, &PatternBuilder::new());
    view.zoom_to(8.0);
    view.center_view();
    view.set_pointer_mode(PointerMode::Draw);

    view.on_pointer_down(50.0, 50.0, None);
    for x in [52.0, 57.0, 58.0, 63.0, 66.0, 74.0, 75.0] {
        view.on_pointer_move(x, 50.0);
    }
    view.on_pointer_up();

    assert_eq!(view.cells(), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(view.pointer_state(), PointerState::Idle);
    assert_eq!(view.buffer().pixels(), full_redraw(&view).pixels());
}

#[test]
fn test_erase_stroke_starting_on_live_cell() {
    let mut view = view_with(100.0, 100.0, &PatternBuilder::new().row("OOOO"));
    view.zoom_to(8.0);
    view.center_view();
    view.on_pointer_down(51.0, 51.0, Some(PointerMode::Draw));
    view.on_pointer_move(59.0, 51.0);
    view.on_pointer_move(67.0, 51.0);
    view.on_pointer_up();
    assert_eq!(view.cells(), vec![(3, 0)]);
}

#[test]
fn test_pan_stroke_moves_camera_not_cells() {
    let mut view = tromino_view();
    view.center_view();
    view.on_pointer_down(20.0, 20.0, Some(PointerMode::Pan));
    view.on_pointer_move(30.0, 25.0);
    view.on_pointer_move(35.0, 5.0);
    view.on_pointer_up();
    assert_eq!(view.population(), 3);
    let vp = view.viewport_state();
    assert_eq!((vp.offset_x, vp.offset_y), (65, 35));
}

#[test]
fn test_paint_after_resize_presents_fresh_frame() {
    let mut view = tromino_view();
    view.resize(50.0, 50.0, 1.0);
    view.center_view();
    view.paint_cell(-1, -1, true).unwrap();
    assert!(!view.buffer().is_stale());
    assert_eq!(view.buffer().pixels(), full_redraw(&view).pixels());
}
