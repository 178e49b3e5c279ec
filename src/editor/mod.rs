//! Interactive cell editing.
//!
//! An edit goes to the automaton first (it stays the source of truth), then
//! the single affected cell is painted straight into the pixel buffer so the
//! host can present without a full redraw. The next full redraw produces
//! the same pixels.

use crate::config::Palette;
use crate::layout::Viewport;
use crate::render::PixelBuffer;
use crate::universe::Automaton;

/// Outcome of one cell edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEdit {
    pub x: i64,
    pub y: i64,
    pub alive: bool,
    /// False when the cell already had the requested state.
    pub changed: bool,
}

/// Set a cell and draw it over the current frame.
#[allow(clippy::cast_possible_truncation)]
pub fn paint_cell<A: Automaton + ?Sized>(
    universe: &mut A,
    viewport: &Viewport,
    buffer: &mut PixelBuffer,
    palette: &Palette,
    x: i64,
    y: i64,
    alive: bool,
) -> CellEdit {
    let changed = universe.is_alive(x, y) != alive;
    universe.set_cell(x, y, alive);

    let color = if alive {
        palette.cell
    } else {
        palette.background
    };
    let (px, py) = viewport.cell_to_pixel(x, y);
    let (px, py) = (px.floor() as i64, py.floor() as i64);

    if viewport.cell_width < 1.0 {
        buffer.set_pixel(px, py, color);
    } else {
        let side = viewport.cell_width as i64 - palette.border(viewport.cell_width);
        buffer.fill_square(px, py, side, color);
    }

    log::trace!("paint_cell ({x}, {y}) -> {alive}, changed: {changed}");
    CellEdit {
        x,
        y,
        alive,
        changed,
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
    use crate::render::quadtree::redraw;
    use crate::universe::Universe;

    fn setup(cell_width: f64) -> (Universe, Viewport, PixelBuffer, Palette) {
        let mut vp = Viewport::with_canvas(100, 100);
        vp.cell_width = cell_width;
        vp.center_view();
        let mut buffer = PixelBuffer::new(100, 100);
        let palette = Palette::default();
        let universe = Universe::construct(&[(0, 0), (1, 0), (1, -1)]);
        redraw(universe.root(), &vp, &mut buffer, &palette);
        (universe, vp, buffer, palette)
    }

    #[test]
    fn painting_matches_a_full_redraw() {
        let (mut universe, vp, mut buffer, palette) = setup(10.0);
        let edit = paint_cell(&mut universe, &vp, &mut buffer, &palette, -2, 1, true);
        assert!(edit.changed);
        assert!(universe.is_alive(-2, 1));
        assert_eq!(buffer.pixel(30, 60), Some(palette.cell));

        let mut fresh = PixelBuffer::new(100, 100);
        redraw(universe.root(), &vp, &mut fresh, &palette);
        assert_eq!(buffer.pixels(), fresh.pixels());
    }

    #[test]
    fn erasing_clears_square_and_universe() {
        let (mut universe, vp, mut buffer, palette) = setup(10.0);
        let edit = paint_cell(&mut universe, &vp, &mut buffer, &palette, 1, -1, false);
        assert!(edit.changed);
        assert!(!universe.is_alive(1, -1));
        assert_eq!(buffer.count(palette.cell), 2 * 81);
    }

    #[test]
    fn repainting_live_cell_is_unchanged() {
        let (mut universe, vp, mut buffer, palette) = setup(10.0);
        let edit = paint_cell(&mut universe, &vp, &mut buffer, &palette, 0, 0, true);
        assert!(!edit.changed);
        assert_eq!(universe.population(), 3);
    }

    #[test]
    fn sub_pixel_zoom_paints_one_pixel() {
        let (mut universe, vp, mut buffer, palette) = setup(0.5);
        let before = buffer.count(palette.cell);
        paint_cell(&mut universe, &vp, &mut buffer, &palette, 20, 20, true);
        assert_eq!(buffer.pixel(60, 60), Some(palette.cell));
        assert_eq!(buffer.count(palette.cell), before + 1);
    }

    #[test]
    fn offscreen_edit_only_updates_universe() {
        let (mut universe, vp, mut buffer, palette) = setup(10.0);
        let before = buffer.pixels().to_vec();
        paint_cell(&mut universe, &vp, &mut buffer, &palette, 500, -500, true);
        assert!(universe.is_alive(500, -500));
        assert_eq!(buffer.pixels(), before.as_slice());
    }
}
