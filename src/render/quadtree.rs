//! Recursive quadtree rasterizer.
//!
//! Walks the node graph from the root, dropping empty subtrees and anything
//! projected outside the canvas, and stops descending once a node shrinks to
//! a single device pixel. Cost is bounded by visible live structure, not by
//! population.

use crate::config::Palette;
use crate::layout::Viewport;
use crate::universe::Node;

use super::pixels::PixelBuffer;

/// Draws nodes into a pixel buffer at a fixed zoom.
pub struct Rasterizer<'a> {
    buffer: &'a mut PixelBuffer,
    cell_width: f64,
    color: u32,
    border: i64,
}

impl<'a> Rasterizer<'a> {
    pub fn new(buffer: &'a mut PixelBuffer, cell_width: f64, palette: &Palette) -> Self {
        Self {
            buffer,
            cell_width,
            color: palette.cell,
            border: palette.border(cell_width),
        }
    }

    /// Draw `node` as a `size x size` square with its top-left at `(left, top)`,
    /// all in device pixels.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw_node(&mut self, node: &Node, size: f64, left: f64, top: f64) {
        if node.population() == 0 {
            return;
        }

        let width = f64::from(self.buffer.width());
        let height = f64::from(self.buffer.height());
        if left >= width || top >= height || left + size <= 0.0 || top + size <= 0.0 {
            return;
        }

        if size <= 1.0 {
            self.buffer
                .set_pixel(left.floor() as i64, top.floor() as i64, self.color);
            return;
        }

        match node.children() {
            None => {
                // Leaves only get here when cell_width > 1, i.e. at least 2.
                let side = self.cell_width as i64 - self.border;
                self.buffer
                    .fill_square(left.floor() as i64, top.floor() as i64, side, self.color);
            }
            Some(q) => {
                let half = size / 2.0;
                self.draw_node(q.nw, half, left, top);
                self.draw_node(q.ne, half, left + half, top);
                self.draw_node(q.sw, half, left, top + half);
                self.draw_node(q.se, half, left + half, top + half);
            }
        }
    }
}

/// Side of a root node in device pixels.
pub fn node_size(level: u8, cell_width: f64) -> f64 {
    2f64.powi(i32::from(level)) * cell_width
}

/// Repaint the whole buffer: background, then the tree centered on the
/// viewport offset.
#[allow(clippy::cast_precision_loss)]
pub fn redraw(root: &Node, viewport: &Viewport, buffer: &mut PixelBuffer, palette: &Palette) {
    buffer.fill(palette.background);

    let size = node_size(root.level(), viewport.cell_width);
    let left = viewport.offset_x as f64 - size / 2.0;
    let top = viewport.offset_y as f64 - size / 2.0;

    log::trace!(
        "redraw: level {} population {} at ({left}, {top}) size {size}",
        root.level(),
        root.population()
    );

    Rasterizer::new(buffer, viewport.cell_width, palette).draw_node(root, size, left, top);
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
    use crate::universe::{Automaton, Universe};
    use std::sync::Arc;

    fn setup(w: u32, h: u32, cell_width: f64) -> (Viewport, PixelBuffer, Palette) {
        let mut vp = Viewport::with_canvas(w, h);
        vp.cell_width = cell_width;
        vp.center_view();
        (vp, PixelBuffer::new(w, h), Palette::default())
    }

    #[test]
    fn l_tromino_draws_three_bordered_squares() {
        let universe = Universe::construct(&[(0, 0), (1, 0), (1, -1)]);
        let (vp, mut buf, palette) = setup(100, 100, 10.0);
        redraw(universe.root(), &vp, &mut buf, &palette);

        assert_eq!(buf.count(palette.cell), 3 * 81);
        for (x0, y0) in [(50, 50), (60, 50), (60, 40)] {
            for y in y0..y0 + 9 {
                for x in x0..x0 + 9 {
                    assert_eq!(buf.pixel(x, y), Some(palette.cell), "({x}, {y})");
                }
            }
            // Border column and row stay background.
            assert_eq!(buf.pixel(x0 + 9, y0), Some(palette.background));
            assert_eq!(buf.pixel(x0, y0 + 9), Some(palette.background));
        }
    }

    #[test]
    fn empty_universe_is_all_background() {
        let universe = Universe::new();
        let (vp, mut buf, palette) = setup(32, 32, 4.0);
        redraw(universe.root(), &vp, &mut buf, &palette);
        assert_eq!(buf.count(palette.background), 32 * 32);
    }

    #[test]
    fn offscreen_nodes_touch_no_pixels() {
        let universe = Universe::construct(&[(0, 0), (3, 2), (-4, -4)]);
        let (mut vp, mut buf, palette) = setup(40, 40, 4.0);
        for (ox, oy) in [(1000, 20), (-1000, 20), (20, 1000), (20, -1000)] {
            vp.offset_x = ox;
            vp.offset_y = oy;
            redraw(universe.root(), &vp, &mut buf, &palette);
            assert_eq!(buf.count(palette.cell), 0, "offset ({ox}, {oy})");
        }
    }

    #[test]
    fn partially_visible_cell_is_clipped() {
        let universe = Universe::construct(&[(0, 0)]);
        let (mut vp, mut buf, palette) = setup(20, 20, 16.0);
        vp.offset_x = -8;
        vp.offset_y = 12;
        redraw(universe.root(), &vp, &mut buf, &palette);
        // Square spans x in [-8, 7) and y in [12, 27), clipped to 7 x 8.
        assert_eq!(buf.count(palette.cell), 7 * 8);
    }

    #[test]
    fn live_leaf_root_covers_viewport() {
        let (vp, mut buf, _) = setup(64, 64, 64.0);
        let palette = Palette {
            border_fraction: 0.0,
            ..Palette::default()
        };
        let leaf = Node::Leaf(true);
        let mut vp = vp;
        vp.offset_x = 32;
        vp.offset_y = 32;
        redraw(&leaf, &vp, &mut buf, &palette);
        assert_eq!(buf.count(palette.cell), 64 * 64);
    }

    #[test]
    fn solid_block_fills_every_pixel_at_unit_zoom() {
        let cells: Vec<(i64, i64)> = (-4..4).flat_map(|y| (-4..4).map(move |x| (x, y))).collect();
        let universe = Universe::construct(&cells);
        let (mut vp, mut buf, palette) = setup(8, 8, 1.0);
        vp.offset_x = 4;
        vp.offset_y = 4;
        redraw(universe.root(), &vp, &mut buf, &palette);
        assert_eq!(buf.count(palette.cell), 64);
    }

    #[test]
    fn sub_pixel_zoom_collapses_to_single_pixels() {
        let universe = Universe::construct(&[(0, 0), (1, 1), (2, 0), (3, 3)]);
        let (vp, mut buf, palette) = setup(16, 16, 0.25);
        redraw(universe.root(), &vp, &mut buf, &palette);
        // Four cells in one 4x4 block land on the origin pixel.
        assert_eq!(buf.count(palette.cell), 1);
        assert_eq!(buf.pixel(8, 8), Some(palette.cell));
    }

    #[test]
    fn shared_subtrees_draw_at_each_position() {
        let on = Arc::new(Node::Leaf(true));
        let off = Arc::new(Node::Leaf(false));
        let root = Node::join(
            Arc::clone(&on),
            Arc::clone(&off),
            Arc::clone(&off),
            Arc::clone(&on),
        );
        let (mut vp, mut buf, _) = setup(4, 4, 2.0);
        vp.offset_x = 2;
        vp.offset_y = 2;
        let palette = Palette {
            border_fraction: 0.0,
            ..Palette::default()
        };
        redraw(&root, &vp, &mut buf, &palette);
        assert_eq!(buf.pixel(0, 0), Some(palette.cell));
        assert_eq!(buf.pixel(3, 3), Some(palette.cell));
        assert_eq!(buf.pixel(3, 0), Some(palette.background));
        assert_eq!(buf.count(palette.cell), 8);
    }

    #[test]
    fn node_size_scales_with_level() {
        assert_eq!(node_size(0, 8.0), 8.0);
        assert_eq!(node_size(3, 0.5), 4.0);
    }
}
