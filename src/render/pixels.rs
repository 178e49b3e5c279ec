//! Device-pixel raster backing the on-screen image.
//!
//! Pixels are packed `u32` values (see [`super::colors::Rgb::pack`]) stored
//! row-major from the top-left corner. Every write clips against the buffer
//! edges, so callers may pass squares that hang off any side.

/// Packed-RGBA pixel buffer sized to the canvas in device pixels.
#[derive(Debug, Clone, Default)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    /// Set on reallocation, cleared by the next full fill.
    stale: bool,
}

impl PixelBuffer {
    /// Create a buffer of `width * height` pixels (contents undefined until filled).
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffer = Self::default();
        buffer.resize(width, height);
        buffer
    }

    /// Reallocate for a new size. Zero-area sizes keep the previous buffer.
    ///
    /// Returns true when the buffer was reallocated; it must be redrawn
    /// before it is presented.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.width && height == self.height {
            return false;
        }
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        self.pixels = vec![0; len];
        self.width = width;
        self.height = height;
        self.stale = true;
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer was reallocated and not yet repainted.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
        self.stale = false;
    }

    /// Read a pixel; `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Set one pixel, ignoring coordinates outside the buffer.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: u32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        if let Some(p) = self.pixels.get_mut(idx) {
            *p = color;
        }
    }

    /// Fill a `size x size` square with its top-left at `(x, y)`, clipped.
    ///
    /// Rows are walked with a pointer that skips `width - clipped_width`
    /// slots after each run, so nothing outside the clipped square is touched.
    pub fn fill_square(&mut self, x: i64, y: i64, size: i64, color: u32) {
        let canvas_w = i64::from(self.width);
        let canvas_h = i64::from(self.height);

        let (mut x, mut y) = (x, y);
        let mut width = size;
        let mut height = size;

        if x < 0 {
            width += x;
            x = 0;
        }
        if x + width > canvas_w {
            width = canvas_w - x;
        }
        if y < 0 {
            height += y;
            y = 0;
        }
        if y + height > canvas_h {
            height = canvas_h - y;
        }
        if width <= 0 || height <= 0 {
            return;
        }

        // All four values are now inside [0, canvas] so they fit usize.
        let (Ok(x), Ok(y), Ok(width), Ok(height), Ok(stride)) = (
            usize::try_from(x),
            usize::try_from(y),
            usize::try_from(width),
            usize::try_from(height),
            usize::try_from(canvas_w),
        ) else {
            return;
        };

        let mut pointer = x + y * stride;
        let row_skip = stride - width;
        for _ in 0..height {
            if let Some(row) = self.pixels.get_mut(pointer..pointer + width) {
                row.fill(color);
            }
            pointer += width + row_skip;
        }
    }

    /// Packed pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Byte view for presentation: `[r, g, b, a]` per pixel, as `ImageData`
    /// expects. Borrows the pixel storage; the order holds on little-endian
    /// targets, which includes wasm32.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Count pixels equal to `color`.
    pub fn count(&self, color: u32) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn index(&self, x: u32, y: u32) -> usize {
        (u64::from(y) * u64::from(self.width) + u64::from(x)) as usize
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

    const BG: u32 = 0xFF00_0000;
    const FG: u32 = 0xFFFF_FFFF;

    fn filled(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        buf.fill(BG);
        buf
    }

    #[test]
    fn resize_reallocates_and_marks_stale() {
        let mut buf = filled(4, 4);
        assert!(!buf.is_stale());
        assert!(buf.resize(8, 2));
        assert_eq!(buf.pixels().len(), 16);
        assert!(buf.is_stale());
        buf.fill(BG);
        assert!(!buf.is_stale());
    }

    #[test]
    fn resize_to_same_or_zero_is_noop() {
        let mut buf = filled(4, 4);
        assert!(!buf.resize(4, 4));
        assert!(!buf.resize(0, 10));
        assert!(!buf.resize(10, 0));
        assert_eq!((buf.width(), buf.height()), (4, 4));
        assert_eq!(buf.pixels().len(), 16);
    }

    #[test]
    fn fill_square_inside() {
        let mut buf = filled(10, 10);
        buf.fill_square(2, 3, 4, FG);
        assert_eq!(buf.count(FG), 16);
        assert_eq!(buf.pixel(2, 3), Some(FG));
        assert_eq!(buf.pixel(5, 6), Some(FG));
        assert_eq!(buf.pixel(6, 6), Some(BG));
        assert_eq!(buf.pixel(1, 3), Some(BG));
    }

    #[test]
    fn fill_square_clips_every_edge() {
        let mut buf = filled(10, 10);
        buf.fill_square(-2, -2, 4, FG);
        assert_eq!(buf.count(FG), 4);

        let mut buf = filled(10, 10);
        buf.fill_square(8, 8, 5, FG);
        assert_eq!(buf.count(FG), 4);

        let mut buf = filled(10, 10);
        buf.fill_square(-5, -5, 30, FG);
        assert_eq!(buf.count(FG), 100);
    }

    #[test]
    fn fill_square_fully_outside_touches_nothing() {
        let mut buf = filled(10, 10);
        for (x, y) in [(-4, 0), (0, -4), (10, 0), (0, 10), (-100, -100), (50, 50)] {
            buf.fill_square(x, y, 4, FG);
        }
        buf.fill_square(3, 3, 0, FG);
        buf.fill_square(3, 3, -2, FG);
        assert_eq!(buf.count(FG), 0);
    }

    #[test]
    fn set_pixel_ignores_out_of_range() {
        let mut buf = filled(3, 3);
        buf.set_pixel(-1, 0, FG);
        buf.set_pixel(3, 0, FG);
        buf.set_pixel(0, 3, FG);
        assert_eq!(buf.count(FG), 0);
        buf.set_pixel(2, 2, FG);
        assert_eq!(buf.pixel(2, 2), Some(FG));
    }

    #[test]
    fn byte_view_is_rgba() {
        let mut buf = filled(2, 1);
        buf.set_pixel(1, 0, 0xFF03_0201);
        assert_eq!(buf.as_bytes(), &[0, 0, 0, 0xFF, 1, 2, 3, 0xFF][..]);
    }

    #[test]
    fn byte_view_borrows_pixel_storage() {
        let buf = filled(3, 2);
        let bytes = buf.as_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 4);
        assert_eq!(bytes.as_ptr(), buf.pixels().as_ptr().cast::<u8>());
        assert_eq!(buf.as_bytes().as_ptr(), bytes.as_ptr());
    }
}
