//! Presentation surface trait.
//!
//! The rasterizer only writes into a [`PixelBuffer`]; a `Surface` is where
//! a finished frame goes. The browser build blits into a Canvas 2D context,
//! native builds (tests, CLI, benches) use [`NullSurface`].

use crate::error::Result;

use super::pixels::PixelBuffer;

/// Trait for presentation targets
///
/// Implementations receive one complete frame per redraw and must not
/// retain the buffer.
pub trait Surface {
    /// Initialize the surface
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Resize the backing store to device pixels
    fn resize(&mut self, width: u32, height: u32, dpr: f64);

    /// Show a finished frame
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()>;

    /// Get the current width
    fn width(&self) -> u32;

    /// Get the current height
    fn height(&self) -> u32;
}

/// Headless surface that records what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct NullSurface {
    width: u32,
    height: u32,
    dpr: f64,
    presented: u64,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.presented
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }
}

impl Surface for NullSurface {
    fn resize(&mut self, width: u32, height: u32, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        if buffer.width() != self.width || buffer.height() != self.height {
            log::debug!(
                "presenting {}x{} frame on {}x{} surface",
                buffer.width(),
                buffer.height(),
                self.width,
                self.height
            );
        }
        self.presented += 1;
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
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
    fn null_surface_counts_frames() {
        let mut surface = NullSurface::new();
        surface.init().unwrap();
        surface.resize(8, 4, 2.0);
        let buffer = PixelBuffer::new(8, 4);
        surface.present(&buffer).unwrap();
        surface.present(&buffer).unwrap();
        assert_eq!(surface.frames(), 2);
        assert_eq!((surface.width(), surface.height()), (8, 4));
        assert_eq!(surface.dpr(), 2.0);
    }
}
