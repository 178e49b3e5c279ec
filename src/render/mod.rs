//! Rendering engine with pluggable presentation.
//!
//! This module provides:
//! - Color parsing and pixel packing
//! - The device-pixel buffer
//! - The recursive quadtree rasterizer
//! - Presentation surfaces (Canvas 2D on wasm32, headless elsewhere)

pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod pixels;
pub mod quadtree;

// Re-export commonly used types
pub use backend::{NullSurface, Surface};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::{palette, parse_packed, Rgb};
pub use pixels::PixelBuffer;
pub use quadtree::{redraw, Rasterizer};
