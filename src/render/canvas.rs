//! Canvas 2D presentation for the browser build.
//!
//! Each frame is a single `putImageData` of the whole pixel buffer.

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::error::{LifeviewError, Result};

use super::backend::Surface;
use super::pixels::PixelBuffer;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f64,
}

impl CanvasSurface {
    /// Create a surface from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| LifeviewError::Render("failed to get 2d context".to_string()))?
            .ok_or_else(|| LifeviewError::Render("no 2d context available".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                LifeviewError::Render("failed to cast to CanvasRenderingContext2d".to_string())
            })?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
        })
    }

    /// Set the CSS size of the canvas element (logical pixels).
    pub fn set_canvas_css_size(&self, css_w: f64, css_h: f64) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if dpr > 0.0 {
            self.set_canvas_css_size(f64::from(width) / dpr, f64::from(height) / dpr);
        }
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(buffer.as_bytes()),
            buffer.width(),
            buffer.height(),
        )
        .map_err(|e| LifeviewError::Render(format!("ImageData: {e:?}")))?;
        self.ctx
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| LifeviewError::Render(format!("putImageData: {e:?}")))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
