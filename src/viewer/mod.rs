//! Main LifeView struct - the primary entry point for the canvas viewer.
//!
//! `LifeView` owns everything one on-screen view needs:
//! - the universe being shown (and edited)
//! - viewport state (offset, zoom, canvas size)
//! - the pixel buffer and the palette it is painted with
//! - the presentation surface and pointer state
//!
//! Every camera operation mutates the viewport and then redraws once. The
//! Rust API below works on every target; the wasm32 block at the bottom
//! exports it to JavaScript.

pub mod events;

use wasm_bindgen::prelude::*;

use crate::config::{Palette, RenderConfig};
use crate::editor::{self, CellEdit};
use crate::error::Result;
use crate::layout::{Direction, Viewport, ViewportState};
use crate::render::colors::Rgb;
use crate::render::quadtree;
use crate::render::{NullSurface, PixelBuffer, Surface};
use crate::universe::{Automaton, Bounds, Universe};

use events::{PointerAction, PointerEvent, PointerMode, PointerState};

#[cfg(target_arch = "wasm32")]
use crate::render::CanvasSurface;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlCanvasElement;

/// The main viewer struct exported to JavaScript
#[wasm_bindgen]
pub struct LifeView {
    universe: Universe,
    viewport: Viewport,
    buffer: PixelBuffer,
    config: RenderConfig,
    palette: Palette,
    pointer: PointerState,
    mode: PointerMode,
    surface: Box<dyn Surface>,
}

impl LifeView {
    /// Create a viewer presenting to `surface`.
    ///
    /// # Errors
    /// Invalid configuration, or a surface that fails to initialize.
    pub fn with_surface(mut surface: Box<dyn Surface>, config: RenderConfig) -> Result<Self> {
        let palette = config.palette()?;
        surface.init()?;
        Ok(Self {
            universe: Universe::new(),
            viewport: Viewport::new(),
            buffer: PixelBuffer::default(),
            config,
            palette,
            pointer: PointerState::Idle,
            mode: PointerMode::default(),
            surface,
        })
    }

    /// Headless viewer for tests, the CLI and benches.
    ///
    /// `width`/`height` are logical pixels.
    pub fn new_test(width: f64, height: f64, dpr: f64) -> Self {
        let mut view = Self {
            universe: Universe::new(),
            viewport: Viewport::new(),
            buffer: PixelBuffer::default(),
            config: RenderConfig::default(),
            palette: Palette::default(),
            pointer: PointerState::Idle,
            mode: PointerMode::default(),
            surface: Box::new(NullSurface::new()),
        };
        view.resize(width, height, dpr);
        view
    }

    // ------------------------------------------------------------------
    // Canvas & frames
    // ------------------------------------------------------------------

    /// Resize the canvas from logical dimensions and device pixel ratio.
    ///
    /// A real size change reallocates the buffer and redraws. Non-positive
    /// sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        let old_ratio = self.viewport.pixel_ratio;
        self.viewport.set_pixel_ratio(dpr);
        let resized = self.viewport.resize(width, height);
        if !resized && self.viewport.pixel_ratio.to_bits() == old_ratio.to_bits() {
            return;
        }
        let (w, h) = (self.viewport.canvas_width, self.viewport.canvas_height);
        if w == 0 || h == 0 {
            return;
        }
        log::debug!(
            "resize: {width}x{height} logical @ {} -> {w}x{h} device",
            self.viewport.pixel_ratio
        );
        self.buffer.resize(w, h);
        self.surface.resize(w, h, self.viewport.pixel_ratio);
        self.redraw_logged();
    }

    /// Repaint the whole frame and present it.
    ///
    /// # Errors
    /// The surface failed to present.
    pub fn redraw(&mut self) -> Result<()> {
        if self.buffer.width() == 0 {
            return Ok(());
        }
        quadtree::redraw(
            self.universe.root(),
            &self.viewport,
            &mut self.buffer,
            &self.palette,
        );
        self.surface.present(&self.buffer)
    }

    /// Camera operations cannot fail; a surface error is logged instead.
    fn redraw_logged(&mut self) {
        if let Err(e) = self.redraw() {
            log::warn!("redraw failed: {e}");
        }
    }

    /// Present whatever is in the buffer, redrawing first if it was reallocated.
    ///
    /// # Errors
    /// The surface failed to present.
    pub fn present(&mut self) -> Result<()> {
        if self.buffer.is_stale() {
            return self.redraw();
        }
        self.surface.present(&self.buffer)
    }

    /// Current frame as RGBA bytes, redrawing first if the buffer is stale.
    pub fn present_buffer(&mut self) -> &[u8] {
        if self.buffer.is_stale() {
            self.redraw_logged();
        }
        self.buffer.as_bytes()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    /// Nudge the view by the configured pan step.
    pub fn pan_direction(&mut self, direction: Direction) {
        self.viewport.pan(direction, self.config.pan_step);
        self.redraw_logged();
    }

    pub fn zoom_centered(&mut self, out: bool) {
        self.viewport.zoom_centered(out);
        self.redraw_logged();
    }

    /// Zoom one step keeping the content under logical `(x, y)` fixed.
    pub fn zoom_at(&mut self, out: bool, x: f64, y: f64) {
        self.viewport.zoom_at(out, x, y);
        self.redraw_logged();
    }

    /// Zoom to the largest power of two not above `cell_width`.
    pub fn zoom_to(&mut self, cell_width: f64) {
        self.viewport.zoom_to(cell_width);
        self.redraw_logged();
    }

    pub fn center_view(&mut self) {
        self.viewport.center_view();
        self.redraw_logged();
    }

    /// Autoframe the live cells, or reset to the default zoom when empty.
    pub fn fit_view(&mut self) {
        let bounds = self.universe.bounds();
        self.viewport
            .fit_to_bounds(&bounds, self.config.overscan, self.config.default_zoom);
        self.redraw_logged();
    }

    /// Translate by a logical-pixel delta.
    pub fn move_offset(&mut self, dx: f64, dy: f64) {
        self.viewport.move_offset(dx, dy);
        self.redraw_logged();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn cell_width(&self) -> f64 {
        self.viewport.cell_width
    }

    /// Cell under logical `(x, y)`.
    pub fn pixel_to_cell(&self, x: f64, y: f64) -> (i64, i64) {
        self.viewport.pixel_to_cell(x, y)
    }

    // ------------------------------------------------------------------
    // Editing & pointer input
    // ------------------------------------------------------------------

    /// Set a cell and show it without a full redraw.
    ///
    /// # Errors
    /// The surface failed to present.
    pub fn paint_cell(&mut self, x: i64, y: i64, alive: bool) -> Result<CellEdit> {
        let edit = editor::paint_cell(
            &mut self.universe,
            &self.viewport,
            &mut self.buffer,
            &self.palette,
            x,
            y,
            alive,
        );
        self.present()?;
        Ok(edit)
    }

    /// Mode used by [`Self::on_pointer_down`] when the host does not pass one.
    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.mode = mode;
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.mode
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    /// Pointer pressed at logical `(x, y)`.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, mode: Option<PointerMode>) {
        let mode = mode.unwrap_or(self.mode);
        self.pointer_event(PointerEvent::Down { x, y, mode });
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer_event(PointerEvent::Move { x, y });
    }

    /// Pointer released or cancelled.
    pub fn on_pointer_up(&mut self) {
        self.pointer_event(PointerEvent::Up);
    }

    fn pointer_event(&mut self, event: PointerEvent) {
        let universe = &self.universe;
        let (next, action) = events::transition(self.pointer, event, &self.viewport, |x, y| {
            universe.is_alive(x, y)
        });
        self.pointer = next;
        match action {
            PointerAction::None => {}
            PointerAction::Pan { dx, dy } => self.move_offset(dx, dy),
            PointerAction::Paint { cell, alive } => {
                if let Err(e) = self.paint_cell(cell.0, cell.1, alive) {
                    log::warn!("paint failed: {e}");
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Universe
    // ------------------------------------------------------------------

    /// Replace the universe with cells from a flat `[x0, y0, x1, y1, ...]` list.
    ///
    /// # Errors
    /// Odd-length lists.
    pub fn load_cells(&mut self, flat: &[i32]) -> Result<()> {
        let universe = Universe::from_flat(flat)?;
        log::debug!("load_cells: {} cells", universe.population());
        self.set_universe(universe);
        Ok(())
    }

    /// Replace the universe and redraw.
    pub fn set_universe(&mut self, universe: Universe) {
        self.universe = universe;
        self.pointer = PointerState::Idle;
        self.redraw_logged();
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Live cells sorted by row, then column.
    pub fn cells(&self) -> Vec<(i64, i64)> {
        self.universe.cells()
    }

    pub fn population(&self) -> u64 {
        self.universe.population()
    }

    pub fn level(&self) -> u8 {
        self.universe.level()
    }

    pub fn is_alive(&self, x: i64, y: i64) -> bool {
        self.universe.is_alive(x, y)
    }

    pub fn bounds(&self) -> Bounds {
        self.universe.bounds()
    }

    // ------------------------------------------------------------------
    // Colors & configuration
    // ------------------------------------------------------------------

    /// # Errors
    /// Malformed color strings; the previous color is kept.
    pub fn set_background_color(&mut self, color: &str) -> Result<()> {
        self.palette.background = Rgb::from_hex(color)?.pack();
        self.config.background = color.to_string();
        self.redraw_logged();
        Ok(())
    }

    /// # Errors
    /// Malformed color strings; the previous color is kept.
    pub fn set_cell_color(&mut self, color: &str) -> Result<()> {
        self.palette.cell = Rgb::from_hex(color)?.pack();
        self.config.cell_color = color.to_string();
        self.redraw_logged();
        Ok(())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace all render settings at once.
    ///
    /// # Errors
    /// Invalid configuration; nothing changes.
    pub fn set_config(&mut self, config: RenderConfig) -> Result<()> {
        self.palette = config.palette()?;
        self.config = config;
        self.redraw_logged();
        Ok(())
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl LifeView {
    /// Create a viewer drawing into `canvas`.
    ///
    /// `config` is an optional JSON string of render settings.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        dpr: f64,
        config: Option<String>,
    ) -> std::result::Result<LifeView, JsValue> {
        console_error_panic_hook::set_once();
        if log::max_level() == log::LevelFilter::Off {
            crate::logging::init(log::LevelFilter::Warn);
        }

        let config = match config {
            Some(json) => RenderConfig::from_json(&json)?,
            None => RenderConfig::default(),
        };
        let physical_width = canvas.width().max(1);
        let physical_height = canvas.height().max(1);
        let surface = CanvasSurface::new(canvas)?;
        let mut view = LifeView::with_surface(Box::new(surface), config)?;
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        view.resize(
            f64::from(physical_width) / dpr,
            f64::from(physical_height) / dpr,
            dpr,
        );
        Ok(view)
    }

    #[wasm_bindgen(js_name = resize)]
    pub fn js_resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.resize(width, height, dpr);
    }

    #[wasm_bindgen(js_name = redraw)]
    pub fn js_redraw(&mut self) -> std::result::Result<(), JsValue> {
        Ok(self.redraw()?)
    }

    /// RGBA bytes of the current frame, ready for `new ImageData(bytes, w, h)`.
    #[wasm_bindgen(js_name = presentBuffer)]
    pub fn js_present_buffer(&mut self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.present_buffer())
    }

    /// `"up"`, `"down"`, `"left"` or `"right"`.
    #[wasm_bindgen(js_name = panDirection)]
    pub fn js_pan_direction(&mut self, direction: &str) -> std::result::Result<(), JsValue> {
        let direction = Direction::parse(direction).ok_or_else(|| {
            crate::error::LifeviewError::Configuration(format!("unknown direction {direction:?}"))
        })?;
        self.pan_direction(direction);
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomCentered)]
    pub fn js_zoom_centered(&mut self, out: bool) {
        self.zoom_centered(out);
    }

    #[wasm_bindgen(js_name = zoomAt)]
    pub fn js_zoom_at(&mut self, out: bool, x: f64, y: f64) {
        self.zoom_at(out, x, y);
    }

    #[wasm_bindgen(js_name = zoomTo)]
    pub fn js_zoom_to(&mut self, cell_width: f64) {
        self.zoom_to(cell_width);
    }

    #[wasm_bindgen(js_name = centerView)]
    pub fn js_center_view(&mut self) {
        self.center_view();
    }

    #[wasm_bindgen(js_name = fitView)]
    pub fn js_fit_view(&mut self) {
        self.fit_view();
    }

    #[wasm_bindgen(js_name = moveOffset)]
    pub fn js_move_offset(&mut self, dx: f64, dy: f64) {
        self.move_offset(dx, dy);
    }

    /// `[x, y]` of the cell under logical `(x, y)`.
    #[wasm_bindgen(js_name = pixelToCell)]
    #[allow(clippy::cast_precision_loss)]
    pub fn js_pixel_to_cell(&self, x: f64, y: f64) -> Vec<f64> {
        let (cx, cy) = self.pixel_to_cell(x, y);
        vec![cx as f64, cy as f64]
    }

    #[wasm_bindgen(js_name = paintCell)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn js_paint_cell(&mut self, x: f64, y: f64, alive: bool) -> std::result::Result<(), JsValue> {
        self.paint_cell(x.floor() as i64, y.floor() as i64, alive)?;
        Ok(())
    }

    /// `mode` is `"pan"` or `"draw"`; omitted uses the current pointer mode.
    #[wasm_bindgen(js_name = onPointerDown)]
    pub fn js_on_pointer_down(&mut self, x: f64, y: f64, mode: Option<String>) {
        let mode = mode.as_deref().and_then(PointerMode::parse);
        self.on_pointer_down(x, y, mode);
    }

    #[wasm_bindgen(js_name = onPointerMove)]
    pub fn js_on_pointer_move(&mut self, x: f64, y: f64) {
        self.on_pointer_move(x, y);
    }

    #[wasm_bindgen(js_name = onPointerUp)]
    pub fn js_on_pointer_up(&mut self) {
        self.on_pointer_up();
    }

    #[wasm_bindgen(js_name = setPointerMode)]
    pub fn js_set_pointer_mode(&mut self, mode: &str) -> std::result::Result<(), JsValue> {
        let mode = PointerMode::parse(mode).ok_or_else(|| {
            crate::error::LifeviewError::Configuration(format!("unknown pointer mode {mode:?}"))
        })?;
        self.set_pointer_mode(mode);
        Ok(())
    }

    /// Replace the universe with a flat `[x0, y0, x1, y1, ...]` list.
    #[wasm_bindgen(js_name = loadCells)]
    pub fn js_load_cells(&mut self, cells: Vec<i32>) -> std::result::Result<(), JsValue> {
        Ok(self.load_cells(&cells)?)
    }

    /// Live cells as a flat `[x0, y0, x1, y1, ...]` list.
    #[wasm_bindgen(js_name = cells)]
    #[allow(clippy::cast_precision_loss)]
    pub fn js_cells(&self) -> Vec<f64> {
        self.cells()
            .into_iter()
            .flat_map(|(x, y)| [x as f64, y as f64])
            .collect()
    }

    #[wasm_bindgen(js_name = population)]
    #[allow(clippy::cast_precision_loss)]
    pub fn js_population(&self) -> f64 {
        self.population() as f64
    }

    #[wasm_bindgen(js_name = level)]
    pub fn js_level(&self) -> u8 {
        self.level()
    }

    #[wasm_bindgen(js_name = isAlive)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn js_is_alive(&self, x: f64, y: f64) -> bool {
        self.is_alive(x.floor() as i64, y.floor() as i64)
    }

    /// `{left, right, top, bottom}`; all infinite when empty.
    #[wasm_bindgen(js_name = bounds)]
    pub fn js_bounds(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.bounds()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setBackgroundColor)]
    pub fn js_set_background_color(&mut self, color: &str) -> std::result::Result<(), JsValue> {
        Ok(self.set_background_color(color)?)
    }

    #[wasm_bindgen(js_name = setCellColor)]
    pub fn js_set_cell_color(&mut self, color: &str) -> std::result::Result<(), JsValue> {
        Ok(self.set_cell_color(color)?)
    }

    /// Replace render settings from a JSON string.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn js_set_config(&mut self, json: &str) -> std::result::Result<(), JsValue> {
        let config = RenderConfig::from_json(json)?;
        Ok(self.set_config(config)?)
    }

    #[wasm_bindgen(js_name = viewportState)]
    pub fn js_viewport_state(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.viewport_state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = cellWidth)]
    pub fn js_cell_width(&self) -> f64 {
        self.cell_width()
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

    fn tromino_view() -> LifeView {
        let mut view = LifeView::new_test(100.0, 100.0, 1.0);
        view.load_cells(&[0, 0, 1, 0, 1, -1]).unwrap();
        view.zoom_to(10.0);
        view.center_view();
        view
    }

    #[test]
    fn new_test_allocates_device_buffer() {
        let view = LifeView::new_test(50.0, 40.0, 2.0);
        assert_eq!(view.buffer().width(), 100);
        assert_eq!(view.buffer().height(), 80);
        assert!(!view.buffer().is_stale());
    }

    #[test]
    fn camera_calls_redraw() {
        let mut view = tromino_view();
        // zoom_to(10) lands on 8: squares of 8 - 0 border.
        assert_eq!(view.cell_width(), 8.0);
        assert_eq!(view.buffer().count(view.palette().cell), 3 * 64);

        view.move_offset(1000.0, 0.0);
        assert_eq!(view.buffer().count(view.palette().cell), 0);
        view.center_view();
        assert_eq!(view.buffer().count(view.palette().cell), 3 * 64);
    }

    #[test]
    fn resize_reallocates_and_redraws() {
        let mut view = tromino_view();
        view.resize(60.0, 30.0, 1.0);
        assert_eq!(view.buffer().width(), 60);
        assert_eq!(view.buffer().pixels().len(), 60 * 30);
        assert!(!view.buffer().is_stale());
        assert_eq!(view.present_buffer().len(), 60 * 30 * 4);
        // Zero size keeps the old buffer.
        view.resize(0.0, 30.0, 1.0);
        assert_eq!(view.buffer().width(), 60);
    }

    #[test]
    fn draw_mode_pointer_toggles_cells() {
        let mut view = tromino_view();
        view.set_pointer_mode(PointerMode::Draw);
        // Cell (0, 0) is alive: pressing on it erases.
        view.on_pointer_down(51.0, 51.0, None);
        assert!(!view.is_alive(0, 0));
        view.on_pointer_move(60.0, 51.0);
        assert!(!view.is_alive(1, 0));
        view.on_pointer_up();
        assert_eq!(view.pointer_state(), PointerState::Idle);
        assert_eq!(view.population(), 1);
    }

    #[test]
    fn pan_mode_pointer_drags_view() {
        let mut view = tromino_view();
        view.on_pointer_down(10.0, 10.0, Some(PointerMode::Pan));
        view.on_pointer_move(14.0, 2.0);
        assert_eq!(
            (view.viewport().offset_x, view.viewport().offset_y),
            (54, 42)
        );
        view.on_pointer_up();
        view.on_pointer_move(100.0, 100.0);
        assert_eq!(view.viewport().offset_x, 54);
    }

    #[test]
    fn fit_view_frames_loaded_cells() {
        let mut view = LifeView::new_test(400.0, 400.0, 1.0);
        view.load_cells(&[-10, -10, 9, 9]).unwrap();
        view.fit_view();
        assert_eq!(view.cell_width(), 16.0);
        assert_eq!(view.bounds(), Bounds::new(-10.0, 10.0, -10.0, 10.0));
        assert_eq!(view.pixel_to_cell(200.0, 200.0), (0, 0));
    }

    #[test]
    fn fit_view_frames_cells_far_from_origin() {
        let mut view = LifeView::new_test(400.0, 400.0, 1.0);
        view.load_cells(&[100_000_000, 0]).unwrap();
        view.fit_view();
        assert_eq!(view.cell_width(), 128.0);
        assert_eq!(view.pixel_to_cell(200.0, 200.0), (100_000_000, 0));
        // 128 - floor(0.1 * 128) border
        assert_eq!(view.buffer().count(view.palette().cell), 116 * 116);
    }

    #[test]
    fn present_buffer_is_a_view_of_the_frame() {
        let mut view = tromino_view();
        let first = view.present_buffer().as_ptr();
        let second = view.present_buffer().as_ptr();
        assert_eq!(first, second);
        assert_eq!(first, view.buffer().pixels().as_ptr().cast::<u8>());
    }

    #[test]
    fn fit_view_on_empty_universe_uses_default_zoom() {
        let mut view = LifeView::new_test(300.0, 200.0, 1.0);
        view.fit_view();
        assert_eq!(view.cell_width(), 16.0);
        assert_eq!(view.viewport_state().offset_x, 150);
        assert_eq!(view.viewport_state().offset_y, 100);
    }

    #[test]
    fn bad_colors_keep_previous_palette() {
        let mut view = tromino_view();
        let before = *view.palette();
        assert!(view.set_cell_color("red").is_err());
        assert_eq!(*view.palette(), before);
        view.set_cell_color("#f00").unwrap();
        assert_eq!(view.palette().cell, 0xFF00_00FF);
        assert_eq!(view.buffer().count(0xFF00_00FF), 3 * 64);
    }

    #[test]
    fn odd_cell_list_is_rejected() {
        let mut view = tromino_view();
        assert!(view.load_cells(&[1, 2, 3]).is_err());
        assert_eq!(view.population(), 3);
    }

    #[test]
    fn pan_direction_uses_configured_step() {
        let mut view = tromino_view();
        view.pan_direction(Direction::Left);
        assert_eq!(view.viewport().offset_x, 100);
        assert_eq!(view.cells(), vec![(1, -1), (0, 0), (1, 0)]);
    }
}
