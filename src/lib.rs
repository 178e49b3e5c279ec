//! lifeview - quadtree viewport renderer for Game of Life universes
//!
//! Turns a shared, canonical quadtree of cells into an RGBA frame and keeps
//! a camera over it, in the browser via WebAssembly and Canvas 2D:
//! - Culling draw that stops at one node per device pixel
//! - Power-of-two zoom anchored at any point, pan, autoframe
//! - Click and drag editing painted straight into the frame
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { LifeView } from 'lifeview';
//! await init();
//! const view = new LifeView(canvas, devicePixelRatio);
//! view.loadCells(new Int32Array([0, 0, 1, 0, 1, -1]));
//! view.fitView();
//! ```

pub mod config;
pub mod editor;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod logging;
pub mod universe;

// Rendering modules (Canvas 2D)
pub mod layout;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

// Re-export the main viewer struct
pub use viewer::LifeView;

pub use config::{Palette, RenderConfig};
pub use error::{LifeviewError, Result};
pub use layout::{Direction, Viewport, ViewportState};
pub use universe::{Automaton, Bounds, Node, NodeRef, Universe};

/// Default render settings as a JSON string
///
/// # Errors
/// Returns an error if serialization fails.
#[wasm_bindgen]
pub fn default_config() -> std::result::Result<String, JsValue> {
    serde_json::to_string(&RenderConfig::default())
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Route `log` records to the browser console at `level`
/// (`"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`).
///
/// # Errors
/// Returns an error for unknown level names.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> std::result::Result<(), JsValue> {
    let filter = logging::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("unknown log level {level:?}")))?;
    logging::init(filter);
    Ok(())
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
