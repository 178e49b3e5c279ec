//! Browser tests for the Canvas 2D surface.
//!
//! Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use lifeview::LifeView;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

#[wasm_bindgen_test]
fn canvas_viewer_draws_loaded_cells() {
    let mut view = LifeView::new(canvas(100, 100), 1.0, None).unwrap();
    view.js_load_cells(vec![0, 0, 1, 0, 1, -1]).unwrap();
    view.js_zoom_to(10.0);
    view.js_center_view();
    assert_eq!(view.js_cell_width(), 8.0);
    assert_eq!(view.js_population(), 3.0);
    assert_eq!(view.js_present_buffer().length(), 100 * 100 * 4);
}

#[wasm_bindgen_test]
fn canvas_viewer_rejects_bad_config() {
    let result = LifeView::new(canvas(10, 10), 1.0, Some(r#"{"cellColor": "nope"}"#.to_string()));
    assert!(result.is_err());
}
