//! Camera state and coordinate transforms.
//!
//! This module handles:
//! - Viewport state (offset, power-of-two zoom, canvas size, pixel ratio)
//! - Conversions between logical pixels, device pixels and cells
//! - Pan, zoom and autoframe

mod camera;
mod viewport;

pub use camera::{snap_power_of_two, Direction, MAX_ZOOM_EXP, MIN_ZOOM_EXP};
pub use viewport::{Viewport, ViewportState};
