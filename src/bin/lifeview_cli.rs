//! CLI tool for lifeview - renders a scene headlessly and prints a frame summary
//!
//! Usage:
//!   lifeview_cli <scene.json>                # Print JSON summary to stdout
//!   lifeview_cli <scene.json> -o frame.rgba  # Also write raw RGBA pixels
//!
//! A scene is `{"width", "height", "dpr", "cells": [[x, y], ...], "config",
//! "zoom", "fit"}`; everything but `cells` is optional.
//! Set `RUST_LOG=debug` to trace resize and autoframe decisions.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use lifeview::{Automaton, Bounds, LifeView, RenderConfig, Universe, ViewportState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scene {
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_height")]
    height: f64,
    #[serde(default = "default_dpr")]
    dpr: f64,
    cells: Vec<(i64, i64)>,
    #[serde(default)]
    config: RenderConfig,
    /// Explicit cell width; wins over `fit`
    zoom: Option<f64>,
    #[serde(default = "default_fit")]
    fit: bool,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_dpr() -> f64 {
    1.0
}

fn default_fit() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameSummary {
    viewport: ViewportState,
    population: u64,
    level: u8,
    bounds: Option<Bounds>,
    lit_pixels: usize,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: lifeview_cli <scene.json> [-o frame.rgba]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read scene
    let json = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };
    let scene: Scene = match serde_json::from_str(&json) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing scene: {}", e);
            std::process::exit(1);
        }
    };

    // Render
    let mut view = LifeView::new_test(scene.width, scene.height, scene.dpr);
    if let Err(e) = view.set_config(scene.config) {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }
    view.set_universe(Universe::construct(&scene.cells));
    match scene.zoom {
        Some(zoom) => {
            view.zoom_to(zoom);
            view.center_view();
        }
        None if scene.fit => view.fit_view(),
        None => view.center_view(),
    }

    let bounds = view.universe().bounds();
    let summary = FrameSummary {
        viewport: view.viewport_state(),
        population: view.population(),
        level: view.level(),
        bounds: bounds.is_finite().then_some(bounds),
        lit_pixels: view.buffer().count(view.palette().cell),
    };

    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, view.present_buffer()) {
            eprintln!("Error writing {}: {}", path, e);
            std::process::exit(1);
        }
        eprintln!("Written: {}", path);
    }

    let json = match serde_json::to_string_pretty(&summary) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}
