//! Test fixtures for building universes from small text pictures.
//!
//! # Example
//!
//! ```rust
//! use fixtures::PatternBuilder;
//!
//! let glider = PatternBuilder::new()
//!     .row(".O.")
//!     .row("..O")
//!     .row("OOO")
//!     .at(-1, -1)
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use lifeview::{LifeView, Universe};

/// Builder for universes drawn as rows of `O` (alive) and `.` (dead).
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    rows: Vec<String>,
    left: i64,
    top: i64,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: &str) -> Self {
        self.rows.push(row.to_string());
        self
    }

    /// Cell coordinates of the picture's top-left character.
    pub fn at(mut self, left: i64, top: i64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn cells(&self) -> Vec<(i64, i64)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(dy, row)| {
                row.chars()
                    .enumerate()
                    .filter(|(_, c)| matches!(c, 'O' | 'o' | '*'))
                    .map(move |(dx, _)| (dx as i64, dy as i64))
            })
            .map(|(dx, dy)| (self.left + dx, self.top + dy))
            .collect()
    }

    pub fn build(&self) -> Universe {
        Universe::construct(&self.cells())
    }

    /// Cells as the flat `[x0, y0, ...]` list hosts pass in.
    pub fn flat(&self) -> Vec<i32> {
        self.cells()
            .into_iter()
            .flat_map(|(x, y)| [x as i32, y as i32])
            .collect()
    }
}

pub fn glider() -> PatternBuilder {
    PatternBuilder::new().row(".O.").row("..O").row("OOO")
}

pub fn block() -> PatternBuilder {
    PatternBuilder::new().row("OO").row("OO")
}

/// `(0,0), (1,0), (1,-1)`
pub fn l_tromino() -> PatternBuilder {
    PatternBuilder::new().row(".O").row("OO").at(0, -1)
}

/// Headless viewer of logical size `w x h` at ratio 1 showing `pattern`.
pub fn view_with(w: f64, h: f64, pattern: &PatternBuilder) -> LifeView {
    let mut view = LifeView::new_test(w, h, 1.0);
    view.set_universe(pattern.build());
    view
}
