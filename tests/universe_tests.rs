//! Tests for the reference universe: construction, canonical sharing,
//! edits, bounds and expansion.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;
use std::sync::Arc;

use fixtures::{block, glider, PatternBuilder};
use lifeview::universe::{MAX_LEVEL, MIN_LEVEL};
use lifeview::{Automaton, Bounds, LifeviewError, Universe};

#[test]
fn test_construct_round_trips_cells() {
    let pattern = glider().at(-7, 12);
    let universe = pattern.build();
    let mut expected = pattern.cells();
    expected.sort_by_key(|&(x, y)| (y, x));
    assert_eq!(universe.cells(), expected);
    assert_eq!(universe.population(), 5);
}

#[test]
fn test_identical_blocks_share_nodes() {
    // Two blocks in the same position of opposite quadrants.
    let universe = PatternBuilder::new()
        .row("OO..............")
        .row("OO..............")
        .at(-8, -8)
        .build();
    let other = block().at(0, 0);
    let mut universe = universe;
    for (x, y) in other.cells() {
        universe.set_cell(x, y, true);
    }
    let q = universe.root().children().unwrap();
    assert!(Arc::ptr_eq(q.nw, q.se));
    assert!(Arc::ptr_eq(q.ne, q.sw));
}

#[test]
fn test_bounds_are_exclusive_on_right_and_bottom() {
    let universe = block().at(3, -2).build();
    assert_eq!(universe.bounds(), Bounds::new(3.0, 5.0, -2.0, 0.0));
}

#[test]
fn test_empty_bounds_are_not_finite() {
    let mut universe = block().build();
    for (x, y) in block().cells() {
        universe.set_cell(x, y, false);
    }
    assert_eq!(universe.population(), 0);
    assert!(!universe.bounds().is_finite());
}

#[test]
fn test_growth_keeps_existing_cells() {
    let mut universe = glider().build();
    assert_eq!(universe.level(), MIN_LEVEL);
    universe.set_cell(-1000, 5000, true);
    assert!(universe.level() > MIN_LEVEL);
    for (x, y) in glider().cells() {
        assert!(universe.is_alive(x, y));
    }
    assert!(universe.is_alive(-1000, 5000));
    assert!(!universe.is_alive(-1000, 5001));
    assert_eq!(universe.population(), 6);
}

#[test]
fn test_clearing_outside_extent_does_not_grow() {
    let mut universe = glider().build();
    universe.set_cell(1 << 30, 0, false);
    assert_eq!(universe.level(), MIN_LEVEL);
}

#[test]
fn test_cells_beyond_max_level_are_rejected() {
    let mut universe = Universe::new();
    universe.set_cell(1 << 50, 0, true);
    assert_eq!(universe.population(), 0);
    assert!(universe.level() <= MAX_LEVEL);
}

#[test]
fn test_from_flat_pairs() {
    let universe = Universe::from_flat(&[0, 0, 1, 0, 1, -1, 1, -1]).unwrap();
    assert_eq!(universe.cells(), vec![(1, -1), (0, 0), (1, 0)]);
    assert!(matches!(
        Universe::from_flat(&[4]),
        Err(LifeviewError::InvalidCells(_))
    ));
    assert_eq!(Universe::from_flat(&[]).unwrap().population(), 0);
}
