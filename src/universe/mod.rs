//! Read interface to the automaton engine, plus a minimal reference universe.
//!
//! The renderer only ever reads nodes (`level`, `population`, children) and
//! asks the engine to flip cells through [`Automaton`]. [`Universe`] is the
//! in-crate implementation: it builds canonical quadtrees from coordinate
//! lists and supports cell edits, but it never computes generations.
//!
//! Every internal node is interned in a join cache keyed by its children.
//! Edits leave superseded nodes behind in that cache; once it passes a
//! threshold, entries nothing else references are pruned.
//!
//! Coordinates: a root of level `L` covers `[-2^(L-1), 2^(L-1))` on both axes,
//! y grows downward, and cell `(0, 0)` is the top-left cell of the `se` quadrant.

mod bounds;
mod node;

pub use bounds::Bounds;
pub use node::{Node, NodeRef, Quadrants};

use std::collections::HashMap;
use std::sync::Arc;

/// Smallest root level a universe ever shrinks to.
pub const MIN_LEVEL: u8 = 3;

/// Largest root level; cells beyond `±2^(MAX_LEVEL-1)` are rejected.
pub const MAX_LEVEL: u8 = 48;

/// Cache size that triggers the first prune.
const PRUNE_THRESHOLD: usize = 1 << 12;

/// Operations the renderer consumes from an automaton engine.
pub trait Automaton {
    /// Current root node.
    fn root(&self) -> &NodeRef;

    /// Live-cell bounds; non-finite when the universe is empty.
    fn bounds(&self) -> Bounds;

    /// Whether the cell at `(x, y)` is alive.
    fn is_alive(&self, x: i64, y: i64) -> bool;

    /// Authoritative cell mutation.
    fn set_cell(&mut self, x: i64, y: i64, alive: bool);
}

/// Identity of a join: the addresses of its four canonical children.
type JoinKey = [usize; 4];

/// Reference universe with a canonical node cache.
#[derive(Debug)]
pub struct Universe {
    root: NodeRef,
    on: NodeRef,
    off: NodeRef,
    joins: HashMap<JoinKey, NodeRef>,
    zeros: Vec<NodeRef>,
    prune_at: usize,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// Empty universe with a root of [`MIN_LEVEL`].
    pub fn new() -> Self {
        let off = Arc::new(Node::Leaf(false));
        let mut universe = Self {
            root: Arc::clone(&off),
            on: Arc::new(Node::Leaf(true)),
            off: Arc::clone(&off),
            joins: HashMap::new(),
            zeros: vec![off],
            prune_at: PRUNE_THRESHOLD,
        };
        universe.root = universe.zero(MIN_LEVEL);
        universe
    }

    /// Build a universe from alive `(x, y)` pairs. Duplicates are harmless.
    pub fn construct(cells: &[(i64, i64)]) -> Self {
        let mut universe = Self::new();
        for &(x, y) in cells {
            universe.set_cell(x, y, true);
        }
        log::debug!(
            "constructed universe: {} cells, level {}",
            universe.population(),
            universe.level()
        );
        universe
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` list as passed by JavaScript.
    ///
    /// # Errors
    /// Returns [`LifeviewError::InvalidCells`](crate::error::LifeviewError::InvalidCells)
    /// when the list has an odd length.
    pub fn from_flat(coords: &[i32]) -> crate::error::Result<Self> {
        if coords.len() % 2 == 1 {
            return Err(crate::error::LifeviewError::InvalidCells(format!(
                "expected x/y pairs, got {} values",
                coords.len()
            )));
        }
        let pairs: Vec<(i64, i64)> = coords
            .chunks_exact(2)
            .filter_map(|pair| match pair {
                [x, y] => Some((i64::from(*x), i64::from(*y))),
                _ => None,
            })
            .collect();
        Ok(Self::construct(&pairs))
    }

    pub fn population(&self) -> u64 {
        self.root.population()
    }

    pub fn level(&self) -> u8 {
        self.root.level()
    }

    /// Number of distinct internal nodes held by the canonical cache.
    pub fn cached_nodes(&self) -> usize {
        self.joins.len()
    }

    /// Alive cells sorted by row, then column.
    pub fn cells(&self) -> Vec<(i64, i64)> {
        let mut out = Vec::with_capacity(usize::try_from(self.population()).unwrap_or(0));
        let half = Self::half_side(self.root.level());
        collect_cells(&self.root, -half, -half, &mut out);
        out.sort_by_key(|&(x, y)| (y, x));
        out
    }

    /// Drop cache entries that only the cache still references.
    ///
    /// Returns the number of entries removed. Nodes reachable from the root
    /// stay canonical.
    pub fn prune(&mut self) -> usize {
        let before = self.joins.len();
        loop {
            let len = self.joins.len();
            // A removed node releases its children, which may free them next pass.
            self.joins.retain(|_, node| Arc::strong_count(node) > 1);
            if self.joins.len() == len {
                break;
            }
        }
        self.prune_at = (self.joins.len() * 2).max(PRUNE_THRESHOLD);
        let removed = before - self.joins.len();
        log::debug!("pruned {removed} cached nodes, {} left", self.joins.len());
        removed
    }

    /// Canonical node for four children.
    fn join(&mut self, nw: NodeRef, ne: NodeRef, sw: NodeRef, se: NodeRef) -> NodeRef {
        let key: JoinKey = [
            Arc::as_ptr(&nw) as usize,
            Arc::as_ptr(&ne) as usize,
            Arc::as_ptr(&sw) as usize,
            Arc::as_ptr(&se) as usize,
        ];
        if let Some(node) = self.joins.get(&key) {
            return Arc::clone(node);
        }
        let node = Arc::new(Node::join(nw, ne, sw, se));
        self.joins.insert(key, Arc::clone(&node));
        node
    }

    /// Canonical empty node of `level`.
    fn zero(&mut self, level: u8) -> NodeRef {
        while self.zeros.len() <= usize::from(level) {
            let z = self
                .zeros
                .last()
                .map_or_else(|| Arc::clone(&self.off), Arc::clone);
            let next = self.join(Arc::clone(&z), Arc::clone(&z), Arc::clone(&z), z);
            self.zeros.push(next);
        }
        self.zeros
            .get(usize::from(level))
            .map_or_else(|| Arc::clone(&self.off), Arc::clone)
    }

    fn leaf(&self, alive: bool) -> NodeRef {
        if alive {
            Arc::clone(&self.on)
        } else {
            Arc::clone(&self.off)
        }
    }

    /// Half the side length of a node of `level`, in cells.
    fn half_side(level: u8) -> i64 {
        if level == 0 {
            0
        } else {
            1i64 << (level - 1)
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        let half = Self::half_side(self.root.level());
        (-half..half).contains(&x) && (-half..half).contains(&y)
    }

    /// Wrap the root in a twice-as-large root, keeping it centered.
    fn grow(&mut self) {
        let root = Arc::clone(&self.root);
        let Some(q) = root.children() else {
            return;
        };
        let z = self.zero(root.level() - 1);
        let nw = self.join(Arc::clone(&z), Arc::clone(&z), Arc::clone(&z), Arc::clone(q.nw));
        let ne = self.join(Arc::clone(&z), Arc::clone(&z), Arc::clone(q.ne), Arc::clone(&z));
        let sw = self.join(Arc::clone(&z), Arc::clone(q.sw), Arc::clone(&z), Arc::clone(&z));
        let se = self.join(Arc::clone(q.se), Arc::clone(&z), Arc::clone(&z), z);
        self.root = self.join(nw, ne, sw, se);
    }

    fn set_recurse(&mut self, node: &NodeRef, x: i64, y: i64, alive: bool) -> NodeRef {
        let Some(q) = node.children() else {
            return self.leaf(alive);
        };
        let (mut nw, mut ne, mut sw, mut se) = (
            Arc::clone(q.nw),
            Arc::clone(q.ne),
            Arc::clone(q.sw),
            Arc::clone(q.se),
        );
        let (cx, cy) = child_coords(node.level(), x, y);
        match (x >= 0, y >= 0) {
            (false, false) => nw = self.set_recurse(&nw, cx, cy, alive),
            (true, false) => ne = self.set_recurse(&ne, cx, cy, alive),
            (false, true) => sw = self.set_recurse(&sw, cx, cy, alive),
            (true, true) => se = self.set_recurse(&se, cx, cy, alive),
        }
        self.join(nw, ne, sw, se)
    }
}

impl Automaton for Universe {
    fn root(&self) -> &NodeRef {
        &self.root
    }

    fn bounds(&self) -> Bounds {
        let half = Self::half_side(self.root.level());
        bounds_recurse(&self.root, -half, -half)
    }

    fn is_alive(&self, x: i64, y: i64) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let mut node = &self.root;
        let (mut x, mut y) = (x, y);
        while let Some(q) = node.children() {
            let (cx, cy) = child_coords(node.level(), x, y);
            node = match (x >= 0, y >= 0) {
                (false, false) => q.nw,
                (true, false) => q.ne,
                (false, true) => q.sw,
                (true, true) => q.se,
            };
            (x, y) = (cx, cy);
        }
        node.is_alive()
    }

    fn set_cell(&mut self, x: i64, y: i64, alive: bool) {
        while !self.contains(x, y) {
            if !alive {
                // Nothing to clear outside the current extent.
                return;
            }
            if self.root.level() >= MAX_LEVEL {
                log::warn!("cell ({x}, {y}) is outside the addressable universe");
                return;
            }
            self.grow();
        }
        let root = Arc::clone(&self.root);
        self.root = self.set_recurse(&root, x, y, alive);
        drop(root);
        if self.joins.len() > self.prune_at {
            self.prune();
        }
    }
}

/// Translate coordinates into the child quadrant's centered frame.
///
/// Children of a level-1 node are single cells, whose frame is irrelevant.
fn child_coords(level: u8, x: i64, y: i64) -> (i64, i64) {
    if level < 2 {
        return (0, 0);
    }
    let quarter = 1i64 << (level - 2);
    let shift = |v: i64| if v < 0 { v + quarter } else { v - quarter };
    (shift(x), shift(y))
}

/// `left`/`top` are the node's top-left cell.
fn bounds_recurse(node: &Node, left: i64, top: i64) -> Bounds {
    if node.population() == 0 {
        return Bounds::EMPTY;
    }
    let Some(q) = node.children() else {
        return Bounds::cell(left, top);
    };
    let half = Universe::half_side(node.level());
    bounds_recurse(q.nw, left, top)
        .union(&bounds_recurse(q.ne, left + half, top))
        .union(&bounds_recurse(q.sw, left, top + half))
        .union(&bounds_recurse(q.se, left + half, top + half))
}

fn collect_cells(node: &Node, left: i64, top: i64, out: &mut Vec<(i64, i64)>) {
    if node.population() == 0 {
        return;
    }
    let Some(q) = node.children() else {
        out.push((left, top));
        return;
    };
    let half = Universe::half_side(node.level());
    collect_cells(q.nw, left, top, out);
    collect_cells(q.ne, left + half, top, out);
    collect_cells(q.sw, left, top + half, out);
    collect_cells(q.se, left + half, top + half, out);
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
    fn new_universe_is_empty() {
        let u = Universe::new();
        assert_eq!(u.population(), 0);
        assert_eq!(u.level(), MIN_LEVEL);
        assert!(!u.bounds().is_finite());
        assert!(u.cells().is_empty());
    }

    #[test]
    fn construct_places_cells_at_their_coordinates() {
        let cells = [(0, 0), (1, 0), (1, -1), (-3, 2)];
        let u = Universe::construct(&cells);
        assert_eq!(u.population(), 4);
        for (x, y) in cells {
            assert!(u.is_alive(x, y), "({x}, {y}) should be alive");
        }
        assert!(!u.is_alive(0, -1));
        assert!(!u.is_alive(-1, 0));
    }

    #[test]
    fn set_cell_can_clear() {
        let mut u = Universe::construct(&[(2, 2), (3, 3)]);
        u.set_cell(2, 2, false);
        assert!(!u.is_alive(2, 2));
        assert!(u.is_alive(3, 3));
        assert_eq!(u.population(), 1);
    }

    #[test]
    fn clearing_outside_extent_does_not_grow() {
        let mut u = Universe::new();
        u.set_cell(1_000, 1_000, false);
        assert_eq!(u.level(), MIN_LEVEL);
    }

    #[test]
    fn grows_to_fit_far_cells() {
        let mut u = Universe::construct(&[(1, 1)]);
        u.set_cell(-500, 700, true);
        assert!(u.level() >= 11);
        assert!(u.is_alive(1, 1));
        assert!(u.is_alive(-500, 700));
        assert_eq!(u.population(), 2);
    }

    #[test]
    fn bounds_are_exclusive_on_right_and_bottom() {
        let u = Universe::construct(&[(0, 0), (1, 0), (1, -1)]);
        assert_eq!(u.bounds(), Bounds::new(0.0, 2.0, -1.0, 1.0));
    }

    #[test]
    fn identical_subtrees_share_one_node() {
        // The same domino in the nw and se quadrants.
        let u = Universe::construct(&[(-4, -4), (-3, -4), (4, 4), (5, 4)]);
        let root = u.root();
        let q = root.children().unwrap();
        assert_eq!(q.nw.population(), 2);
        assert_eq!(q.se.population(), 2);
        assert_eq!(q.ne.population(), 0);
        assert!(Arc::ptr_eq(q.ne, q.sw));
        assert!(Arc::ptr_eq(q.nw, q.se));
    }

    #[test]
    fn cells_round_trip_sorted() {
        let u = Universe::construct(&[(5, 1), (-2, -7), (0, 1), (5, 1)]);
        assert_eq!(u.cells(), vec![(-2, -7), (0, 1), (5, 1)]);
    }

    #[test]
    fn prune_drops_superseded_nodes() {
        let mut u = Universe::new();
        let empty = u.cached_nodes();
        u.set_cell(3, 3, true);
        u.set_cell(3, 3, false);
        assert!(u.cached_nodes() > empty);
        assert!(u.prune() > 0);
        assert_eq!(u.cached_nodes(), empty);
        assert_eq!(u.population(), 0);
    }

    #[test]
    fn prune_keeps_live_nodes_canonical() {
        let mut u = Universe::construct(&[(-4, -4), (-3, -4)]);
        u.set_cell(-6, 6, true);
        u.set_cell(-6, 6, false);
        u.prune();
        u.set_cell(4, 4, true);
        u.set_cell(5, 4, true);
        let q = u.root().children().unwrap();
        assert!(Arc::ptr_eq(q.nw, q.se));
        assert_eq!(u.cells(), vec![(-4, -4), (-3, -4), (4, 4), (5, 4)]);
    }

    #[test]
    fn long_edit_sessions_keep_cache_bounded() {
        let mut u = Universe::construct(&[(0, 0)]);
        for i in 1..20_000 {
            u.set_cell(i, -i, true);
            u.set_cell(i, -i, false);
        }
        assert!(u.cached_nodes() < 2 * PRUNE_THRESHOLD, "{}", u.cached_nodes());
        assert_eq!(u.cells(), vec![(0, 0)]);
    }

    #[test]
    fn from_flat_rejects_odd_lengths() {
        assert!(Universe::from_flat(&[1, 2, 3]).is_err());
        let u = Universe::from_flat(&[1, 2, 3, 4]).unwrap();
        assert_eq!(u.cells(), vec![(1, 2), (3, 4)]);
        assert_eq!(Universe::from_flat(&[]).unwrap().population(), 0);
    }
}
