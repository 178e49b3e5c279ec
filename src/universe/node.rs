//! Immutable quadtree nodes.
//!
//! A node of level `L` covers `2^L` cells per side. Nodes are shared through
//! [`NodeRef`] handles and expose no mutation; a [`super::Universe`] keeps
//! them canonical so equal subtrees are the same allocation.

use std::sync::Arc;

/// Shared handle to a node.
pub type NodeRef = Arc<Node>;

/// Quadtree node: a single cell or four quadrant children.
#[derive(Debug)]
pub enum Node {
    /// A single cell.
    Leaf(bool),
    /// Four children of level `level - 1`.
    Internal {
        level: u8,
        nw: NodeRef,
        ne: NodeRef,
        sw: NodeRef,
        se: NodeRef,
        population: u64,
        hash: u64,
    },
}

/// Children in engine order: north-west, north-east, south-west, south-east.
#[derive(Debug, Clone, Copy)]
pub struct Quadrants<'a> {
    pub nw: &'a NodeRef,
    pub ne: &'a NodeRef,
    pub sw: &'a NodeRef,
    pub se: &'a NodeRef,
}

impl Node {
    /// Join four same-level children. Used only by the universe's canonical cache.
    pub(crate) fn join(nw: NodeRef, ne: NodeRef, sw: NodeRef, se: NodeRef) -> Self {
        let level = nw.level() + 1;
        let population = nw.population() + ne.population() + sw.population() + se.population();
        let hash = u64::from(level)
            .wrapping_add(2)
            .wrapping_add(nw.hash().wrapping_mul(2_223_243_435_546_756_677))
            .wrapping_add(ne.hash().wrapping_mul(1_241_111_124_211_111_421))
            .wrapping_add(sw.hash().wrapping_mul(7_532_753_275_327_532_753))
            .wrapping_add(se.hash().wrapping_mul(9_876_503_214_123_056_789));
        Node::Internal {
            level,
            nw,
            ne,
            sw,
            se,
            population,
            hash,
        }
    }

    /// Quadtree depth; 0 for a single cell.
    pub fn level(&self) -> u8 {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal { level, .. } => *level,
        }
    }

    /// Number of live cells under this node.
    pub fn population(&self) -> u64 {
        match self {
            Node::Leaf(alive) => u64::from(*alive),
            Node::Internal { population, .. } => *population,
        }
    }

    /// Structural hash, stable across identical subtrees.
    pub fn hash(&self) -> u64 {
        match self {
            Node::Leaf(alive) => u64::from(*alive),
            Node::Internal { hash, .. } => *hash,
        }
    }

    /// True for a live leaf.
    pub fn is_alive(&self) -> bool {
        matches!(self, Node::Leaf(true))
    }

    /// The four children, or `None` for a leaf.
    pub fn children(&self) -> Option<Quadrants<'_>> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal { nw, ne, sw, se, .. } => Some(Quadrants { nw, ne, sw, se }),
        }
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

    #[test]
    fn join_sums_population_and_bumps_level() {
        let on = Arc::new(Node::Leaf(true));
        let off = Arc::new(Node::Leaf(false));
        let n = Node::join(
            Arc::clone(&on),
            Arc::clone(&off),
            Arc::clone(&off),
            Arc::clone(&on),
        );
        assert_eq!(n.level(), 1);
        assert_eq!(n.population(), 2);
        let q = n.children().unwrap();
        assert!(q.nw.is_alive());
        assert!(!q.ne.is_alive());
        assert!(q.se.is_alive());
    }

    #[test]
    fn leaves_have_no_children() {
        assert!(Node::Leaf(true).children().is_none());
        assert_eq!(Node::Leaf(true).population(), 1);
        assert_eq!(Node::Leaf(false).population(), 0);
    }

    #[test]
    fn hash_depends_on_quadrant_order() {
        let on = Arc::new(Node::Leaf(true));
        let off = Arc::new(Node::Leaf(false));
        let a = Node::join(
            Arc::clone(&on),
            Arc::clone(&off),
            Arc::clone(&off),
            Arc::clone(&off),
        );
        let b = Node::join(Arc::clone(&off), Arc::clone(&off), Arc::clone(&off), on);
        assert_ne!(a.hash(), b.hash());
    }
}
