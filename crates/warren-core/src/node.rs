//! The external per-node record table.
//!
//! Search state lives in a dense table owned by the graph, addressed by
//! [`NodeIndex`]. The open set never owns node records; it only reads and
//! writes each record's [`HeapSlot`] through the [`HeapSlots`] trait.

use std::ops::{Index, IndexMut};

use crate::id::{HeapSlot, NodeIndex};

/// Access to the heap-slot back-reference stored on each node record.
///
/// Implemented by whatever table holds per-node search state. The open set
/// keeps every queued node's slot in sync with its position, and resets it
/// to [`HeapSlot::NONE`] when the node leaves the heap.
pub trait HeapSlots {
    /// Current heap slot of `node`.
    fn heap_slot(&self, node: NodeIndex) -> HeapSlot;

    /// Record that `node` now lives at `slot`.
    fn set_heap_slot(&mut self, node: NodeIndex, slot: HeapSlot);
}

/// Per-node search state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// Cost from the start node.
    pub g: u32,
    /// Heuristic estimate of the remaining cost.
    pub h: u32,
    /// Node this one was reached from, if any.
    pub parent: Option<NodeIndex>,
    /// Position in the open set.
    pub heap_slot: HeapSlot,
    /// Extra traversal cost added when entering this node.
    pub penalty: u32,
    /// Whether the node can be entered at all.
    pub walkable: bool,
    /// Whether the node has been finalized by the current search.
    pub closed: bool,
}

impl SearchNode {
    /// Total estimated cost `g + h`, saturating.
    #[inline]
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }

    fn reset_search_state(&mut self) {
        self.g = u32::MAX;
        self.h = 0;
        self.parent = None;
        self.heap_slot = HeapSlot::NONE;
        self.closed = false;
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: u32::MAX,
            h: 0,
            parent: None,
            heap_slot: HeapSlot::NONE,
            penalty: 0,
            walkable: true,
            closed: false,
        }
    }
}

/// A dense table of [`SearchNode`] records.
///
/// The table is sized once at graph-build time. Searches reset the per-search
/// fields between runs; the static fields (`penalty`, `walkable`) survive.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    nodes: Vec<SearchNode>,
}

impl NodeTable {
    /// Create a table of `len` walkable, zero-penalty nodes.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); len],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record for `node`, or `None` if out of range.
    pub fn get(&self, node: NodeIndex) -> Option<&SearchNode> {
        self.nodes.get(node.index())
    }

    /// Mutable record for `node`, or `None` if out of range.
    pub fn get_mut(&mut self, node: NodeIndex) -> Option<&mut SearchNode> {
        self.nodes.get_mut(node.index())
    }

    /// Reset every per-search field, keeping `penalty` and `walkable`.
    pub fn reset_search_state(&mut self) {
        for node in &mut self.nodes {
            node.reset_search_state();
        }
    }

    /// Reset the per-search fields of a single node.
    ///
    /// Lets a search that tracks which nodes it touched undo only those
    /// instead of sweeping the whole table.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn reset_node(&mut self, node: NodeIndex) {
        self.nodes[node.index()].reset_search_state();
    }

    /// Iterate over `(index, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex(i as u32), n))
    }
}

impl Index<NodeIndex> for NodeTable {
    type Output = SearchNode;

    fn index(&self, node: NodeIndex) -> &SearchNode {
        &self.nodes[node.index()]
    }
}

impl IndexMut<NodeIndex> for NodeTable {
    fn index_mut(&mut self, node: NodeIndex) -> &mut SearchNode {
        &mut self.nodes[node.index()]
    }
}

impl HeapSlots for NodeTable {
    #[inline]
    fn heap_slot(&self, node: NodeIndex) -> HeapSlot {
        self.nodes[node.index()].heap_slot
    }

    #[inline]
    fn set_heap_slot(&mut self, node: NodeIndex, slot: HeapSlot) {
        self.nodes[node.index()].heap_slot = slot;
    }
}
