//! Strongly-typed identifiers shared between the search and its data structures.

use std::fmt;

/// Dense index of a node in the graph's per-node record table.
///
/// Assigned once at graph-build time. The substrate only reads and writes
/// node state through this index; it never grows or shrinks the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// The index as a `usize`, for addressing tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Position of a node inside the open set, stored on the node record.
///
/// This back-reference is what makes decrease-key O(log n): the heap finds a
/// queued node's entry without searching. [`HeapSlot::NONE`] marks a node
/// that is not queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeapSlot(u32);

impl HeapSlot {
    /// Sentinel: the node is not in the open set.
    pub const NONE: HeapSlot = HeapSlot(u32::MAX);

    /// Largest representable slot position.
    pub const MAX_POSITION: usize = (u32::MAX - 1) as usize;

    /// Slot at heap position `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` exceeds [`HeapSlot::MAX_POSITION`].
    #[inline]
    pub fn at(position: usize) -> Self {
        assert!(
            position <= Self::MAX_POSITION,
            "heap position {position} does not fit in a heap slot"
        );
        Self(position as u32)
    }

    /// The heap position, or `None` for [`HeapSlot::NONE`].
    #[inline]
    pub fn position(self) -> Option<usize> {
        if self == Self::NONE {
            None
        } else {
            Some(self.0 as usize)
        }
    }

    /// Whether this slot refers to a queued node.
    #[inline]
    pub fn is_queued(self) -> bool {
        self != Self::NONE
    }
}

impl Default for HeapSlot {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for HeapSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(p) => write!(f, "{p}"),
            None => write!(f, "none"),
        }
    }
}
