//! Warren: a no-GC memory and scheduling substrate for real-time pathfinding.
//!
//! This is the facade crate that re-exports the public API of all Warren
//! sub-crates. A pathfinding engine running many searches per frame builds
//! on four primitives, all addressed by integer handles instead of
//! references:
//!
//! - an open-set priority queue with O(log n) decrease-key,
//! - a slab allocator for short typed arrays,
//! - a hierarchical bitset with lock-free concurrent mutation,
//! - a double-ended circular buffer with stable absolute indices.
//!
//! # Quick start
//!
//! ```rust
//! use warren::prelude::*;
//!
//! let mut table = NodeTable::new(4);
//! let mut open = OpenSet::with_tie_break(TieBreak::Heuristic);
//! open.add(&mut table, NodeIndex(2), 5, 1).unwrap();
//! open.add(&mut table, NodeIndex(3), 2, 2).unwrap();
//! assert_eq!(open.remove(&mut table).node, NodeIndex(3));
//!
//! let mut slab = SlabAllocator::<NodeIndex>::default();
//! let edges = slab.allocate_from(&[NodeIndex(1), NodeIndex(2)]).unwrap();
//! assert_eq!(slab.get_span(edges).unwrap().len(), 2);
//!
//! let dirty = HierarchicalBitSet::new(1024).unwrap();
//! dirty.set(700);
//! assert_eq!(dirty.iter().collect::<Vec<_>>(), vec![700]);
//!
//! let mut path = CircularBuffer::new();
//! path.push_end(NodeIndex(0));
//! path.push_start(NodeIndex(9));
//! assert_eq!(path.get_absolute(-1), NodeIndex(9));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `warren-core` | Views, node ids, heap slots, node table, allocator kinds |
//! | [`heap`] | `warren-heap` | Open-set priority queue |
//! | [`slab`] | `warren-slab` | Size-class slab allocator |
//! | [`bitset`] | `warren-bitset` | Hierarchical concurrent bitset |
//! | [`ring`] | `warren-ring` | Circular buffer and buffer pool |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Views, node identifiers, and shared traits (`warren-core`).
pub use warren_core as core;

/// Open-set priority queue (`warren-heap`).
///
/// [`heap::OpenSet`] orders nodes by `F = g + h` and keeps each queued
/// node's position in the caller's table for O(log n) decrease-key.
pub use warren_heap as heap;

/// Slab allocator (`warren-slab`).
pub use warren_slab as slab;

/// Hierarchical bitset (`warren-bitset`).
///
/// [`bitset::HierarchicalBitSet`] supports lock-free `set`/`reset` from
/// many threads and zero-allocation ascending enumeration.
pub use warren_bitset as bitset;

/// Circular buffer and pool (`warren-ring`).
pub use warren_ring as ring;

/// Common imports for typical Warren usage.
///
/// ```rust
/// use warren::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use warren_core::{
        AllocatorKind, HeapSlot, HeapSlots, MemoryFootprint, NodeIndex, NodeTable, SearchNode,
        View, ViewMut,
    };

    // Components
    pub use warren_bitset::HierarchicalBitSet;
    pub use warren_heap::{HeapConfig, OpenEntry, OpenSet, TieBreak};
    pub use warren_ring::{CircularBuffer, RingPool, RingPoolConfig};
    pub use warren_slab::{SlabAllocator, SlabConfig, SlabHandle};

    // Errors
    pub use warren_bitset::BitSetError;
    pub use warren_core::ViewError;
    pub use warren_heap::HeapError;
    pub use warren_ring::RingError;
    pub use warren_slab::SlabError;
}
