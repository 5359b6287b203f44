//! Hierarchical sparse-set bitset for the Warren pathfinding substrate.
//!
//! [`HierarchicalBitSet`] tracks membership of dense integer ids (nodes
//! touched this frame, agents needing a repath, dirty tiles) with three
//! levels of 64-bit words:
//!
//! ```text
//! level 3   [.......1.......]            bit j set iff level-2 word j != 0
//! level 2   [..1....][1.....]            bit k set iff level-1 word k != 0
//! level 1   [.1..][..][1..1][...] ...    the raw bits
//! ```
//!
//! Enumeration walks the summaries top-down and skips empty regions 4096
//! bits at a time, so sparse sets over large id spaces stay cheap.
//!
//! # Concurrency
//!
//! [`set`](HierarchicalBitSet::set) and [`reset`](HierarchicalBitSet::reset)
//! take `&self` and are lock-free: any number of threads may mutate the set
//! at once. Summary words are only written when a level-1 word crosses
//! between zero and nonzero, and writers re-check the child word until their
//! summary bit agrees with it, so summaries are exact once writers are
//! quiescent. Enumeration is memory-safe during mutation but may observe a
//! mix of old and new states; callers serialize it against writers.
//! [`grow`](HierarchicalBitSet::grow) and
//! [`clear`](HierarchicalBitSet::clear) take `&mut self`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bitset;
pub mod error;
pub mod iter;

pub use bitset::HierarchicalBitSet;
pub use error::BitSetError;
pub use iter::Iter;
