//! Core types for the Warren pathfinding substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other Warren crate builds on:
//!
//! - [`View`] / [`ViewMut`]: bounds-checked, non-owning windows over
//!   caller-owned memory.
//! - [`NodeIndex`] and [`HeapSlot`]: the dense integer handles that replace
//!   object references between the search and its per-node state.
//! - [`HeapSlots`] and [`NodeTable`]: the external per-node record table the
//!   open set reads and writes through.
//! - [`AllocatorKind`] and [`MemoryFootprint`]: the allocator-selection token
//!   and the reporting seam shared by all arena-style structures.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod error;
pub mod id;
pub mod node;
pub mod view;

pub use alloc::{AllocatorKind, MemoryFootprint};
pub use error::ViewError;
pub use id::{HeapSlot, NodeIndex};
pub use node::{HeapSlots, NodeTable, SearchNode};
pub use view::{View, ViewMut};
