//! Small-object slab allocator for the Warren pathfinding substrate.
//!
//! [`SlabAllocator`] hands out short arrays of plain-old-data elements
//! (neighbour lists, path fragments, per-agent scratch) from one growable
//! arena of 64-bit words. Requests are rounded up to a power-of-two
//! [size class](class), and freed blocks go onto that class's intrusive free
//! list for reuse. There is no merging across classes.
//!
//! # Handles
//!
//! Allocations are addressed by [`SlabHandle`], an `(offset, generation)`
//! pair. Every block header carries the generation it was allocated under,
//! so a handle used after `free`, after `clear`, or after its block was
//! reused is reported as [`SlabError::StaleHandle`] instead of aliasing
//! someone else's data.
//!
//! # Arena layout
//!
//! ```text
//! arena: [hdr][payload.....][hdr][payload][hdr][payload.........] ...
//!          ^ handle.offset
//! ```
//!
//! See [`header`] for the header word encoding.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod class;
pub mod config;
pub mod error;
pub mod handle;
pub mod header;
pub mod slab;

pub use class::{size_class, NUM_CLASSES};
pub use config::SlabConfig;
pub use error::SlabError;
pub use handle::SlabHandle;
pub use slab::{SlabAllocator, MAX_ALLOCATION};
