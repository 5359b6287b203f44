//! Open-set priority scheduler for Warren shortest-path searches.
//!
//! [`OpenSet`] orders discovered-but-unfinalized nodes by `F = g + h`. It is
//! a 4-ary min-heap whose entries are correlated with the caller's node table
//! through a [`HeapSlot`](warren_core::HeapSlot) back-reference, which turns
//! decrease-key into an O(log n) sift instead of an O(n) search.
//!
//! # Ownership
//!
//! One search worker owns one `OpenSet`. It is created once per search
//! context and reset with [`OpenSet::clear`] between searches; its backing
//! storage is kept across resets.
//!
//! # Ordering
//!
//! Entries are compared by a packed 64-bit [`SortKey`]: the high half is `F`,
//! the low half a tie-breaker chosen by [`TieBreak`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod key;
pub mod open_set;

pub use config::{HeapConfig, TieBreak};
pub use error::HeapError;
pub use key::SortKey;
pub use open_set::{OpenEntry, OpenSet, ARITY};
