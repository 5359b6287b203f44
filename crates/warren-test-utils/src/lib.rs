//! Test utilities for Warren development.
//!
//! Provides seeded grid fixtures ([`Grid`]), slab-backed adjacency lists
//! ([`Adjacency`]), a reference A* search that composes all four Warren
//! components ([`SearchContext`]), and a brute-force Dijkstra oracle
//! ([`dijkstra`]) to check it against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod grid;
pub mod oracle;
pub mod search;

pub use grid::{Edge, Grid, STEP_COST};
pub use oracle::dijkstra;
pub use search::{Adjacency, Path, SearchContext, SearchError};
