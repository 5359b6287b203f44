//! Double-ended circular buffer for the Warren pathfinding substrate.
//!
//! [`CircularBuffer`] accumulates sequences such as path waypoints and
//! visitation windows with O(1) pushes and pops at both ends. Capacity is
//! always a power of two and every slot is found by masking, never by
//! modulo.
//!
//! # Absolute indices
//!
//! Each element gets an *absolute index* when it is pushed: one past the
//! current end for [`push_end`](CircularBuffer::push_end), one before the
//! current start for [`push_start`](CircularBuffer::push_start). That index
//! does not change while the element stays in the buffer, whatever happens
//! at the other end and across [`grow`](CircularBuffer::grow). The *logical
//! index* is the usual `0..len` position from the current front.
//!
//! ```text
//! push_end 0..=4, pop_start twice:
//!   absolute   2  3  4
//!   logical    0  1  2
//! ```
//!
//! [`RingPool`] recycles buffers between path-processing calls.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod pool;

pub use buffer::{CircularBuffer, Iter};
pub use config::RingPoolConfig;
pub use error::RingError;
pub use pool::RingPool;
