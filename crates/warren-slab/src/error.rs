//! Slab allocator error types.

use warren_core::ViewError;

use crate::handle::SlabHandle;

/// Errors that can occur during slab operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlabError {
    /// The request is larger than the largest size class.
    #[error("allocation of {requested} elements exceeds the maximum of {max}")]
    AllocationTooLarge {
        /// Number of elements requested.
        requested: usize,
        /// Largest supported request.
        max: usize,
    },
    /// The handle does not refer to a live allocation: it was freed, the
    /// slab was cleared, or its block has since been reused.
    #[error("stale slab handle {handle}")]
    StaleHandle {
        /// The rejected handle.
        handle: SlabHandle,
    },
    /// The handle's block was already freed and not yet reused.
    #[error("double free of slab handle {handle}")]
    DoubleFree {
        /// The rejected handle.
        handle: SlabHandle,
    },
    /// The arena cannot grow past its configured maximum.
    #[error("slab capacity exceeded: requested {requested} words, capacity {capacity} words")]
    CapacityExceeded {
        /// Arena size in words the allocation would have needed.
        requested: usize,
        /// Configured maximum arena size in words.
        capacity: usize,
    },
    /// A [`SlabConfig`](crate::SlabConfig) failed validation.
    #[error("invalid slab config: {reason}")]
    InvalidConfig {
        /// What was wrong with the config.
        reason: String,
    },
    /// A block's payload could not be viewed as the element type.
    #[error(transparent)]
    Layout(#[from] ViewError),
}
