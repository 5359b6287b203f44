//! Open-set error types.

/// Errors that can occur during open-set operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// The heap reached its configured maximum size.
    ///
    /// Heap positions are stored on every node record, so the heap cannot
    /// grow past what a slot can represent. Hitting this limit means the
    /// graph is too large for one search or the search is not terminating.
    #[error(
        "open set capacity exceeded: {capacity} nodes queued \
         (graph too large or search not terminating)"
    )]
    CapacityExceeded {
        /// The configured maximum number of queued nodes.
        capacity: usize,
    },
    /// A [`HeapConfig`](crate::HeapConfig) failed validation.
    #[error("invalid open set config: {reason}")]
    InvalidConfig {
        /// What was wrong with the config.
        reason: String,
    },
    /// The debug validator found a broken heap invariant.
    #[error("open set invariant violated at position {position}: {reason}")]
    Corrupted {
        /// Heap position where the violation was found.
        position: usize,
        /// Description of the violation.
        reason: String,
    },
}
