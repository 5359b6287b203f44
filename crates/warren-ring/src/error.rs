//! Circular buffer error types.

/// Errors that can occur during circular buffer and pool operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// Growing would exceed the largest supported capacity.
    #[error("circular buffer capacity overflow: need {requested} slots, maximum is {max}")]
    CapacityOverflow {
        /// Number of slots that were needed.
        requested: usize,
        /// Largest supported capacity.
        max: usize,
    },
    /// A [`RingPoolConfig`](crate::RingPoolConfig) failed validation.
    #[error("invalid ring pool config: {reason}")]
    InvalidConfig {
        /// What was wrong with the config.
        reason: String,
    },
}
