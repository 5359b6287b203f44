//! Bitset error types.

/// Errors that can occur during bitset operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BitSetError {
    /// The requested length exceeds the `u32` index space.
    #[error("bitset length {requested} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// Requested length in bits.
        requested: usize,
        /// Largest supported length in bits.
        max: usize,
    },
    /// A summary bit disagrees with the word it summarizes.
    #[error("level {level} summary for word {word} is {found}, expected {expected}")]
    SummaryMismatch {
        /// Summary level holding the wrong bit (2 or 3).
        level: u8,
        /// Index of the summarized word one level down.
        word: usize,
        /// Bit value found in the summary.
        found: bool,
        /// Bit value implied by the summarized word.
        expected: bool,
    },
}
