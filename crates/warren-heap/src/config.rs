//! Open-set configuration.

use warren_core::{AllocatorKind, HeapSlot};

use crate::error::HeapError;

/// How entries with equal `F` are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lower heuristic first: prefer nodes believed closer to the goal.
    #[default]
    Heuristic,
    /// First in, first out among equal `F`.
    ///
    /// Each add (including a decrease-key) takes the next sequence number.
    /// When the counter runs out the queued entries are renumbered in order,
    /// so FIFO holds however many adds happen between clears.
    InsertionOrder,
}

/// Configuration for an [`OpenSet`](crate::OpenSet).
#[derive(Clone, Debug)]
pub struct HeapConfig {
    /// Number of entries reserved up front.
    pub initial_capacity: usize,
    /// Hard cap on queued entries. Must not exceed
    /// [`HeapSlot::MAX_POSITION`] + 1.
    pub max_capacity: usize,
    /// Ordering among equal `F`.
    pub tie_break: TieBreak,
    /// Arena the heap's storage is accounted against.
    pub allocator: AllocatorKind,
}

impl HeapConfig {
    /// Default up-front reservation.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 128;

    /// Default cap: 16M queued nodes.
    pub const DEFAULT_MAX_CAPACITY: usize = 1 << 24;

    /// Default config with the given tie-break rule.
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
            tie_break,
            allocator: AllocatorKind::Temp,
        }
    }

    /// Check the config for internal consistency.
    pub fn validate(&self) -> Result<(), HeapError> {
        if self.max_capacity == 0 {
            return Err(HeapError::InvalidConfig {
                reason: "max_capacity must be at least 1".into(),
            });
        }
        if self.max_capacity > HeapSlot::MAX_POSITION + 1 {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "max_capacity {} exceeds the heap slot range {}",
                    self.max_capacity,
                    HeapSlot::MAX_POSITION + 1
                ),
            });
        }
        if self.initial_capacity > self.max_capacity {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "initial_capacity {} exceeds max_capacity {}",
                    self.initial_capacity, self.max_capacity
                ),
            });
        }
        Ok(())
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new(TieBreak::default())
    }
}
