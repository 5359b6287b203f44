//! Allocator-selection token and memory reporting.

use std::fmt;

/// Which arena a structure's backing memory is accounted against.
///
/// Callers pass this down when creating a structure so that per-frame
/// scratch state and per-graph state can be told apart in memory reports
/// and log events. The structures themselves behave identically for both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AllocatorKind {
    /// Short-lived: reset or discarded every frame or every search.
    #[default]
    Temp,
    /// Lives as long as the owning graph.
    Persistent,
}

impl fmt::Display for AllocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temp => write!(f, "temp"),
            Self::Persistent => write!(f, "persistent"),
        }
    }
}

/// Memory accounting for arena-style structures.
pub trait MemoryFootprint {
    /// Bytes of backing storage currently reserved (not just in use).
    fn memory_bytes(&self) -> usize;

    /// The allocator this structure was created against.
    fn allocator_kind(&self) -> AllocatorKind;
}
