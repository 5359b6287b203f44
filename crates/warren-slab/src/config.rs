//! Slab allocator configuration.

use warren_core::AllocatorKind;

use crate::error::SlabError;

/// Configuration for a [`SlabAllocator`](crate::SlabAllocator).
#[derive(Clone, Debug)]
pub struct SlabConfig {
    /// Arena words reserved up front.
    pub initial_words: usize,
    /// Hard cap on arena size in 64-bit words. Block offsets are `u32`, so
    /// this may not exceed `u32::MAX`.
    pub max_words: usize,
    /// Arena the slab's storage is accounted against.
    pub allocator: AllocatorKind,
}

impl SlabConfig {
    /// Default up-front reservation: 64 KiB.
    pub const DEFAULT_INITIAL_WORDS: usize = 8 * 1024;

    /// Largest arena addressable by a [`SlabHandle`](crate::SlabHandle).
    pub const MAX_WORDS: usize = u32::MAX as usize;

    /// Default config accounted against `allocator`.
    pub fn new(allocator: AllocatorKind) -> Self {
        Self {
            initial_words: Self::DEFAULT_INITIAL_WORDS,
            max_words: Self::MAX_WORDS,
            allocator,
        }
    }

    /// Check the config for internal consistency.
    pub fn validate(&self) -> Result<(), SlabError> {
        if self.max_words > Self::MAX_WORDS {
            return Err(SlabError::InvalidConfig {
                reason: format!(
                    "max_words {} exceeds the handle offset range {}",
                    self.max_words,
                    Self::MAX_WORDS
                ),
            });
        }
        if self.initial_words > self.max_words {
            return Err(SlabError::InvalidConfig {
                reason: format!(
                    "initial_words {} exceeds max_words {}",
                    self.initial_words, self.max_words
                ),
            });
        }
        Ok(())
    }
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self::new(AllocatorKind::Temp)
    }
}
