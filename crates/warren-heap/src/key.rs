//! Packed heap comparison key.

use std::fmt;

/// `F` in the high 32 bits, a tie-breaker in the low 32 bits.
///
/// Comparing two keys as integers compares `(F, tie)` lexicographically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(u64);

impl SortKey {
    /// Pack `f` and `tie`.
    #[inline]
    pub fn new(f: u32, tie: u32) -> Self {
        Self(((f as u64) << 32) | tie as u64)
    }

    /// The primary cost.
    #[inline]
    pub fn f(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The tie-breaker.
    #[inline]
    pub fn tie(self) -> u32 {
        self.0 as u32
    }

    /// The packed representation.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F={} tie={}", self.f(), self.tie())
    }
}
