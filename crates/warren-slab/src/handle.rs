//! Slab allocation handles.

use std::fmt;

/// Handle to a slab allocation.
///
/// `offset` is the arena word index of the block header; `generation` is the
/// value stamped into that header when the block was allocated. Handles are
/// plain integers: copying one does not extend the allocation's life, and
/// the slab validates every handle it is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct SlabHandle {
    pub(crate) offset: u32,
    pub(crate) generation: u32,
}

impl SlabHandle {
    /// The zero-length allocation. Returned by `allocate(0)` without touching
    /// the arena; always valid and always empty.
    pub const EMPTY: SlabHandle = SlabHandle {
        offset: u32::MAX,
        generation: 0,
    };

    /// Arena word index of the block header.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Generation the block was allocated under.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether this is [`SlabHandle::EMPTY`].
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for SlabHandle {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for SlabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SlabHandle(empty)")
        } else {
            write!(f, "SlabHandle(off={}, gen={})", self.offset, self.generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(SlabHandle::default().is_empty());
        assert_eq!(SlabHandle::EMPTY.to_string(), "SlabHandle(empty)");
    }

    #[test]
    fn display_shows_fields() {
        let h = SlabHandle {
            offset: 12,
            generation: 3,
        };
        assert!(!h.is_empty());
        assert_eq!(h.to_string(), "SlabHandle(off=12, gen=3)");
    }
}
