//! Block header word encoding.
//!
//! ```text
//! bit  0..16  element count
//! bit 16..20  size class
//! bit 20      allocated
//! bit 32..64  generation
//! ```

const LEN_MASK: u64 = 0xFFFF;
const CLASS_SHIFT: u32 = 16;
const CLASS_MASK: u64 = 0xF;
const ALLOCATED_BIT: u64 = 1 << 20;
const GENERATION_SHIFT: u32 = 32;

/// A decoded block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Elements in use.
    pub len: u16,
    /// Size class of the block.
    pub class: u8,
    /// Whether the block is live.
    pub allocated: bool,
    /// Generation stamped at allocation.
    pub generation: u32,
}

impl Header {
    /// Pack into an arena word.
    pub fn encode(self) -> u64 {
        let mut word = u64::from(self.len)
            | (u64::from(self.class) & CLASS_MASK) << CLASS_SHIFT
            | u64::from(self.generation) << GENERATION_SHIFT;
        if self.allocated {
            word |= ALLOCATED_BIT;
        }
        word
    }

    /// Unpack an arena word.
    pub fn decode(word: u64) -> Self {
        Self {
            len: (word & LEN_MASK) as u16,
            class: ((word >> CLASS_SHIFT) & CLASS_MASK) as u8,
            allocated: word & ALLOCATED_BIT != 0,
            generation: (word >> GENERATION_SHIFT) as u32,
        }
    }
}
