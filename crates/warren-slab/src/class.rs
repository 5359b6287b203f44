//! Power-of-two size classes.
//!
//! Class `c` holds up to `1 << c` elements. The largest class is
//! `NUM_CLASSES - 1`, matching [`MAX_ALLOCATION`](crate::MAX_ALLOCATION).

/// Number of size classes: 1, 2, 4, ..., 1024 elements.
pub const NUM_CLASSES: usize = 11;

/// Size class for a request of `n` elements, or `None` if `n` is zero or
/// larger than the largest class.
#[inline]
pub fn size_class(n: usize) -> Option<u8> {
    if n == 0 || n > class_capacity(NUM_CLASSES as u8 - 1) {
        return None;
    }
    Some(n.next_power_of_two().trailing_zeros() as u8)
}

/// Number of elements a block of class `class` can hold.
#[inline]
pub const fn class_capacity(class: u8) -> usize {
    1 << class
}

/// Payload size in 64-bit words for a class-`class` block of `T`.
///
/// At least one word, so every free block can hold its free-list link.
#[inline]
pub(crate) fn payload_words<T>(class: u8) -> usize {
    let bytes = class_capacity(class) * std::mem::size_of::<T>();
    bytes.div_ceil(8).max(1)
}
