//! The circular buffer.

use std::fmt;
use std::ops::{Index, IndexMut};

use warren_core::{AllocatorKind, MemoryFootprint, View};

use crate::error::RingError;

/// Iterator over a [`CircularBuffer`] from front to back.
pub type Iter<'a, T> = std::iter::Chain<std::slice::Iter<'a, T>, std::slice::Iter<'a, T>>;

/// A growable double-ended queue with stable absolute indices.
///
/// Backed by a power-of-two `Vec<T>`. The head is a signed absolute index;
/// element `a` lives in slot `a & (capacity - 1)`. Absolute indices wrap at
/// the `i32` range, so a buffer that sees more than 2^31 pushes at one end
/// should be cleared in between.
#[derive(Clone)]
pub struct CircularBuffer<T> {
    data: Vec<T>,
    head: i32,
    len: usize,
    kind: AllocatorKind,
}

impl<T: Copy + Default> CircularBuffer<T> {
    /// Capacity of the first allocation made by a push into an empty buffer.
    pub const MIN_CAPACITY: usize = 4;

    /// Largest supported capacity.
    pub const MAX_CAPACITY: usize = 1 << 30;

    /// Create an empty buffer without allocating.
    pub fn new() -> Self {
        Self::with_capacity_in(0, AllocatorKind::Temp)
    }

    /// Create an empty buffer holding at least `capacity` elements before
    /// it grows.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`Self::MAX_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, AllocatorKind::Temp)
    }

    /// Like [`CircularBuffer::with_capacity`], accounted against `kind`.
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, kind: AllocatorKind) -> Self {
        assert!(
            capacity <= Self::MAX_CAPACITY,
            "circular buffer capacity {capacity} exceeds the maximum {}",
            Self::MAX_CAPACITY
        );
        let slots = if capacity == 0 {
            0
        } else {
            capacity.next_power_of_two()
        };
        Self {
            data: vec![T::default(); slots],
            head: 0,
            len: 0,
            kind,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots; always zero or a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Absolute index of the first element.
    #[inline]
    pub fn absolute_start_index(&self) -> i32 {
        self.head
    }

    /// Absolute index one past the last element.
    #[inline]
    pub fn absolute_end_index(&self) -> i32 {
        self.abs_of(self.len)
    }

    /// Append `value` at the back. Its absolute index is the old
    /// [`absolute_end_index`](Self::absolute_end_index).
    pub fn push_end(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        let slot = self.slot(self.abs_of(self.len));
        self.data[slot] = value;
        self.len += 1;
    }

    /// Prepend `value` at the front. Its absolute index is one less than the
    /// old [`absolute_start_index`](Self::absolute_start_index).
    pub fn push_start(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.head = self.head.wrapping_sub(1);
        let slot = self.slot(self.head);
        self.data[slot] = value;
        self.len += 1;
    }

    /// Remove and return the front element.
    pub fn pop_start(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.data[self.slot(self.head)];
        self.head = self.head.wrapping_add(1);
        self.len -= 1;
        Some(value)
    }

    /// Remove and return the back element.
    pub fn pop_end(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.data[self.slot(self.abs_of(self.len))])
    }

    /// Element at absolute index `abs`.
    ///
    /// # Panics
    ///
    /// Panics if `abs` is outside
    /// `absolute_start_index()..absolute_end_index()`.
    #[track_caller]
    pub fn get_absolute(&self, abs: i32) -> T {
        let logical = self.check_absolute(abs);
        self.data[self.slot(self.abs_of(logical))]
    }

    /// Element at absolute index `abs`, or `None` if it is not in the buffer.
    pub fn try_get_absolute(&self, abs: i32) -> Option<T> {
        let logical = self.logical_of(abs)?;
        Some(self.data[self.slot(self.abs_of(logical))])
    }

    /// Element at absolute index `abs`, clamped to the first or last element
    /// when `abs` falls outside the buffer.
    ///
    /// Which side `abs` lies on is decided by its wrapping distance from the
    /// start, so clamping stays correct when the contents straddle the `i32`
    /// wrap.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn get_absolute_clamped(&self, abs: i32) -> T {
        assert!(
            self.len > 0,
            "get_absolute_clamped called on an empty circular buffer"
        );
        let offset = i64::from(abs.wrapping_sub(self.head));
        let logical = offset.clamp(0, self.len as i64 - 1) as usize;
        self.data[self.slot(self.abs_of(logical))]
    }

    /// Overwrite the element at absolute index `abs`.
    ///
    /// # Panics
    ///
    /// Panics if `abs` is outside
    /// `absolute_start_index()..absolute_end_index()`.
    #[track_caller]
    pub fn set_absolute(&mut self, abs: i32, value: T) {
        let logical = self.check_absolute(abs);
        let slot = self.slot(self.abs_of(logical));
        self.data[slot] = value;
    }

    /// Element at logical index `index` (0 is the front).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        Some(&self.data[self.slot(self.abs_of(index))])
    }

    /// Mutable element at logical index `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.slot(self.abs_of(index));
        Some(&mut self.data[slot])
    }

    /// Front element.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Back element.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Replace `remove` elements starting at logical index `start` with
    /// `items`, shifting the tail. Grows first if needed.
    ///
    /// Elements before `start` keep their absolute indices; the tail's
    /// indices move by `items.len() - remove`.
    ///
    /// # Panics
    ///
    /// Panics if `start + remove > self.len()`.
    #[track_caller]
    pub fn splice(&mut self, start: usize, remove: usize, items: &[T]) {
        self.make_room(start, remove, items.len());
        for (i, &item) in items.iter().enumerate() {
            let slot = self.slot(self.abs_of(start + i));
            self.data[slot] = item;
        }
    }

    /// [`splice`](Self::splice) with `start` given as an absolute index.
    ///
    /// # Panics
    ///
    /// Panics if `abs_start` is outside
    /// `absolute_start_index()..=absolute_end_index()` or the removed range
    /// runs past the end.
    #[track_caller]
    pub fn splice_absolute(&mut self, abs_start: i32, remove: usize, items: &[T]) {
        let logical = abs_start.wrapping_sub(self.head) as u32 as usize;
        assert!(
            logical <= self.len,
            "absolute index {abs_start} out of range {}..={}",
            self.head,
            self.absolute_end_index()
        );
        self.splice(logical, remove, items);
    }

    /// Like [`splice`](Self::splice), but inserts `insert` default values for
    /// the caller to fill in place.
    #[track_caller]
    pub fn splice_default(&mut self, start: usize, remove: usize, insert: usize) {
        self.make_room(start, remove, insert);
        for i in start..start + insert {
            let slot = self.slot(self.abs_of(i));
            self.data[slot] = T::default();
        }
    }

    /// Append every element of `items` at the back.
    pub fn extend_end(&mut self, items: &[T]) {
        self.reserve(items.len());
        for &item in items {
            self.push_end(item);
        }
    }

    /// Double the capacity, keeping every element at its absolute index.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity would exceed [`Self::MAX_CAPACITY`].
    #[track_caller]
    pub fn grow(&mut self) {
        if let Err(err) = self.try_grow() {
            panic!("{err}");
        }
    }

    /// Fallible [`grow`](Self::grow).
    pub fn try_grow(&mut self) -> Result<(), RingError> {
        let old = self.capacity();
        let new = if old == 0 { Self::MIN_CAPACITY } else { old * 2 };
        if new > Self::MAX_CAPACITY {
            return Err(RingError::CapacityOverflow {
                requested: new,
                max: Self::MAX_CAPACITY,
            });
        }
        let mut data = vec![T::default(); new];
        let mask = new - 1;
        for i in 0..self.len {
            let abs = self.abs_of(i);
            data[abs as u32 as usize & mask] = self.data[self.slot(abs)];
        }
        self.data = data;
        tracing::trace!(from = old, to = new, kind = %self.kind, "circular buffer grew");
        Ok(())
    }

    /// Grow until at least `additional` more elements fit.
    #[track_caller]
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        while needed > self.capacity() {
            self.grow();
        }
    }

    /// Remove every element and reset the start index to 0, keeping the
    /// capacity.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// The contents as two contiguous views, front part first.
    pub fn as_slices(&self) -> (View<'_, T>, View<'_, T>) {
        if self.len == 0 {
            return (View::empty(), View::empty());
        }
        let first = self.slot(self.head);
        let cap = self.capacity();
        if first + self.len <= cap {
            (View::new(&self.data[first..first + self.len]), View::empty())
        } else {
            let wrapped = self.len - (cap - first);
            (
                View::new(&self.data[first..]),
                View::new(&self.data[..wrapped]),
            )
        }
    }

    /// Iterate from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.as_slices();
        a.iter().chain(b.iter())
    }

    /// Copy the contents, front to back, into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        let (a, b) = self.as_slices();
        let mut out = Vec::with_capacity(self.len);
        out.extend_from_slice(a.as_slice());
        out.extend_from_slice(b.as_slice());
        out
    }

    #[inline]
    fn slot(&self, abs: i32) -> usize {
        abs as u32 as usize & (self.data.len() - 1)
    }

    #[inline]
    fn abs_of(&self, logical: usize) -> i32 {
        self.head.wrapping_add(logical as i32)
    }

    #[inline]
    fn logical_of(&self, abs: i32) -> Option<usize> {
        let logical = abs.wrapping_sub(self.head) as u32 as usize;
        (logical < self.len).then_some(logical)
    }

    #[track_caller]
    fn check_absolute(&self, abs: i32) -> usize {
        match self.logical_of(abs) {
            Some(logical) => logical,
            None => panic!(
                "absolute index {abs} out of range {}..{}",
                self.head,
                self.absolute_end_index()
            ),
        }
    }

    /// Resize the run `start..start + remove` to `insert` slots, moving the
    /// tail. The new slots hold stale values.
    #[track_caller]
    fn make_room(&mut self, start: usize, remove: usize, insert: usize) {
        let len = self.len;
        assert!(
            start <= len && remove <= len - start,
            "splice range {start}..{} out of range for circular buffer of length {len}",
            start.saturating_add(remove)
        );
        let new_len = len - remove + insert;
        self.reserve(new_len - len.min(new_len));

        let tail_from = start + remove;
        let tail_to = start + insert;
        let tail_len = len - tail_from;
        if tail_to > tail_from {
            for i in (0..tail_len).rev() {
                self.move_element(tail_from + i, tail_to + i);
            }
        } else if tail_to < tail_from {
            for i in 0..tail_len {
                self.move_element(tail_from + i, tail_to + i);
            }
        }
        self.len = new_len;
    }

    #[inline]
    fn move_element(&mut self, from: usize, to: usize) {
        let value = self.data[self.slot(self.abs_of(from))];
        let slot = self.slot(self.abs_of(to));
        self.data[slot] = value;
    }
}

impl<T: Copy + Default> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> Index<usize> for CircularBuffer<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of range for circular buffer of length {}",
                self.len
            ),
        }
    }
}

impl<T: Copy + Default> IndexMut<usize> for CircularBuffer<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for circular buffer of length {len}"),
        }
    }
}

impl<T: Copy + Default> Extend<T> for CircularBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_end(item);
        }
    }
}

impl<'a, T: Copy + Default> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> MemoryFootprint for CircularBuffer<T> {
    fn memory_bytes(&self) -> usize {
        self.data.capacity() * std::mem::size_of::<T>()
    }

    fn allocator_kind(&self) -> AllocatorKind {
        self.kind
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for CircularBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
