//! Bounds-checked, non-owning views over caller-owned memory.
//!
//! A [`View`] is a `{base, length}` pair borrowed from storage someone else
//! owns: a slab arena, a heap's entry array, a ring buffer's backing vector.
//! Views never allocate and never free. Slicing a view produces another view
//! over the same memory, and every index is checked against the length with a
//! descriptive panic rather than silently reading a neighbour's data.
//!
//! [`ViewMut`] is the exclusive counterpart. Both can be reinterpreted as a
//! different plain-old-data element type through `bytemuck`, which checks
//! size and alignment at runtime instead of relying on `unsafe` casts.

use std::fmt;
use std::ops::{Bound, Index, IndexMut, RangeBounds};

use bytemuck::Pod;

use crate::error::ViewError;

#[track_caller]
#[inline]
fn check_index(index: usize, len: usize) {
    assert!(
        index < len,
        "index {index} out of range for view of length {len}"
    );
}

#[track_caller]
fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    assert!(
        start <= end && end <= len,
        "range {start}..{end} out of range for view of length {len}"
    );
    (start, end)
}

/// A shared, bounds-checked window over `T` elements owned elsewhere.
pub struct View<'a, T> {
    data: &'a [T],
}

impl<'a, T> View<'a, T> {
    /// Wrap a borrowed slice.
    #[inline]
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// An empty view.
    #[inline]
    pub fn empty() -> Self {
        Self { data: &[] }
    }

    /// Number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.data.get(index)
    }

    /// A sub-view over `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or extends past the end of the view.
    #[track_caller]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> View<'a, T> {
        let (start, end) = resolve_range(range, self.data.len());
        View {
            data: &self.data[start..end],
        }
    }

    /// Split into `[0, mid)` and `[mid, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `mid > len`.
    #[track_caller]
    pub fn split_at(&self, mid: usize) -> (View<'a, T>, View<'a, T>) {
        assert!(
            mid <= self.data.len(),
            "split point {mid} out of range for view of length {}",
            self.data.len()
        );
        let (a, b) = self.data.split_at(mid);
        (View { data: a }, View { data: b })
    }

    /// Iterate over the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.data.iter()
    }

    /// The underlying slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<'a, T: Copy> View<'a, T> {
    /// Copy the elements into a freshly allocated `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Copy every element into `dest`, which must have the same length.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[track_caller]
    pub fn copy_to(&self, dest: &mut ViewMut<'_, T>) {
        assert_eq!(
            self.data.len(),
            dest.len(),
            "copy_to: source length {} != destination length {}",
            self.data.len(),
            dest.len()
        );
        dest.as_mut_slice().copy_from_slice(self.data);
    }
}

impl<'a, T: Pod> View<'a, T> {
    /// Reinterpret the bytes of this view as elements of type `U`.
    ///
    /// Fails if the byte length is not a multiple of `size_of::<U>()` or the
    /// base address is not aligned for `U`.
    pub fn reinterpret<U: Pod>(&self) -> Result<View<'a, U>, ViewError> {
        let bytes = std::mem::size_of_val(self.data);
        bytemuck::try_cast_slice(self.data)
            .map(View::new)
            .map_err(|e| ViewError::from_cast::<U>(e, bytes))
    }
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<T> Default for View<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Index<usize> for View<'_, T> {
    type Output = T;

    #[track_caller]
    #[inline]
    fn index(&self, index: usize) -> &T {
        check_index(index, self.data.len());
        &self.data[index]
    }
}

impl<'a, T> From<&'a [T]> for View<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T> IntoIterator for View<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: PartialEq> PartialEq<[T]> for View<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.data == other
    }
}

impl<T: fmt::Debug> fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

/// An exclusive, bounds-checked window over `T` elements owned elsewhere.
pub struct ViewMut<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> ViewMut<'a, T> {
    /// Wrap a mutably borrowed slice.
    #[inline]
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    /// Number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Mutable element at `index`, or `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// A mutable sub-view over `range`, reborrowed from this view.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or extends past the end of the view.
    #[track_caller]
    pub fn slice_mut(&mut self, range: impl RangeBounds<usize>) -> ViewMut<'_, T> {
        let (start, end) = resolve_range(range, self.data.len());
        ViewMut {
            data: &mut self.data[start..end],
        }
    }

    /// A shared view of the same memory.
    #[inline]
    pub fn as_view(&self) -> View<'_, T> {
        View { data: &*self.data }
    }

    /// Give up exclusivity, keeping the original lifetime.
    #[inline]
    pub fn into_view(self) -> View<'a, T> {
        View { data: self.data }
    }

    /// Swap the elements at `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        check_index(a, self.data.len());
        check_index(b, self.data.len());
        self.data.swap(a, b);
    }

    /// Iterate mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// The underlying slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// The underlying mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl<T: Copy> ViewMut<'_, T> {
    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Overwrite every element from `src`, which must have the same length.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[track_caller]
    pub fn copy_from(&mut self, src: &[T]) {
        assert_eq!(
            self.data.len(),
            src.len(),
            "copy_from: destination length {} != source length {}",
            self.data.len(),
            src.len()
        );
        self.data.copy_from_slice(src);
    }

    /// Move the elements in `src` so they start at `dest`, like `memmove`.
    ///
    /// # Panics
    ///
    /// Panics if either range extends past the end of the view.
    #[track_caller]
    pub fn copy_within(&mut self, src: impl RangeBounds<usize>, dest: usize) {
        let (start, end) = resolve_range(src, self.data.len());
        assert!(
            dest + (end - start) <= self.data.len(),
            "copy_within destination {dest}..{} out of range for view of length {}",
            dest + (end - start),
            self.data.len()
        );
        self.data.copy_within(start..end, dest);
    }

    /// Copy the elements into a freshly allocated `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<'a, T: Pod> ViewMut<'a, T> {
    /// Reinterpret the bytes of this view as mutable elements of type `U`.
    pub fn reinterpret_mut<U: Pod>(&mut self) -> Result<ViewMut<'_, U>, ViewError> {
        let bytes = std::mem::size_of_val(&*self.data);
        bytemuck::try_cast_slice_mut(&mut *self.data)
            .map(ViewMut::new)
            .map_err(|e| ViewError::from_cast::<U>(e, bytes))
    }

    /// Like [`ViewMut::reinterpret_mut`], but consumes the view and keeps its
    /// lifetime.
    pub fn into_reinterpreted<U: Pod>(self) -> Result<ViewMut<'a, U>, ViewError> {
        let bytes = std::mem::size_of_val(&*self.data);
        bytemuck::try_cast_slice_mut(self.data)
            .map(ViewMut::new)
            .map_err(|e| ViewError::from_cast::<U>(e, bytes))
    }
}

impl<T> Index<usize> for ViewMut<'_, T> {
    type Output = T;

    #[track_caller]
    #[inline]
    fn index(&self, index: usize) -> &T {
        check_index(index, self.data.len());
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for ViewMut<'_, T> {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        check_index(index, self.data.len());
        &mut self.data[index]
    }
}

impl<'a, T> From<&'a mut [T]> for ViewMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self::new(data)
    }
}

impl<T: fmt::Debug> fmt::Debug for ViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}
