//! The slab allocator.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use bytemuck::Pod;
use warren_core::{AllocatorKind, MemoryFootprint, View, ViewMut};

use crate::class::{class_capacity, payload_words, size_class, NUM_CLASSES};
use crate::config::SlabConfig;
use crate::error::SlabError;
use crate::handle::SlabHandle;
use crate::header::Header;

/// Largest number of elements a single allocation may hold.
pub const MAX_ALLOCATION: usize = 1024;

const _: () = assert!(class_capacity(NUM_CLASSES as u8 - 1) == MAX_ALLOCATION);

/// End-of-list marker for the per-class free lists.
const NO_BLOCK: u32 = u32::MAX;

/// Slab allocator for short arrays of `T`.
///
/// All blocks live in one `Vec<u64>` arena. A block is a header word
/// followed by enough payload words for its size class. Freed blocks are
/// threaded onto a per-class singly-linked list through their first payload
/// word and handed out again before the arena grows.
///
/// Which words are headers is tracked in a separate bitmap that caller data
/// can never reach, so a stale handle whose offset now falls inside another
/// block's payload is rejected no matter what that payload holds.
///
/// `T` must be non-zero-sized and at most 8-byte aligned; this is checked at
/// compile time when the allocator is constructed.
pub struct SlabAllocator<T> {
    arena: Vec<u64>,
    block_starts: Vec<u64>,
    free_heads: [u32; NUM_CLASSES],
    free_counts: [usize; NUM_CLASSES],
    live: usize,
    next_generation: u32,
    config: SlabConfig,
    _marker: PhantomData<T>,
}

impl<T: Pod> SlabAllocator<T> {
    const LAYOUT_OK: () = assert!(
        mem::size_of::<T>() > 0 && mem::align_of::<T>() <= 8,
        "slab elements must be non-zero-sized and at most 8-byte aligned"
    );

    /// Create an allocator from a validated config.
    pub fn new(config: SlabConfig) -> Result<Self, SlabError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SlabConfig) -> Self {
        let () = Self::LAYOUT_OK;
        Self {
            arena: Vec::with_capacity(config.initial_words),
            block_starts: Vec::with_capacity(config.initial_words.div_ceil(64)),
            free_heads: [NO_BLOCK; NUM_CLASSES],
            free_counts: [0; NUM_CLASSES],
            live: 0,
            next_generation: 1,
            config,
            _marker: PhantomData,
        }
    }

    /// Allocate `n` zeroed elements.
    ///
    /// `n == 0` returns [`SlabHandle::EMPTY`] without touching the arena.
    ///
    /// # Errors
    ///
    /// [`SlabError::AllocationTooLarge`] if `n > MAX_ALLOCATION`, or
    /// [`SlabError::CapacityExceeded`] if the arena is at its configured
    /// maximum and no free block of the right class exists.
    pub fn allocate(&mut self, n: usize) -> Result<SlabHandle, SlabError> {
        if n == 0 {
            return Ok(SlabHandle::EMPTY);
        }
        let class = size_class(n).ok_or(SlabError::AllocationTooLarge {
            requested: n,
            max: MAX_ALLOCATION,
        })?;

        let offset = match self.pop_free(class) {
            Some(offset) => {
                self.payload_words_mut(offset, class).fill(0);
                offset
            }
            None => self.bump(class)?,
        };

        let generation = self.next_generation();
        self.arena[offset] = Header {
            len: n as u16,
            class,
            allocated: true,
            generation,
        }
        .encode();
        self.live += 1;
        Ok(SlabHandle {
            offset: offset as u32,
            generation,
        })
    }

    /// Allocate a block holding a copy of `items`.
    pub fn allocate_from(&mut self, items: &[T]) -> Result<SlabHandle, SlabError> {
        let handle = self.allocate(items.len())?;
        self.get_span_mut(handle)?.copy_from(items);
        Ok(handle)
    }

    /// View the elements of a live allocation.
    pub fn get_span(&self, handle: SlabHandle) -> Result<View<'_, T>, SlabError> {
        if handle.is_empty() {
            return Ok(View::empty());
        }
        let header = self.live_header(handle)?;
        let offset = handle.offset as usize;
        let len_bytes = usize::from(header.len) * mem::size_of::<T>();
        let words = &self.arena[offset + 1..offset + 1 + payload_words::<T>(header.class)];
        let bytes: &[u8] = bytemuck::cast_slice(words);
        Ok(View::new(&bytes[..len_bytes]).reinterpret()?)
    }

    /// Mutably view the elements of a live allocation.
    pub fn get_span_mut(&mut self, handle: SlabHandle) -> Result<ViewMut<'_, T>, SlabError> {
        if handle.is_empty() {
            return Ok(ViewMut::new(&mut []));
        }
        let header = self.live_header(handle)?;
        let len_bytes = usize::from(header.len) * mem::size_of::<T>();
        let bytes = self.payload_bytes_mut(handle.offset as usize, header.class);
        Ok(ViewMut::new(&mut bytes[..len_bytes]).into_reinterpreted()?)
    }

    /// Number of elements in a live allocation.
    pub fn len_of(&self, handle: SlabHandle) -> Result<usize, SlabError> {
        if handle.is_empty() {
            return Ok(0);
        }
        Ok(usize::from(self.live_header(handle)?.len))
    }

    /// Whether `handle` refers to a live allocation. [`SlabHandle::EMPTY`]
    /// is always live.
    pub fn is_live(&self, handle: SlabHandle) -> bool {
        handle.is_empty() || self.live_header(handle).is_ok()
    }

    /// Return an allocation's block to its class free list.
    ///
    /// Freeing [`SlabHandle::EMPTY`] is a no-op.
    ///
    /// # Errors
    ///
    /// [`SlabError::DoubleFree`] if the block was already freed and has not
    /// been reused, [`SlabError::StaleHandle`] for any other handle that does
    /// not name a live block.
    pub fn free(&mut self, handle: SlabHandle) -> Result<(), SlabError> {
        if handle.is_empty() {
            return Ok(());
        }
        let header = self.header(handle)?;
        if !header.allocated {
            return Err(SlabError::DoubleFree { handle });
        }
        let offset = handle.offset as usize;
        let class = usize::from(header.class);
        self.arena[offset] = Header {
            allocated: false,
            ..header
        }
        .encode();
        self.arena[offset + 1] = u64::from(self.free_heads[class]);
        self.free_heads[class] = handle.offset;
        self.free_counts[class] += 1;
        self.live -= 1;
        Ok(())
    }

    /// Resize an allocation to `new_len` elements.
    ///
    /// Stays in place (same handle) when the size class does not change;
    /// otherwise allocates a new block, copies the common prefix and frees
    /// the old one. Elements past the old length are zeroed either way.
    /// `new_len == 0` frees the block and returns [`SlabHandle::EMPTY`].
    ///
    /// On error the original handle is still valid.
    pub fn realloc(&mut self, handle: SlabHandle, new_len: usize) -> Result<SlabHandle, SlabError> {
        if handle.is_empty() {
            return self.allocate(new_len);
        }
        let header = self.live_header(handle)?;
        if new_len == 0 {
            self.free(handle)?;
            return Ok(SlabHandle::EMPTY);
        }
        let class = size_class(new_len).ok_or(SlabError::AllocationTooLarge {
            requested: new_len,
            max: MAX_ALLOCATION,
        })?;

        let size = mem::size_of::<T>();
        let old_len = usize::from(header.len);
        let offset = handle.offset as usize;

        if class == header.class {
            if new_len > old_len {
                self.payload_bytes_mut(offset, class)[old_len * size..new_len * size].fill(0);
            }
            self.arena[offset] = Header {
                len: new_len as u16,
                ..header
            }
            .encode();
            return Ok(handle);
        }

        let moved = self.allocate(new_len)?;
        let keep = old_len.min(new_len) * size;
        let src = (offset + 1) * mem::size_of::<u64>();
        let dst = (moved.offset as usize + 1) * mem::size_of::<u64>();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.arena);
        bytes.copy_within(src..src + keep, dst);
        self.free(handle)?;
        Ok(moved)
    }

    /// Release every allocation at once, keeping the arena's capacity.
    ///
    /// All outstanding handles become stale.
    pub fn clear(&mut self) {
        tracing::debug!(
            live = self.live,
            capacity_words = self.arena.capacity(),
            kind = %self.config.allocator,
            "slab cleared"
        );
        self.arena.clear();
        self.block_starts.clear();
        self.free_heads = [NO_BLOCK; NUM_CLASSES];
        self.free_counts = [0; NUM_CLASSES];
        self.live = 0;
    }

    /// Number of live allocations.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of blocks on the free list of size class `class`.
    pub fn free_count(&self, class: usize) -> usize {
        self.free_counts.get(class).copied().unwrap_or(0)
    }

    /// Arena words handed out so far, live or free.
    pub fn used_words(&self) -> usize {
        self.arena.len()
    }

    /// Arena words reserved.
    pub fn capacity_words(&self) -> usize {
        self.arena.capacity()
    }

    /// The config this slab was built with.
    pub fn config(&self) -> &SlabConfig {
        &self.config
    }

    /// Decode and generation-check the header a handle points at. The block
    /// may be free.
    fn header(&self, handle: SlabHandle) -> Result<Header, SlabError> {
        let offset = handle.offset as usize;
        if !self.is_block_start(offset) {
            return Err(SlabError::StaleHandle { handle });
        }
        let header = Header::decode(self.arena[offset]);
        if header.generation != handle.generation
            || usize::from(header.class) >= NUM_CLASSES
            || usize::from(header.len) > class_capacity(header.class)
            || offset + 1 + payload_words::<T>(header.class) > self.arena.len()
        {
            return Err(SlabError::StaleHandle { handle });
        }
        Ok(header)
    }

    fn live_header(&self, handle: SlabHandle) -> Result<Header, SlabError> {
        let header = self.header(handle)?;
        if !header.allocated {
            return Err(SlabError::StaleHandle { handle });
        }
        Ok(header)
    }

    fn pop_free(&mut self, class: u8) -> Option<usize> {
        let class = usize::from(class);
        let head = self.free_heads[class];
        if head == NO_BLOCK {
            return None;
        }
        let offset = head as usize;
        self.free_heads[class] = self.arena[offset + 1] as u32;
        self.free_counts[class] -= 1;
        Some(offset)
    }

    /// Carve a fresh zeroed block off the arena tail.
    fn bump(&mut self, class: u8) -> Result<usize, SlabError> {
        let start = self.arena.len();
        let needed = start + 1 + payload_words::<T>(class);
        if needed > self.config.max_words {
            tracing::warn!(
                requested = needed,
                capacity = self.config.max_words,
                kind = %self.config.allocator,
                "slab capacity exceeded"
            );
            return Err(SlabError::CapacityExceeded {
                requested: needed,
                capacity: self.config.max_words,
            });
        }
        if needed > self.arena.capacity() {
            let target = (self.arena.capacity() * 2)
                .max(needed)
                .max(self.config.initial_words)
                .min(self.config.max_words);
            self.arena.reserve_exact(target - start);
            tracing::trace!(
                from = start,
                to = self.arena.capacity(),
                kind = %self.config.allocator,
                "slab arena grew"
            );
        }
        self.arena.resize(needed, 0);
        let (word, bit) = (start / 64, start % 64);
        if word >= self.block_starts.len() {
            self.block_starts.resize(word + 1, 0);
        }
        self.block_starts[word] |= 1 << bit;
        Ok(start)
    }

    /// Whether a block header lives at `offset`. Blocks never move or merge,
    /// so a start stays a start until `clear`.
    fn is_block_start(&self, offset: usize) -> bool {
        offset < self.arena.len()
            && self
                .block_starts
                .get(offset / 64)
                .is_some_and(|w| w & (1 << (offset % 64)) != 0)
    }

    fn next_generation(&mut self) -> u32 {
        let generation = self.next_generation;
        // Zero is reserved for SlabHandle::EMPTY.
        self.next_generation = generation.wrapping_add(1).max(1);
        generation
    }

    fn payload_words_mut(&mut self, offset: usize, class: u8) -> &mut [u64] {
        &mut self.arena[offset + 1..offset + 1 + payload_words::<T>(class)]
    }

    fn payload_bytes_mut(&mut self, offset: usize, class: u8) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.payload_words_mut(offset, class))
    }
}

impl<T: Pod> Default for SlabAllocator<T> {
    fn default() -> Self {
        Self::with_valid_config(SlabConfig::default())
    }
}

impl<T> MemoryFootprint for SlabAllocator<T> {
    fn memory_bytes(&self) -> usize {
        (self.arena.capacity() + self.block_starts.capacity()) * mem::size_of::<u64>()
    }

    fn allocator_kind(&self) -> AllocatorKind {
        self.config.allocator
    }
}

impl<T> fmt::Debug for SlabAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlabAllocator")
            .field("live", &self.live)
            .field("used_words", &self.arena.len())
            .field("capacity_words", &self.arena.capacity())
            .field("free_counts", &self.free_counts)
            .field("allocator", &self.config.allocator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(C)]
    struct Step {
        x: i16,
        y: i16,
        cost: u32,
    }

    #[test]
    fn zero_length_is_empty_and_free() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(0).unwrap();
        assert_eq!(h, SlabHandle::EMPTY);
        assert!(slab.get_span(h).unwrap().is_empty());
        assert_eq!(slab.len_of(h).unwrap(), 0);
        assert_eq!(slab.used_words(), 0);
        assert_eq!(slab.live_count(), 0);
        slab.free(h).unwrap();
    }

    #[test]
    fn allocation_is_zeroed_and_sized() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(5).unwrap();
        let span = slab.get_span(h).unwrap();
        assert_eq!(span.len(), 5);
        assert!(span.iter().all(|&v| v == 0));
    }

    #[test]
    fn writes_are_visible_through_the_handle() {
        let mut slab = SlabAllocator::<Step>::default();
        let a = slab.allocate(3).unwrap();
        let b = slab.allocate(2).unwrap();
        {
            let mut span = slab.get_span_mut(a).unwrap();
            span[0] = Step { x: 1, y: 2, cost: 3 };
            span[2] = Step { x: -1, y: -2, cost: 9 };
        }
        slab.get_span_mut(b)
            .unwrap()
            .fill(Step { x: 7, y: 7, cost: 7 });

        let span = slab.get_span(a).unwrap();
        assert_eq!(span[0], Step { x: 1, y: 2, cost: 3 });
        assert_eq!(span[1], Step::default());
        assert_eq!(span[2], Step { x: -1, y: -2, cost: 9 });
        assert!(slab.get_span(b).unwrap().iter().all(|s| s.cost == 7));
    }

    #[test]
    fn allocate_from_copies_items() {
        let mut slab = SlabAllocator::<u8>::default();
        let h = slab.allocate_from(b"warren").unwrap();
        assert_eq!(slab.get_span(h).unwrap().as_slice(), b"warren");
    }

    #[test]
    fn too_large_is_rejected() {
        let mut slab = SlabAllocator::<u16>::default();
        assert_eq!(
            slab.allocate(MAX_ALLOCATION + 1).unwrap_err(),
            SlabError::AllocationTooLarge {
                requested: MAX_ALLOCATION + 1,
                max: MAX_ALLOCATION
            }
        );
        assert!(slab.allocate(MAX_ALLOCATION).is_ok());
    }

    #[test]
    fn freed_handle_is_stale() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(4).unwrap();
        slab.free(h).unwrap();
        assert_eq!(
            slab.get_span(h).unwrap_err(),
            SlabError::StaleHandle { handle: h }
        );
        assert!(!slab.is_live(h));
    }

    #[test]
    fn double_free_is_detected() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(4).unwrap();
        slab.free(h).unwrap();
        assert_eq!(slab.free(h).unwrap_err(), SlabError::DoubleFree { handle: h });
        assert_eq!(slab.live_count(), 0);
        assert_eq!(slab.free_count(2), 1);
    }

    #[test]
    fn free_block_is_reused_with_new_generation() {
        let mut slab = SlabAllocator::<u32>::default();
        let a = slab.allocate(3).unwrap();
        slab.get_span_mut(a).unwrap().fill(0xAAAA_AAAA);
        slab.free(a).unwrap();
        let used = slab.used_words();

        let b = slab.allocate(4).unwrap();
        assert_eq!(b.offset(), a.offset(), "same class reuses the freed block");
        assert_ne!(b.generation(), a.generation());
        assert_eq!(slab.used_words(), used, "reuse must not bump the arena");
        assert!(slab.get_span(b).unwrap().iter().all(|&v| v == 0));

        assert_eq!(slab.free(a).unwrap_err(), SlabError::StaleHandle { handle: a });
        assert!(slab.is_live(b));
    }

    #[test]
    fn different_class_does_not_reuse() {
        let mut slab = SlabAllocator::<u32>::default();
        let a = slab.allocate(2).unwrap();
        slab.free(a).unwrap();
        let b = slab.allocate(8).unwrap();
        assert_ne!(b.offset(), a.offset());
        assert_eq!(slab.free_count(1), 1);
    }

    #[test]
    fn realloc_in_class_keeps_handle_and_zeroes_tail() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate_from(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
        // Shrink then grow back within class 3: dropped elements must not reappear.
        assert_eq!(slab.realloc(h, 5).unwrap(), h);
        assert_eq!(slab.realloc(h, 8).unwrap(), h);
        assert_eq!(
            slab.get_span(h).unwrap().as_slice(),
            &[1, 2, 3, 4, 5, 0, 0, 0]
        );
    }

    #[test]
    fn realloc_across_classes_moves_and_copies() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate_from(&[9, 8, 7]).unwrap();
        let moved = slab.realloc(h, 9).unwrap();
        assert_ne!(moved, h);
        assert!(!slab.is_live(h));
        let span = slab.get_span(moved).unwrap();
        assert_eq!(span.len(), 9);
        assert_eq!(&span.as_slice()[..3], &[9, 8, 7]);
        assert!(span.as_slice()[3..].iter().all(|&v| v == 0));
        assert_eq!(slab.live_count(), 1);

        let shrunk = slab.realloc(moved, 1).unwrap();
        assert_eq!(slab.get_span(shrunk).unwrap().as_slice(), &[9]);
    }

    #[test]
    fn realloc_to_zero_frees() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(4).unwrap();
        assert_eq!(slab.realloc(h, 0).unwrap(), SlabHandle::EMPTY);
        assert!(!slab.is_live(h));
        assert_eq!(slab.live_count(), 0);
    }

    #[test]
    fn realloc_of_stale_handle_fails() {
        let mut slab = SlabAllocator::<u32>::default();
        let h = slab.allocate(4).unwrap();
        slab.free(h).unwrap();
        assert!(matches!(
            slab.realloc(h, 2),
            Err(SlabError::StaleHandle { .. })
        ));
    }

    #[test]
    fn clear_invalidates_everything_and_keeps_capacity() {
        let mut slab = SlabAllocator::<u64>::default();
        let handles: Vec<_> = (1..50).map(|n| slab.allocate(n).unwrap()).collect();
        slab.free(handles[3]).unwrap();
        let capacity = slab.capacity_words();

        slab.clear();
        assert_eq!(slab.live_count(), 0);
        assert_eq!(slab.used_words(), 0);
        assert_eq!(slab.capacity_words(), capacity);
        assert!((0..NUM_CLASSES).all(|c| slab.free_count(c) == 0));

        // Offsets get reused after clear, generations do not.
        let fresh = slab.allocate(1).unwrap();
        assert_eq!(fresh.offset(), handles[0].offset());
        for h in handles {
            assert!(!slab.is_live(h));
        }
    }

    #[test]
    fn stale_handle_after_clear_ignores_header_shaped_payload() {
        let mut slab = SlabAllocator::<u64>::default();
        let _a = slab.allocate(1).unwrap();
        let b = slab.allocate(1).unwrap();
        slab.get_span_mut(b).unwrap()[0] = 777;
        assert_eq!(b.offset(), 2);
        slab.clear();

        // c's payload covers b's old header word.
        let c = slab.allocate(4).unwrap();
        assert_eq!(c.offset(), 0);
        let forged = Header {
            len: 1,
            class: 0,
            allocated: true,
            generation: b.generation(),
        }
        .encode();
        slab.get_span_mut(c).unwrap()[1] = forged;

        assert_eq!(
            slab.get_span(b).unwrap_err(),
            SlabError::StaleHandle { handle: b }
        );
        assert!(!slab.is_live(b));
        assert!(slab.free(b).is_err());
        assert!(slab.realloc(b, 2).is_err());
        assert_eq!(slab.get_span(c).unwrap().to_vec(), vec![0, forged, 0, 0]);

        // Nothing was pushed on a free list, so the next block is carved
        // past c instead of overlapping it.
        let d = slab.allocate(1).unwrap();
        assert!(d.offset() as usize >= c.offset() as usize + 5);
        assert_eq!(slab.get_span(c).unwrap()[1], forged);
    }

    #[test]
    fn arena_respects_max_words() {
        let config = SlabConfig {
            initial_words: 4,
            max_words: 6,
            ..SlabConfig::default()
        };
        let mut slab = SlabAllocator::<u64>::new(config).unwrap();
        // Class 2: header plus four payload words.
        let a = slab.allocate(4).unwrap();
        assert!(matches!(
            slab.allocate(4),
            Err(SlabError::CapacityExceeded { capacity: 6, .. })
        ));
        // A freed block of the right class still satisfies the request.
        slab.free(a).unwrap();
        assert!(slab.allocate(3).is_ok());
    }

    #[test]
    fn garbage_offset_is_stale() {
        let slab = SlabAllocator::<u32>::default();
        let bogus = SlabHandle {
            offset: 1234,
            generation: 5,
        };
        assert_eq!(
            slab.len_of(bogus).unwrap_err(),
            SlabError::StaleHandle { handle: bogus }
        );
    }

    #[test]
    fn memory_footprint_reports_arena() {
        let config = SlabConfig::new(AllocatorKind::Persistent);
        let mut slab = SlabAllocator::<u32>::new(config).unwrap();
        slab.allocate(16).unwrap();
        assert!(slab.memory_bytes() >= slab.used_words() * 8);
        assert_eq!(slab.allocator_kind(), AllocatorKind::Persistent);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Free(usize),
            Realloc(usize, usize),
            Write(usize, u32),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..70).prop_map(Op::Alloc),
                any::<usize>().prop_map(Op::Free),
                (any::<usize>(), 0usize..70).prop_map(|(i, n)| Op::Realloc(i, n)),
                (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Write(i, v)),
            ]
        }

        proptest! {
            #[test]
            fn contents_match_model(ops in proptest::collection::vec(op(), 1..120)) {
                let mut slab = SlabAllocator::<u32>::default();
                let mut live: Vec<(SlabHandle, Vec<u32>)> = Vec::new();

                for op in ops {
                    match op {
                        Op::Alloc(n) => {
                            let h = slab.allocate(n).unwrap();
                            live.push((h, vec![0; n]));
                        }
                        Op::Free(i) if !live.is_empty() => {
                            let (h, _) = live.swap_remove(i % live.len());
                            slab.free(h).unwrap();
                            if !h.is_empty() {
                                prop_assert!(!slab.is_live(h));
                            }
                        }
                        Op::Realloc(i, n) if !live.is_empty() => {
                            let idx = i % live.len();
                            let (h, model) = &mut live[idx];
                            *h = slab.realloc(*h, n).unwrap();
                            model.resize(n, 0);
                        }
                        Op::Write(i, v) if !live.is_empty() => {
                            let idx = i % live.len();
                            let (h, model) = &mut live[idx];
                            if !model.is_empty() {
                                let at = v as usize % model.len();
                                slab.get_span_mut(*h).unwrap()[at] = v;
                                model[at] = v;
                            }
                        }
                        _ => {}
                    }
                    for (h, model) in &live {
                        prop_assert_eq!(slab.get_span(*h).unwrap().as_slice(), model.as_slice());
                    }
                }
                let nonempty = live.iter().filter(|(h, _)| !h.is_empty()).count();
                prop_assert_eq!(slab.live_count(), nonempty);
            }
        }
    }
}
