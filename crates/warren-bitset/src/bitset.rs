//! The three-level bitset.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use warren_core::{AllocatorKind, MemoryFootprint};

use crate::error::BitSetError;
use crate::iter::Iter;

const WORD_BITS: usize = 64;

/// Number of 64-bit words needed to hold `bits` bits.
#[inline]
fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

#[inline]
fn split(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1u64 << (index % WORD_BITS))
}

fn zeroed(words: usize) -> Vec<AtomicU64> {
    (0..words).map(|_| AtomicU64::new(0)).collect()
}

/// A fixed-capacity set of `u32` ids backed by three levels of atomic words.
///
/// See the [crate docs](crate) for the layout and concurrency contract.
pub struct HierarchicalBitSet {
    pub(crate) l1: Vec<AtomicU64>,
    pub(crate) l2: Vec<AtomicU64>,
    pub(crate) l3: Vec<AtomicU64>,
    kind: AllocatorKind,
}

impl HierarchicalBitSet {
    /// Largest supported length in bits: every index fits in a `u32`.
    pub const MAX_LEN: usize = u32::MAX as usize + 1;

    /// Create an empty set able to hold indices `0..len`, accounted against
    /// the persistent arena.
    ///
    /// The capacity is rounded up to a multiple of 64.
    pub fn new(len: usize) -> Result<Self, BitSetError> {
        Self::new_in(len, AllocatorKind::Persistent)
    }

    /// Like [`HierarchicalBitSet::new`], accounted against `kind`.
    pub fn new_in(len: usize, kind: AllocatorKind) -> Result<Self, BitSetError> {
        check_len(len)?;
        let l1 = words_for(len);
        let l2 = words_for(l1);
        Ok(Self {
            l1: zeroed(l1),
            l2: zeroed(l2),
            l3: zeroed(words_for(l2)),
            kind,
        })
    }

    /// Bit capacity: valid indices are `0..len()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.l1.len() * WORD_BITS
    }

    /// Set bit `index`. Returns `true` if it was previously clear.
    ///
    /// Lock-free; safe to call from many threads at once.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn set(&self, index: usize) -> bool {
        let (w, mask) = self.locate(index);
        let word = &self.l1[w];
        let mut current = word.load(Ordering::Relaxed);
        loop {
            if current & mask != 0 {
                return false;
            }
            match word.compare_exchange_weak(
                current,
                current | mask,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        if current == 0 {
            self.sync_summaries(w);
        }
        true
    }

    /// Clear bit `index`. Returns `true` if it was previously set.
    ///
    /// Lock-free; safe to call from many threads at once.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn reset(&self, index: usize) -> bool {
        let (w, mask) = self.locate(index);
        let word = &self.l1[w];
        let mut current = word.load(Ordering::Relaxed);
        loop {
            if current & mask == 0 {
                return false;
            }
            match word.compare_exchange_weak(
                current,
                current & !mask,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        if current == mask {
            self.sync_summaries(w);
        }
        true
    }

    /// Whether bit `index` is set.
    ///
    /// A relaxed read: concurrent writers may or may not be observed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    #[track_caller]
    pub fn get(&self, index: usize) -> bool {
        let (w, mask) = self.locate(index);
        self.l1[w].load(Ordering::Relaxed) & mask != 0
    }

    /// Whether bit `index` is set, or `false` if it is out of range.
    pub fn contains(&self, index: usize) -> bool {
        index < self.len() && self.get(index)
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.l3.iter().all(|w| w.load(Ordering::Relaxed) == 0)
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.l1
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// Iterate over set indices in ascending order without allocating.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Enumerate set indices in ascending order, in batches written to
    /// `scratch`.
    ///
    /// `f` is called with each filled prefix of `scratch`; every batch but
    /// the last is full.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is empty.
    #[track_caller]
    pub fn indices_batched<F>(&self, scratch: &mut [u32], mut f: F)
    where
        F: FnMut(&[u32]),
    {
        assert!(!scratch.is_empty(), "indices_batched needs a non-empty scratch buffer");
        let mut iter = self.iter();
        loop {
            let n = iter.fill(scratch);
            if n == 0 {
                break;
            }
            f(&scratch[..n]);
            if n < scratch.len() {
                break;
            }
        }
    }

    /// Append every set index to `out` in ascending order.
    pub fn collect_into(&self, out: &mut Vec<u32>) {
        out.reserve(self.count());
        out.extend(self.iter());
    }

    /// Grow the capacity to hold indices `0..new_len`, keeping every set
    /// bit. Never shrinks.
    pub fn grow(&mut self, new_len: usize) -> Result<(), BitSetError> {
        if new_len <= self.len() {
            return Ok(());
        }
        check_len(new_len)?;
        let old_len = self.len();
        let l1 = words_for(new_len);
        let l2 = words_for(l1);
        let l3 = words_for(l2);
        // Summary bits address words globally, so appending zero words keeps
        // every existing bit in place.
        self.l1.resize_with(l1, || AtomicU64::new(0));
        self.l2.resize_with(l2, || AtomicU64::new(0));
        self.l3.resize_with(l3, || AtomicU64::new(0));
        tracing::debug!(
            from = old_len,
            to = self.len(),
            kind = %self.kind,
            "bitset grew"
        );
        Ok(())
    }

    /// Clear every bit, keeping the capacity.
    pub fn clear(&mut self) {
        for word in self
            .l1
            .iter_mut()
            .chain(self.l2.iter_mut())
            .chain(self.l3.iter_mut())
        {
            *word.get_mut() = 0;
        }
    }

    /// Verify that every summary bit matches the nonzero-ness of the word it
    /// summarizes.
    ///
    /// Only meaningful while no writer is active.
    pub fn check_summaries(&self) -> Result<(), BitSetError> {
        check_level(&self.l1, &self.l2, 2)?;
        check_level(&self.l2, &self.l3, 3)
    }

    #[inline]
    #[track_caller]
    fn locate(&self, index: usize) -> (usize, u64) {
        let len = self.len();
        assert!(
            index < len,
            "bit index {index} out of range for bitset of length {len}"
        );
        split(index)
    }

    /// Bring the level-2 and level-3 summaries for level-1 word `w` in line
    /// with its current value.
    fn sync_summaries(&self, w: usize) {
        let (l2_word, l2_mask) = split(w);
        sync_bit(&self.l1[w], &self.l2[l2_word], l2_mask);
        let (l3_word, l3_mask) = split(l2_word);
        sync_bit(&self.l2[l2_word], &self.l3[l3_word], l3_mask);
    }
}

/// Make `mask` in `parent` reflect whether `child` is nonzero.
///
/// Another writer can flip `child` between our read and our write, so after
/// writing we read `child` again and redo the write until both agree. The
/// writer whose parent update lands last always performs that final check.
fn sync_bit(child: &AtomicU64, parent: &AtomicU64, mask: u64) {
    let mut nonzero = child.load(Ordering::Acquire) != 0;
    loop {
        if nonzero {
            parent.fetch_or(mask, Ordering::AcqRel);
        } else {
            parent.fetch_and(!mask, Ordering::AcqRel);
        }
        let now = child.load(Ordering::Acquire) != 0;
        if now == nonzero {
            return;
        }
        nonzero = now;
    }
}

fn check_level(child: &[AtomicU64], parent: &[AtomicU64], level: u8) -> Result<(), BitSetError> {
    for (word, value) in child.iter().enumerate() {
        let expected = value.load(Ordering::Acquire) != 0;
        let (p, mask) = split(word);
        let found = parent[p].load(Ordering::Acquire) & mask != 0;
        if found != expected {
            return Err(BitSetError::SummaryMismatch {
                level,
                word,
                found,
                expected,
            });
        }
    }
    Ok(())
}

fn check_len(len: usize) -> Result<(), BitSetError> {
    if len > HierarchicalBitSet::MAX_LEN {
        return Err(BitSetError::CapacityTooLarge {
            requested: len,
            max: HierarchicalBitSet::MAX_LEN,
        });
    }
    Ok(())
}

impl Default for HierarchicalBitSet {
    fn default() -> Self {
        Self {
            l1: Vec::new(),
            l2: Vec::new(),
            l3: Vec::new(),
            kind: AllocatorKind::Persistent,
        }
    }
}

impl MemoryFootprint for HierarchicalBitSet {
    fn memory_bytes(&self) -> usize {
        (self.l1.capacity() + self.l2.capacity() + self.l3.capacity()) * std::mem::size_of::<u64>()
    }

    fn allocator_kind(&self) -> AllocatorKind {
        self.kind
    }
}

impl fmt::Debug for HierarchicalBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchicalBitSet")
            .field("len", &self.len())
            .field("count", &self.count())
            .field("kind", &self.kind)
            .finish()
    }
}

impl<'a> IntoIterator for &'a HierarchicalBitSet {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reset_get() {
        let bits = HierarchicalBitSet::new(200).unwrap();
        assert_eq!(bits.len(), 256);
        assert!(bits.is_empty());

        assert!(bits.set(5));
        assert!(!bits.set(5), "second set reports no change");
        assert!(bits.get(5));
        assert!(!bits.get(6));
        assert_eq!(bits.count(), 1);
        assert!(!bits.is_empty());

        assert!(bits.reset(5));
        assert!(!bits.reset(5));
        assert!(!bits.get(5));
        assert!(bits.is_empty());
        bits.check_summaries().unwrap();
    }

    #[test]
    fn summaries_follow_zero_transitions() {
        let bits = HierarchicalBitSet::new(64 * 64 * 3).unwrap();
        bits.set(70);
        bits.set(71);
        bits.check_summaries().unwrap();
        assert!(bits.l2[0].load(Ordering::Relaxed) & 0b10 != 0);

        bits.reset(70);
        // Word 1 is still nonzero.
        assert!(bits.l2[0].load(Ordering::Relaxed) & 0b10 != 0);
        bits.reset(71);
        assert_eq!(bits.l2[0].load(Ordering::Relaxed), 0);
        assert_eq!(bits.l3[0].load(Ordering::Relaxed), 0);

        bits.set(64 * 64 * 2 + 1);
        assert_eq!(bits.l3[0].load(Ordering::Relaxed), 0b100);
        bits.check_summaries().unwrap();
    }

    #[test]
    fn check_summaries_reports_corruption() {
        let bits = HierarchicalBitSet::new(128).unwrap();
        bits.l1[1].store(1, Ordering::Relaxed);
        assert_eq!(
            bits.check_summaries(),
            Err(BitSetError::SummaryMismatch {
                level: 2,
                word: 1,
                found: false,
                expected: true
            })
        );
    }

    #[test]
    #[should_panic(expected = "bit index 64 out of range for bitset of length 64")]
    fn out_of_range_panics() {
        let bits = HierarchicalBitSet::new(64).unwrap();
        bits.set(64);
    }

    #[test]
    fn contains_is_total() {
        let bits = HierarchicalBitSet::new(64).unwrap();
        bits.set(3);
        assert!(bits.contains(3));
        assert!(!bits.contains(1_000_000));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn enumeration_matches_membership_over_millions_of_bits() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;
        use std::collections::BTreeSet;

        const LEN: usize = (1 << 22) + 100;
        let bits = HierarchicalBitSet::new(LEN).unwrap();
        let mut model = BTreeSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0xB175);

        // Dense runs, including one crossing a level-3 word boundary.
        for i in (1_000_000..1_050_000).chain(262_100..262_200) {
            assert_eq!(bits.set(i), model.insert(i as u32));
        }
        for i in (3_000_000..3_200_000).step_by(3) {
            assert_eq!(bits.set(i), model.insert(i as u32));
        }
        // Sparse scatter over the whole range, ending in the tail word.
        for _ in 0..20_000 {
            let i = rng.gen_range(0..LEN);
            assert_eq!(bits.set(i), model.insert(i as u32));
        }
        bits.set(LEN - 1);
        model.insert((LEN - 1) as u32);
        // Punch holes, some emptying whole words.
        for i in 1_010_000..1_010_640 {
            assert_eq!(bits.reset(i), model.remove(&(i as u32)));
        }
        for _ in 0..5_000 {
            let i = rng.gen_range(0..LEN);
            assert_eq!(bits.reset(i), model.remove(&(i as u32)));
        }

        let expected: Vec<u32> = model.iter().copied().collect();
        assert_eq!(bits.count(), expected.len());
        assert_eq!(bits.iter().collect::<Vec<_>>(), expected);

        let mut batched = Vec::with_capacity(expected.len());
        let mut scratch = [0u32; 97];
        bits.indices_batched(&mut scratch, |batch| batched.extend_from_slice(batch));
        assert_eq!(batched, expected);

        let by_get: Vec<u32> = (0..bits.len())
            .filter(|&i| bits.get(i))
            .map(|i| i as u32)
            .collect();
        assert_eq!(by_get, expected);
        bits.check_summaries().unwrap();
    }

    #[test]
    fn grow_keeps_bits_and_extends_range() {
        let mut bits = HierarchicalBitSet::new(100).unwrap();
        bits.set(1);
        bits.set(99);
        bits.grow(1_000_000).unwrap();
        assert!(bits.len() >= 1_000_000);
        bits.set(999_999);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 99, 999_999]);
        bits.check_summaries().unwrap();

        let len = bits.len();
        bits.grow(10).unwrap();
        assert_eq!(bits.len(), len, "grow never shrinks");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut bits = HierarchicalBitSet::new(5000).unwrap();
        for i in (0..5000).step_by(7) {
            bits.set(i);
        }
        let len = bits.len();
        bits.clear();
        assert!(bits.is_empty());
        assert_eq!(bits.count(), 0);
        assert_eq!(bits.len(), len);
        bits.check_summaries().unwrap();
    }

    #[test]
    fn too_large_is_rejected() {
        assert!(matches!(
            HierarchicalBitSet::new(HierarchicalBitSet::MAX_LEN + 1),
            Err(BitSetError::CapacityTooLarge { .. })
        ));
        let mut bits = HierarchicalBitSet::default();
        assert_eq!(bits.len(), 0);
        assert!(bits.grow(usize::MAX).is_err());
    }

    #[test]
    fn batched_enumeration_splits_evenly() {
        let bits = HierarchicalBitSet::new(10_000).unwrap();
        let expected: Vec<u32> = (0..10_000).step_by(13).collect();
        for &i in &expected {
            bits.set(i as usize);
        }

        let mut scratch = [0u32; 32];
        let mut seen = Vec::new();
        let mut batches = Vec::new();
        bits.indices_batched(&mut scratch, |batch| {
            batches.push(batch.len());
            seen.extend_from_slice(batch);
        });
        assert_eq!(seen, expected);
        let (last, full) = batches.split_last().unwrap();
        assert!(full.iter().all(|&n| n == 32));
        assert!(*last >= 1 && *last <= 32);
    }

    #[test]
    fn batched_enumeration_of_empty_set_never_calls_back() {
        let bits = HierarchicalBitSet::new(256).unwrap();
        let mut scratch = [0u32; 4];
        bits.indices_batched(&mut scratch, |_| panic!("no batches expected"));
    }

    #[test]
    fn collect_into_appends() {
        let bits = HierarchicalBitSet::new(300).unwrap();
        bits.set(299);
        bits.set(0);
        let mut out = vec![42];
        bits.collect_into(&mut out);
        assert_eq!(out, vec![42, 0, 299]);
    }

    #[test]
    fn memory_footprint_counts_all_levels() {
        let bits = HierarchicalBitSet::new_in(64 * 64 * 64 * 2, AllocatorKind::Temp).unwrap();
        assert!(bits.memory_bytes() >= (128 * 64 + 128 + 2) * 8);
        assert_eq!(bits.allocator_kind(), AllocatorKind::Temp);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        proptest! {
            #[test]
            fn agrees_with_btreeset(ops in proptest::collection::vec((any::<bool>(), 0usize..20_000), 0..400)) {
                let bits = HierarchicalBitSet::new(20_000).unwrap();
                let mut model = BTreeSet::new();
                for (insert, i) in ops {
                    if insert {
                        prop_assert_eq!(bits.set(i), model.insert(i as u32));
                    } else {
                        prop_assert_eq!(bits.reset(i), model.remove(&(i as u32)));
                    }
                }
                prop_assert_eq!(bits.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
                prop_assert_eq!(bits.count(), model.len());
                prop_assert!(bits.check_summaries().is_ok());
            }
        }
    }
}
