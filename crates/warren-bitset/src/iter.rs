//! Ascending enumeration over a [`HierarchicalBitSet`].

use std::iter::FusedIterator;
use std::sync::atomic::Ordering;

use crate::bitset::HierarchicalBitSet;

/// Ascending iterator over the set indices of a [`HierarchicalBitSet`].
///
/// Holds one word per level and walks down only into nonzero summaries.
/// Never allocates.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    set: &'a HierarchicalBitSet,
    next_l3: usize,
    l3_word: usize,
    l3_bits: u64,
    l2_word: usize,
    l2_bits: u64,
    l1_word: usize,
    l1_bits: u64,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(set: &'a HierarchicalBitSet) -> Self {
        Self {
            set,
            next_l3: 0,
            l3_word: 0,
            l3_bits: 0,
            l2_word: 0,
            l2_bits: 0,
            l1_word: 0,
            l1_bits: 0,
        }
    }

    /// Write up to `scratch.len()` further indices into `scratch` and return
    /// how many were written. Returns 0 once the iterator is exhausted.
    pub fn fill(&mut self, scratch: &mut [u32]) -> usize {
        let mut n = 0;
        while n < scratch.len() {
            match self.next() {
                Some(index) => {
                    scratch[n] = index;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}

/// Pop the lowest set bit of `bits`, returning its position.
#[inline]
fn take_lowest(bits: &mut u64) -> usize {
    let bit = bits.trailing_zeros() as usize;
    *bits &= *bits - 1;
    bit
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.l1_bits != 0 {
                let bit = take_lowest(&mut self.l1_bits);
                return Some((self.l1_word * 64 + bit) as u32);
            }
            if self.l2_bits != 0 {
                let bit = take_lowest(&mut self.l2_bits);
                self.l1_word = self.l2_word * 64 + bit;
                self.l1_bits = self.set.l1[self.l1_word].load(Ordering::Relaxed);
                continue;
            }
            if self.l3_bits != 0 {
                let bit = take_lowest(&mut self.l3_bits);
                self.l2_word = self.l3_word * 64 + bit;
                self.l2_bits = self.set.l2[self.l2_word].load(Ordering::Relaxed);
                continue;
            }
            let word = self.set.l3.get(self.next_l3)?;
            self.l3_word = self.next_l3;
            self.l3_bits = word.load(Ordering::Relaxed);
            self.next_l3 += 1;
        }
    }
}

impl FusedIterator for Iter<'_> {}
