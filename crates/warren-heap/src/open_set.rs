//! The 4-ary open-set heap.

use std::mem;

use warren_core::{AllocatorKind, HeapSlot, HeapSlots, MemoryFootprint, NodeIndex};

use crate::config::{HeapConfig, TieBreak};
use crate::error::HeapError;
use crate::key::SortKey;

/// Branching factor. Four children per node trades a few extra comparisons
/// per level for half the depth of a binary heap.
pub const ARITY: usize = 4;

/// A node as stored in, or removed from, the open set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenEntry {
    /// The queued node.
    pub node: NodeIndex,
    /// Cost so far.
    pub g: u32,
    /// Heuristic estimate of the remaining cost.
    pub h: u32,
}

impl OpenEntry {
    /// `g + h`, saturating.
    #[inline]
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    key: SortKey,
    entry: OpenEntry,
}

/// Priority queue of search nodes ordered by `F = g + h`.
///
/// Every queued node's record in the caller's table holds its current heap
/// position. The heap keeps those positions in sync on every move and resets
/// them to [`HeapSlot::NONE`] when a node leaves, so a node can never be
/// queued twice and decrease-key never searches.
///
/// All operations take the node table explicitly; the heap never stores a
/// reference to it.
#[derive(Debug)]
pub struct OpenSet {
    slots: Vec<Slot>,
    config: HeapConfig,
    next_sequence: u32,
}

impl OpenSet {
    /// Create an open set from a validated config.
    pub fn new(config: HeapConfig) -> Result<Self, HeapError> {
        config.validate()?;
        Ok(Self {
            slots: Vec::with_capacity(config.initial_capacity),
            config,
            next_sequence: 0,
        })
    }

    /// Create an open set with default limits and the given tie-break rule.
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        let config = HeapConfig::new(tie_break);
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Number of queued nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no nodes are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of entries the heap can hold before its next growth.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The config this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Queue `node` with cost `g` and heuristic `h`.
    ///
    /// If the node is already queued its entry is updated in place
    /// (decrease-key). Raising a queued node's `F` is a caller bug and trips a
    /// debug assertion; release builds still restore heap order.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::CapacityExceeded`] if the heap is full and at its
    /// configured maximum.
    ///
    /// # Panics
    ///
    /// Panics if the node table claims `node` is queued at a position this
    /// heap does not hold it at (a table that was not reset between searches).
    pub fn add<S>(
        &mut self,
        table: &mut S,
        node: NodeIndex,
        g: u32,
        h: u32,
    ) -> Result<(), HeapError>
    where
        S: HeapSlots + ?Sized,
    {
        if let Some(pos) = table.heap_slot(node).position() {
            self.assert_holds(pos, node);
            let old = self.slots[pos].key;
            let key = self.next_key(g, h);
            debug_assert!(
                key.f() <= old.f(),
                "add raised F of queued node {node} from {} to {}",
                old.f(),
                key.f()
            );
            self.slots[pos] = Slot {
                key,
                entry: OpenEntry { node, g, h },
            };
            self.restore(table, pos, old);
            return Ok(());
        }

        let len = self.slots.len();
        if len >= self.config.max_capacity {
            tracing::warn!(
                capacity = self.config.max_capacity,
                kind = %self.config.allocator,
                "open set capacity exceeded"
            );
            return Err(HeapError::CapacityExceeded {
                capacity: self.config.max_capacity,
            });
        }
        if len == self.slots.capacity() {
            self.grow();
        }

        let key = self.next_key(g, h);
        self.slots.push(Slot {
            key,
            entry: OpenEntry { node, g, h },
        });
        self.sift_up(table, len);
        Ok(())
    }

    /// Remove and return the entry with the smallest `F`.
    ///
    /// # Panics
    ///
    /// Panics if the open set is empty. Use [`OpenSet::try_remove`] when an
    /// empty frontier is an expected outcome.
    #[track_caller]
    pub fn remove<S>(&mut self, table: &mut S) -> OpenEntry
    where
        S: HeapSlots + ?Sized,
    {
        match self.try_remove(table) {
            Some(entry) => entry,
            None => panic!("remove called on an empty open set"),
        }
    }

    /// Remove and return the entry with the smallest `F`, or `None` if empty.
    pub fn try_remove<S>(&mut self, table: &mut S) -> Option<OpenEntry>
    where
        S: HeapSlots + ?Sized,
    {
        let last = self.slots.pop()?;
        let top = if self.slots.is_empty() {
            last
        } else {
            let top = mem::replace(&mut self.slots[0], last);
            self.sift_down(table, 0);
            top
        };
        table.set_heap_slot(top.entry.node, HeapSlot::NONE);
        Some(top.entry)
    }

    /// The entry [`OpenSet::remove`] would return next.
    pub fn peek(&self) -> Option<OpenEntry> {
        self.slots.first().map(|s| s.entry)
    }

    /// The queued entry for `node`, if it is queued in this heap.
    pub fn entry<S>(&self, table: &S, node: NodeIndex) -> Option<OpenEntry>
    where
        S: HeapSlots + ?Sized,
    {
        let pos = table.heap_slot(node).position()?;
        self.slots
            .get(pos)
            .filter(|s| s.entry.node == node)
            .map(|s| s.entry)
    }

    /// Replace the heuristic of a queued node, keeping its `g`.
    ///
    /// Used when a search's goal moves: the node is re-sifted in place
    /// instead of being removed and re-added.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not queued in this heap.
    #[track_caller]
    pub fn set_h<S>(&mut self, table: &mut S, node: NodeIndex, h: u32)
    where
        S: HeapSlots + ?Sized,
    {
        let Some(pos) = table.heap_slot(node).position() else {
            panic!("set_h called for node {node}, which is not in the open set");
        };
        self.assert_holds(pos, node);
        let old = self.slots[pos].key;
        let slot = &mut self.slots[pos];
        slot.entry.h = h;
        slot.key = rekey(self.config.tie_break, old, slot.entry);
        self.restore(table, pos, old);
    }

    /// Recompute the heuristic of every queued node and re-heapify in O(n).
    ///
    /// Cheaper than calling [`OpenSet::set_h`] once per node when the whole
    /// frontier's heuristic changes at once.
    pub fn rebuild_h<S, F>(&mut self, table: &mut S, mut heuristic: F)
    where
        S: HeapSlots + ?Sized,
        F: FnMut(NodeIndex) -> u32,
    {
        let tie_break = self.config.tie_break;
        for slot in &mut self.slots {
            slot.entry.h = heuristic(slot.entry.node);
            slot.key = rekey(tie_break, slot.key, slot.entry);
        }
        let len = self.slots.len();
        if len > 1 {
            for pos in (0..=(len - 2) / ARITY).rev() {
                self.sift_down(table, pos);
            }
        }
        tracing::trace!(queued = len, "open set rebuilt after heuristic change");
    }

    /// Empty the heap, resetting every still-queued node's slot.
    ///
    /// Backing storage is kept for the next search.
    pub fn clear<S>(&mut self, table: &mut S)
    where
        S: HeapSlots + ?Sized,
    {
        for slot in &self.slots {
            table.set_heap_slot(slot.entry.node, HeapSlot::NONE);
        }
        self.slots.clear();
        self.next_sequence = 0;
    }

    /// Iterate over queued entries in heap order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = OpenEntry> + '_ {
        self.slots.iter().map(|s| s.entry)
    }

    /// Walk the whole heap checking order, key consistency, and that every
    /// queued node's recorded slot matches its position.
    #[cfg(debug_assertions)]
    pub fn validate<S>(&self, table: &S) -> Result<(), HeapError>
    where
        S: HeapSlots + ?Sized,
    {
        for (pos, slot) in self.slots.iter().enumerate() {
            if slot.key.f() != slot.entry.f() {
                return Err(HeapError::Corrupted {
                    position: pos,
                    reason: format!("key {} does not match F {}", slot.key, slot.entry.f()),
                });
            }
            if pos > 0 {
                let parent = (pos - 1) / ARITY;
                if self.slots[parent].key > slot.key {
                    return Err(HeapError::Corrupted {
                        position: pos,
                        reason: format!(
                            "parent at {parent} has key {} above child key {}",
                            self.slots[parent].key, slot.key
                        ),
                    });
                }
            }
            let recorded = table.heap_slot(slot.entry.node);
            if recorded != HeapSlot::at(pos) {
                return Err(HeapError::Corrupted {
                    position: pos,
                    reason: format!(
                        "node {} records heap slot {recorded}",
                        slot.entry.node
                    ),
                });
            }
        }
        Ok(())
    }

    fn next_key(&mut self, g: u32, h: u32) -> SortKey {
        let f = g.saturating_add(h);
        let tie = match self.config.tie_break {
            TieBreak::Heuristic => h,
            TieBreak::InsertionOrder => {
                if self.next_sequence == u32::MAX {
                    self.compact_sequences();
                }
                let seq = self.next_sequence;
                self.next_sequence += 1;
                seq
            }
        };
        SortKey::new(f, tie)
    }

    /// Renumber queued sequence numbers to `0..len`, keeping their order.
    ///
    /// The map from old to new tie is monotone and `F` is untouched, so every
    /// key comparison and therefore the heap layout stays as it was.
    fn compact_sequences(&mut self) {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_unstable_by_key(|&pos| self.slots[pos].key.tie());
        for (rank, &pos) in order.iter().enumerate() {
            let key = self.slots[pos].key;
            self.slots[pos].key = SortKey::new(key.f(), rank as u32);
        }
        self.next_sequence = order.len() as u32;
        tracing::trace!(queued = order.len(), "open set sequence numbers compacted");
    }

    fn grow(&mut self) {
        let len = self.slots.len();
        let target = (len.max(ARITY) * 2).min(self.config.max_capacity);
        self.slots.reserve_exact(target - len);
        tracing::trace!(
            from = len,
            to = self.slots.capacity(),
            kind = %self.config.allocator,
            "open set grew"
        );
    }

    #[track_caller]
    fn assert_holds(&self, pos: usize, node: NodeIndex) {
        assert!(
            self.slots.get(pos).is_some_and(|s| s.entry.node == node),
            "node {node} records heap slot {pos}, but the open set does not hold it there; \
             was the node table reset between searches?"
        );
    }

    /// Re-establish heap order after the key at `pos` changed from `old`.
    fn restore<S>(&mut self, table: &mut S, pos: usize, old: SortKey)
    where
        S: HeapSlots + ?Sized,
    {
        if self.slots[pos].key < old {
            self.sift_up(table, pos);
        } else {
            self.sift_down(table, pos);
        }
    }

    fn sift_up<S>(&mut self, table: &mut S, mut pos: usize)
    where
        S: HeapSlots + ?Sized,
    {
        let item = self.slots[pos];
        while pos > 0 {
            let parent = (pos - 1) / ARITY;
            if self.slots[parent].key <= item.key {
                break;
            }
            self.slots[pos] = self.slots[parent];
            table.set_heap_slot(self.slots[pos].entry.node, HeapSlot::at(pos));
            pos = parent;
        }
        self.slots[pos] = item;
        table.set_heap_slot(item.entry.node, HeapSlot::at(pos));
    }

    fn sift_down<S>(&mut self, table: &mut S, mut pos: usize)
    where
        S: HeapSlots + ?Sized,
    {
        let len = self.slots.len();
        let item = self.slots[pos];
        loop {
            let first = pos * ARITY + 1;
            if first >= len {
                break;
            }
            let end = (first + ARITY).min(len);
            // Ties between children go to the leftmost one.
            let mut best = first;
            for child in first + 1..end {
                if self.slots[child].key < self.slots[best].key {
                    best = child;
                }
            }
            if self.slots[best].key >= item.key {
                break;
            }
            self.slots[pos] = self.slots[best];
            table.set_heap_slot(self.slots[pos].entry.node, HeapSlot::at(pos));
            pos = best;
        }
        self.slots[pos] = item;
        table.set_heap_slot(item.entry.node, HeapSlot::at(pos));
    }
}

fn rekey(tie_break: TieBreak, old: SortKey, entry: OpenEntry) -> SortKey {
    let tie = match tie_break {
        TieBreak::Heuristic => entry.h,
        TieBreak::InsertionOrder => old.tie(),
    };
    SortKey::new(entry.f(), tie)
}

impl Default for OpenSet {
    fn default() -> Self {
        Self::with_tie_break(TieBreak::default())
    }
}

impl MemoryFootprint for OpenSet {
    fn memory_bytes(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Slot>()
    }

    fn allocator_kind(&self) -> AllocatorKind {
        self.config.allocator
    }
}
