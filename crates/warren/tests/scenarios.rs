//! End-to-end scenarios through the facade crate.
//!
//! Exercises each component via `warren::prelude` the way a pathfinding
//! frame uses them: a path window on a circular buffer, short-lived
//! adjacency spans on the slab, a dirty-node bitset, and an open set
//! sharing one node table with them.

use warren::prelude::*;

#[test]
fn path_window_pops_from_the_front() {
    let mut buf = CircularBuffer::new();
    for i in 0..10 {
        buf.push_end(i);
    }
    for expected in 0..5 {
        assert_eq!(buf.pop_start(), Some(expected));
    }
    assert_eq!(buf.to_vec(), vec![5, 6, 7, 8, 9]);
    assert_eq!(buf.absolute_start_index(), 5);
    assert_eq!(buf.get_absolute(7), 7);
}

#[test]
fn freed_block_reuse_keeps_exact_lengths() {
    let mut slab = SlabAllocator::<u32>::default();
    let handles: Vec<_> = [1, 3, 5, 9]
        .iter()
        .map(|&n| slab.allocate(n).unwrap())
        .collect();
    slab.free(handles[1]).unwrap();

    let two = slab.allocate(2).unwrap();
    assert_eq!(slab.get_span(two).unwrap().len(), 2);
    assert_eq!(slab.len_of(handles[0]).unwrap(), 1);
    assert_eq!(slab.len_of(handles[2]).unwrap(), 5);
    assert_eq!(slab.len_of(handles[3]).unwrap(), 9);
}

#[test]
fn stale_handles_are_errors_not_corruption() {
    let mut slab = SlabAllocator::<NodeIndex>::default();
    let a = slab.allocate_from(&[NodeIndex(1), NodeIndex(2)]).unwrap();
    slab.free(a).unwrap();
    assert!(matches!(slab.free(a), Err(SlabError::DoubleFree { .. })));

    let b = slab.allocate(2).unwrap();
    assert!(matches!(slab.get_span(a), Err(SlabError::StaleHandle { .. })));
    assert!(slab.is_live(b));
}

#[test]
fn dirty_nodes_drive_open_set_repairs() {
    let mut table = NodeTable::new(8);
    let mut open = OpenSet::default();
    for (i, h) in [(0u32, 30), (1, 20), (2, 10), (3, 40)] {
        open.add(&mut table, NodeIndex(i), 0, h).unwrap();
    }

    // A map edit changes the heuristic of two queued nodes.
    let dirty = HierarchicalBitSet::new(table.len()).unwrap();
    dirty.set(0);
    dirty.set(3);
    for i in dirty.iter() {
        open.set_h(&mut table, NodeIndex(i), 5 + i);
    }

    let order: Vec<_> = std::iter::from_fn(|| open.try_remove(&mut table))
        .map(|e| e.node.0)
        .collect();
    assert_eq!(order, vec![0, 3, 2, 1]);
    assert!(table.iter().all(|(_, n)| !n.heap_slot.is_queued()));
}

#[test]
fn footprints_report_allocator_kinds() {
    let open = OpenSet::default();
    let slab = SlabAllocator::<u64>::new(SlabConfig::new(AllocatorKind::Persistent)).unwrap();
    let bits = HierarchicalBitSet::new(4096).unwrap();
    let ring = CircularBuffer::<u32>::with_capacity_in(8, AllocatorKind::Temp);

    assert_eq!(slab.allocator_kind(), AllocatorKind::Persistent);
    assert_eq!(bits.allocator_kind(), AllocatorKind::Persistent);
    assert_eq!(ring.allocator_kind(), AllocatorKind::Temp);
    assert!(open.memory_bytes() > 0);
    assert!(bits.memory_bytes() >= 4096 / 8);
}
