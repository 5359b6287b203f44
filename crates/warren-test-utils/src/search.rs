//! Reference A* search built on the Warren components.
//!
//! Adjacency lists live in a [`SlabAllocator`], the frontier is an
//! [`OpenSet`] keyed through the context's own [`NodeTable`], a
//! [`HierarchicalBitSet`] records which nodes the search touched so only
//! those are reset, and paths come back in pooled [`CircularBuffer`]s.

use warren_bitset::{BitSetError, HierarchicalBitSet};
use warren_core::{AllocatorKind, NodeIndex, NodeTable, View};
use warren_heap::{HeapConfig, HeapError, OpenSet, TieBreak};
use warren_ring::{CircularBuffer, RingError, RingPool, RingPoolConfig};
use warren_slab::{SlabAllocator, SlabConfig, SlabError, SlabHandle};

use crate::grid::{Edge, Grid};

/// Any failure from the components a search composes.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error(transparent)]
    Slab(#[from] SlabError),
    #[error(transparent)]
    BitSet(#[from] BitSetError),
    #[error(transparent)]
    Ring(#[from] RingError),
}

/// Per-node outgoing edges stored as slab allocations.
#[derive(Debug)]
pub struct Adjacency {
    edges: SlabAllocator<Edge>,
    lists: Vec<SlabHandle>,
}

impl Adjacency {
    pub fn build(grid: &Grid) -> Result<Self, SlabError> {
        let mut edges = SlabAllocator::new(SlabConfig::new(AllocatorKind::Persistent))?;
        let mut lists = Vec::with_capacity(grid.len());
        for i in 0..grid.len() {
            let neighbours = grid.neighbours(NodeIndex(i as u32));
            lists.push(edges.allocate_from(&neighbours)?);
        }
        Ok(Self { edges, lists })
    }

    pub fn edges(&self, node: NodeIndex) -> Result<View<'_, Edge>, SlabError> {
        self.edges.get_span(self.lists[node.index()])
    }

    /// Replace `node`'s edge list, reallocating its block if needed.
    pub fn replace(&mut self, node: NodeIndex, edges: &[Edge]) -> Result<(), SlabError> {
        let handle = self.edges.realloc(self.lists[node.index()], edges.len())?;
        self.edges.get_span_mut(handle)?.copy_from(edges);
        self.lists[node.index()] = handle;
        Ok(())
    }

    /// Rebuild the edge lists of `node` and its orthogonal neighbours from
    /// the grid, after a wall or penalty change at `node`.
    pub fn refresh_around(&mut self, grid: &Grid, node: NodeIndex) -> Result<(), SlabError> {
        let (x, y) = grid.coords(node);
        let around = [
            Some((x, y)),
            x.checked_sub(1).map(|x| (x, y)),
            (x + 1 < grid.width()).then(|| (x + 1, y)),
            y.checked_sub(1).map(|y| (x, y)),
            (y + 1 < grid.height()).then(|| (x, y + 1)),
        ];
        for (cx, cy) in around.into_iter().flatten() {
            let cell = grid.node(cx, cy);
            self.replace(cell, &grid.neighbours(cell))?;
        }
        Ok(())
    }

    pub fn slab(&self) -> &SlabAllocator<Edge> {
        &self.edges
    }
}

/// A found path, start first.
#[derive(Debug)]
pub struct Path {
    pub cost: u32,
    pub nodes: CircularBuffer<NodeIndex>,
}

/// Reusable per-agent search state.
///
/// Holds a private copy of the grid's node table taken at construction;
/// later wall changes on the grid are not seen by the table, only by the
/// adjacency lists.
#[derive(Debug)]
pub struct SearchContext {
    table: NodeTable,
    open: OpenSet,
    touched: HierarchicalBitSet,
    paths: RingPool<NodeIndex>,
}

impl SearchContext {
    pub fn new(grid: &Grid, tie_break: TieBreak) -> Result<Self, SearchError> {
        Ok(Self {
            table: grid.table().clone(),
            open: OpenSet::new(HeapConfig::new(tie_break))?,
            touched: HierarchicalBitSet::new_in(grid.len(), AllocatorKind::Temp)?,
            paths: RingPool::new(RingPoolConfig::default())?,
        })
    }

    /// Cheapest path from `start` to `goal`, or `None` if unreachable.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        adjacency: &Adjacency,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Result<Option<Path>, SearchError> {
        self.reset();
        if !self.table[start].walkable || !self.table[goal].walkable {
            return Ok(None);
        }

        let h = grid.heuristic(start, goal);
        self.table[start].g = 0;
        self.table[start].h = h;
        self.touched.set(start.index());
        self.open.add(&mut self.table, start, 0, h)?;

        while let Some(current) = self.open.try_remove(&mut self.table) {
            if current.node == goal {
                return Ok(Some(self.trace(goal, current.g)));
            }
            self.table[current.node].closed = true;

            for edge in adjacency.edges(current.node)?.iter() {
                let g = current.g + edge.cost;
                let next = &mut self.table[edge.to];
                if next.closed || !next.walkable || g >= next.g {
                    continue;
                }
                let h = grid.heuristic(edge.to, goal);
                next.g = g;
                next.h = h;
                next.parent = Some(current.node);
                self.touched.set(edge.to.index());
                self.open.add(&mut self.table, edge.to, g, h)?;
            }
        }
        Ok(None)
    }

    /// Hand a path's buffer back for reuse.
    pub fn recycle(&mut self, path: Path) {
        self.paths.give(path.nodes);
    }

    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    /// Nodes the last search wrote state to.
    pub fn touched(&self) -> &HierarchicalBitSet {
        &self.touched
    }

    pub fn pool(&self) -> &RingPool<NodeIndex> {
        &self.paths
    }

    fn trace(&mut self, goal: NodeIndex, cost: u32) -> Path {
        let mut nodes = self.paths.take();
        let mut at = Some(goal);
        while let Some(node) = at {
            nodes.push_start(node);
            at = self.table[node].parent;
        }
        Path { cost, nodes }
    }

    fn reset(&mut self) {
        self.open.clear(&mut self.table);
        for i in self.touched.iter() {
            self.table.reset_node(NodeIndex(i));
        }
        self.touched.clear();
    }
}
