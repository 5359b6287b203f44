//! 4-connected grid fixtures.
//!
//! Cells are numbered row-major: `NodeIndex(y * width + x)`. Entering a cell
//! costs [`STEP_COST`] plus that cell's penalty, so the Manhattan distance
//! times [`STEP_COST`] is a consistent heuristic.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use warren_core::{NodeIndex, NodeTable};

/// Base cost of one orthogonal step.
pub const STEP_COST: u32 = 10;

/// A directed edge as stored in adjacency lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Edge {
    pub to: NodeIndex,
    pub cost: u32,
}

/// A rectangular grid whose walls and penalties live in a [`NodeTable`].
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    table: NodeTable,
}

impl Grid {
    /// A grid with no walls and no penalties.
    pub fn open(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Self {
            width,
            height,
            table: NodeTable::new(width as usize * height as usize),
        }
    }

    /// A grid with roughly `wall_percent`% walls and small random penalties,
    /// fully determined by `seed`.
    pub fn random(width: u32, height: u32, wall_percent: u32, seed: u64) -> Self {
        let mut grid = Self::open(width, height);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for i in 0..grid.len() {
            let node = &mut grid.table[NodeIndex(i as u32)];
            if rng.gen_range(0..100) < wall_percent {
                node.walkable = false;
            } else if rng.gen_range(0..4) == 0 {
                node.penalty = rng.gen_range(1..=20);
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn node(&self, x: u32, y: u32) -> NodeIndex {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        NodeIndex(y * self.width + x)
    }

    pub fn coords(&self, node: NodeIndex) -> (u32, u32) {
        (node.0 % self.width, node.0 / self.width)
    }

    pub fn is_walkable(&self, node: NodeIndex) -> bool {
        self.table[node].walkable
    }

    pub fn set_wall(&mut self, x: u32, y: u32) {
        let node = self.node(x, y);
        self.table[node].walkable = false;
    }

    pub fn set_penalty(&mut self, x: u32, y: u32, penalty: u32) {
        let node = self.node(x, y);
        self.table[node].penalty = penalty;
    }

    /// The grid's node table. Clone it to give a search its own copy.
    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    /// Walkable orthogonal neighbours of `node` with their entry costs.
    pub fn neighbours(&self, node: NodeIndex) -> SmallVec<[Edge; 4]> {
        let (x, y) = self.coords(node);
        let mut out = SmallVec::new();
        let candidates = [
            (x > 0).then(|| (x - 1, y)),
            (x + 1 < self.width).then(|| (x + 1, y)),
            (y > 0).then(|| (x, y - 1)),
            (y + 1 < self.height).then(|| (x, y + 1)),
        ];
        for (nx, ny) in candidates.into_iter().flatten() {
            let to = self.node(nx, ny);
            let record = &self.table[to];
            if record.walkable {
                out.push(Edge {
                    to,
                    cost: STEP_COST + record.penalty,
                });
            }
        }
        out
    }

    /// Manhattan distance between two cells, in step-cost units.
    pub fn heuristic(&self, from: NodeIndex, to: NodeIndex) -> u32 {
        let (ax, ay) = self.coords(from);
        let (bx, by) = self.coords(to);
        (ax.abs_diff(bx) + ay.abs_diff(by)) * STEP_COST
    }

    pub fn walkable_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.table
            .iter()
            .filter(|(_, n)| n.walkable)
            .map(|(i, _)| i)
    }

    /// `count` seeded start/goal pairs drawn from walkable cells.
    ///
    /// Returns an empty list if the grid has no walkable cell.
    pub fn random_endpoints(&self, count: usize, seed: u64) -> Vec<(NodeIndex, NodeIndex)> {
        let open: Vec<NodeIndex> = self.walkable_nodes().collect();
        if open.is_empty() {
            return Vec::new();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let a = open[rng.gen_range(0..open.len())];
                let b = open[rng.gen_range(0..open.len())];
                (a, b)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_and_coords_agree() {
        let grid = Grid::open(7, 3);
        let node = grid.node(5, 2);
        assert_eq!(node, NodeIndex(19));
        assert_eq!(grid.coords(node), (5, 2));
    }

    #[test]
    fn corner_has_two_neighbours() {
        let grid = Grid::open(3, 3);
        let n = grid.neighbours(grid.node(0, 0));
        assert_eq!(n.len(), 2);
        assert!(n.iter().all(|e| e.cost == STEP_COST));
    }

    #[test]
    fn walls_are_not_neighbours_and_penalties_add_cost() {
        let mut grid = Grid::open(3, 1);
        grid.set_wall(0, 0);
        grid.set_penalty(2, 0, 5);
        let n = grid.neighbours(grid.node(1, 0));
        assert_eq!(
            n.as_slice(),
            &[Edge {
                to: NodeIndex(2),
                cost: STEP_COST + 5
            }]
        );
    }

    #[test]
    fn random_grid_is_deterministic() {
        let a = Grid::random(16, 16, 25, 42);
        let b = Grid::random(16, 16, 25, 42);
        let walls = |g: &Grid| g.walkable_nodes().collect::<Vec<_>>();
        assert_eq!(walls(&a), walls(&b));
        assert_eq!(a.random_endpoints(5, 1), b.random_endpoints(5, 1));
    }
}
