//! Benchmark profiles and workloads for Warren.
//!
//! - [`reference_profile`]: 128x128 grid (16K cells), 64 agent searches
//! - [`stress_profile`]: 512x512 grid (~262K cells), 256 agent searches
//! - [`heap_keys`] and [`slab_sizes`]: seeded inputs for micro-benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use warren::core::NodeIndex;
use warren::slab::SlabError;
use warren_test_utils::{Adjacency, Grid};

/// A grid, its slab-backed adjacency, and the start/goal pair of each agent.
pub struct Profile {
    pub grid: Grid,
    pub adjacency: Adjacency,
    pub jobs: Vec<(NodeIndex, NodeIndex)>,
}

fn build_profile(side: u32, agents: usize, seed: u64) -> Result<Profile, SlabError> {
    let grid = Grid::random(side, side, 20, seed);
    let adjacency = Adjacency::build(&grid)?;
    let jobs = grid.random_endpoints(agents, seed.wrapping_add(1));
    Ok(Profile {
        grid,
        adjacency,
        jobs,
    })
}

/// Build the reference profile: 128x128 grid, 20% walls, 64 agents.
pub fn reference_profile(seed: u64) -> Result<Profile, SlabError> {
    build_profile(128, 64, seed)
}

/// Build the stress profile: 512x512 grid, 20% walls, 256 agents.
pub fn stress_profile(seed: u64) -> Result<Profile, SlabError> {
    build_profile(512, 256, seed)
}

/// `n` seeded `(g, h)` pairs in the cost range a 512-cell path produces.
pub fn heap_keys(n: usize, seed: u64) -> Vec<(u32, u32)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(0..5_000), rng.gen_range(0..5_000)))
        .collect()
}

/// `n` seeded allocation sizes, skewed small like per-node edge lists
/// (three quarters at most 8 elements, the rest up to 256).
pub fn slab_sizes(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            if rng.gen_range(0..4) == 0 {
                rng.gen_range(9..=256)
            } else {
                rng.gen_range(1..=8)
            }
        })
        .collect()
}
