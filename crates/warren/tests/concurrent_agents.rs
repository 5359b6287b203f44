//! Many agents searching in parallel over shared read-only data.
//!
//! Workers own their open set, node table copy and path pool; the grid and
//! adjacency slab are shared by reference, and a shared bitset records which
//! agents have finished. Results must match a sequential run exactly.

use std::thread;

use crossbeam_channel::unbounded;
use warren::prelude::*;
use warren_test_utils::{Adjacency, Grid, SearchContext};

const AGENTS: usize = 96;
const WORKERS: usize = 4;

type Outcome = Option<(u32, Vec<NodeIndex>)>;

fn sequential(grid: &Grid, adjacency: &Adjacency, jobs: &[(NodeIndex, NodeIndex)]) -> Vec<Outcome> {
    let mut ctx = SearchContext::new(grid, TieBreak::Heuristic).unwrap();
    jobs.iter()
        .map(|&(start, goal)| {
            ctx.find_path(grid, adjacency, start, goal)
                .unwrap()
                .map(|p| (p.cost, p.nodes.to_vec()))
        })
        .collect()
}

#[test]
fn parallel_agents_match_sequential_results() {
    let grid = Grid::random(48, 48, 20, 2024);
    let adjacency = Adjacency::build(&grid).unwrap();
    let jobs = grid.random_endpoints(AGENTS, 77);
    let expected = sequential(&grid, &adjacency, &jobs);

    let finished = HierarchicalBitSet::new(AGENTS).unwrap();
    let (job_tx, job_rx) = unbounded::<usize>();
    let (result_tx, result_rx) = unbounded();
    for agent in 0..AGENTS {
        job_tx.send(agent).unwrap();
    }
    drop(job_tx);

    thread::scope(|s| {
        for _ in 0..WORKERS {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let (grid, adjacency, jobs, finished) = (&grid, &adjacency, &jobs, &finished);
            s.spawn(move || {
                let mut ctx = SearchContext::new(grid, TieBreak::Heuristic).unwrap();
                for agent in job_rx {
                    let (start, goal) = jobs[agent];
                    let result = ctx
                        .find_path(grid, adjacency, start, goal)
                        .unwrap()
                        .map(|p| {
                            let out = (p.cost, p.nodes.to_vec());
                            ctx.recycle(p);
                            out
                        });
                    assert!(finished.set(agent), "agent {agent} searched twice");
                    result_tx.send((agent, result)).unwrap();
                }
            });
        }
    });
    drop(result_tx);

    let mut actual: Vec<Option<Outcome>> = vec![None; AGENTS];
    for (agent, result) in result_rx {
        actual[agent] = Some(result);
    }
    let actual: Vec<_> = actual
        .into_iter()
        .map(|r| r.expect("every agent reports a result"))
        .collect();

    assert_eq!(actual, expected);
    assert_eq!(finished.count(), AGENTS);
    finished.check_summaries().unwrap();
}

#[test]
fn workers_share_a_dirty_set_without_locks() {
    let grid = Grid::open(64, 64);
    let dirty = HierarchicalBitSet::new(grid.len()).unwrap();

    thread::scope(|s| {
        for worker in 0..WORKERS as u32 {
            let dirty = &dirty;
            let grid = &grid;
            s.spawn(move || {
                for y in (worker..64).step_by(WORKERS) {
                    for x in 0..64 {
                        dirty.set(grid.node(x, y).index());
                    }
                    // Second half of each row is cleaned again by the same worker.
                    for x in 32..64 {
                        dirty.reset(grid.node(x, y).index());
                    }
                }
            });
        }
    });

    assert_eq!(dirty.count(), 64 * 32);
    dirty.check_summaries().unwrap();
    let mut scratch = [0u32; 50];
    let mut seen = 0;
    dirty.indices_batched(&mut scratch, |batch| {
        assert!(batch.iter().all(|&i| grid.coords(NodeIndex(i)).0 < 32));
        seen += batch.len();
    });
    assert_eq!(seen, 64 * 32);
}
