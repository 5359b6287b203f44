//! Multi-agent pathfinding frame example.
//!
//! Demonstrates: build a grid profile → fan agent searches out to worker
//! threads → mark finished agents in a shared bitset → edit the map →
//! re-path only the agents whose paths crossed the edit.
//!
//! Run with `RUST_LOG=debug` to see allocator growth and reset events.

use std::thread;
use std::time::Instant;

use crossbeam_channel::unbounded;
use tracing_subscriber::EnvFilter;
use warren::prelude::*;
use warren_bench::{stress_profile, Profile};
use warren_test_utils::SearchContext;

const WORKERS: usize = 4;

/// Search every agent in `agents` on worker threads. Returns
/// `(agent, cost, path)` per agent, sorted by agent.
fn run_frame(
    profile: &Profile,
    agents: &[usize],
    finished: &HierarchicalBitSet,
) -> Vec<(usize, Option<u32>, Vec<NodeIndex>)> {
    let (job_tx, job_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();
    for &agent in agents {
        job_tx.send(agent).expect("job channel open");
    }
    drop(job_tx);

    thread::scope(|s| {
        for worker in 0..WORKERS {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                let mut ctx = SearchContext::new(&profile.grid, TieBreak::Heuristic)
                    .expect("search context");
                let mut searched = 0;
                for agent in job_rx {
                    let (start, goal) = profile.jobs[agent];
                    let found = ctx
                        .find_path(&profile.grid, &profile.adjacency, start, goal)
                        .expect("search");
                    let result = match found {
                        Some(path) => {
                            let nodes = path.nodes.to_vec();
                            let cost = path.cost;
                            ctx.recycle(path);
                            (agent, Some(cost), nodes)
                        }
                        None => (agent, None, Vec::new()),
                    };
                    finished.set(agent);
                    searched += 1;
                    result_tx.send(result).expect("result channel open");
                }
                tracing::debug!(worker, searched, "worker done");
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<_> = result_rx.into_iter().collect();
    results.sort_by_key(|r| r.0);
    results
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Warren Grid Agents Example ===\n");

    let mut profile = stress_profile(42).expect("profile");
    let agents = profile.jobs.len();
    println!(
        "Grid: {}x{} ({} cells), {} agents, {} workers",
        profile.grid.width(),
        profile.grid.height(),
        profile.grid.len(),
        agents,
        WORKERS
    );
    println!(
        "Adjacency slab: {} live blocks, {} words used\n",
        profile.adjacency.slab().live_count(),
        profile.adjacency.slab().used_words()
    );

    // --- Frame 1: every agent searches ---
    let finished = HierarchicalBitSet::new(agents).expect("bitset");
    let all: Vec<usize> = (0..agents).collect();
    let started = Instant::now();
    let results = run_frame(&profile, &all, &finished);
    let reachable = results.iter().filter(|r| r.1.is_some()).count();
    println!(
        "Frame 1: {} searches in {:?}, {} reachable, {} marked finished",
        results.len(),
        started.elapsed(),
        reachable,
        finished.count()
    );

    // --- Map edit: wall off a vertical strip ---
    let x = profile.grid.width() / 2;
    let dirty = HierarchicalBitSet::new(profile.grid.len()).expect("bitset");
    for y in (0..profile.grid.height()).step_by(2) {
        let node = profile.grid.node(x, y);
        profile.grid.set_wall(x, y);
        profile
            .adjacency
            .refresh_around(&profile.grid, node)
            .expect("refresh adjacency");
        dirty.set(node.index());
    }
    println!("\nMap edit: {} cells walled at x = {x}", dirty.count());

    // --- Frame 2: re-path only agents whose path crossed the edit ---
    let mut stale = Vec::new();
    for (agent, _, path) in &results {
        if path.iter().any(|n| dirty.contains(n.index())) {
            finished.reset(*agent);
            stale.push(*agent);
        }
    }
    let started = Instant::now();
    let repathed = run_frame(&profile, &stale, &finished);
    let longer = repathed
        .iter()
        .filter(|(agent, cost, _)| cost.is_some() && *cost > results[*agent].1)
        .count();
    println!(
        "Frame 2: {} agents re-pathed in {:?}, {} now take a longer route",
        repathed.len(),
        started.elapsed(),
        longer
    );
    println!("Finished agents: {}/{agents}", finished.count());
    finished.check_summaries().expect("summaries consistent");

    println!("\n=== Example complete ===");
}
