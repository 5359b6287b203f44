//! Brute-force shortest-path oracle.

use warren_core::NodeIndex;

use crate::grid::Grid;

/// Cost of the cheapest path from `start` to every cell, `None` where
/// unreachable.
///
/// Quadratic Dijkstra with a linear scan for the next node. Slow on
/// purpose: it shares no code with the heap under test.
pub fn dijkstra(grid: &Grid, start: NodeIndex) -> Vec<Option<u32>> {
    let mut dist = vec![None; grid.len()];
    let mut done = vec![false; grid.len()];
    if !grid.is_walkable(start) {
        return dist;
    }
    dist[start.index()] = Some(0);

    loop {
        let next = dist
            .iter()
            .enumerate()
            .filter(|&(i, d)| !done[i] && d.is_some())
            .min_by_key(|&(_, d)| *d);
        let Some((i, Some(d))) = next.map(|(i, d)| (i, *d)) else {
            break;
        };
        done[i] = true;
        for edge in grid.neighbours(NodeIndex(i as u32)) {
            let candidate = d + edge.cost;
            let slot = &mut dist[edge.to.index()];
            if slot.map_or(true, |old| candidate < old) {
                *slot = Some(candidate);
            }
        }
    }
    dist
}
