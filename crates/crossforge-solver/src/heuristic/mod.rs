//! Median and barycenter orderings.
//!
//! Both sort the free layer by a position estimate taken from the fixed
//! neighbors, then repair the result with greedy adjacent swaps. They give
//! the warm-start upper bound and the value order of the centered search
//! strategies.

use crossforge_core::{BipartiteGraph, CrossingMatrix, UpperBound};
use tracing::debug;

/// Free vertices sorted by `key`; ties keep index order.
fn sorted_by(n: usize, key: impl Fn(usize) -> f64) -> Vec<usize> {
    let keys: Vec<f64> = (0..n).map(key).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

/// Free vertices sorted by the median of their neighbors.
pub fn median_order(graph: &BipartiteGraph) -> Vec<usize> {
    sorted_by(graph.free_count(), |v| graph.median(v))
}

/// Free vertices sorted by the mean of their neighbors.
pub fn barycenter_order(graph: &BipartiteGraph) -> Vec<usize> {
    sorted_by(graph.free_count(), |v| graph.barycenter(v))
}

/// Swaps adjacent vertices while doing so removes crossings.
///
/// Every swap strictly lowers the crossing count, so this terminates.
/// Returns the number of swaps performed.
pub fn greedy_switch(matrix: &CrossingMatrix, permutation: &mut [usize]) -> usize {
    let mut swaps = 0;
    let mut improved = true;
    while improved {
        improved = false;
        for k in 1..permutation.len() {
            let (a, b) = (permutation[k - 1], permutation[k]);
            if matrix.count(b, a) < matrix.count(a, b) {
                permutation.swap(k - 1, k);
                swaps += 1;
                improved = true;
            }
        }
    }
    swaps
}

/// Slot of every vertex in `order`.
pub fn ranks(order: &[usize]) -> Vec<usize> {
    let mut rank = vec![0; order.len()];
    for (k, &v) in order.iter().enumerate() {
        rank[v] = k;
    }
    rank
}

/// Best of the switched median and barycenter orderings.
pub fn heuristic_upper_bound(graph: &BipartiteGraph, matrix: &CrossingMatrix) -> UpperBound {
    let mut best: Option<(u64, Vec<usize>)> = None;
    for mut order in [median_order(graph), barycenter_order(graph)] {
        greedy_switch(matrix, &mut order);
        let cost = matrix.permutation_cost(&order);
        match &best {
            Some((c, _)) if *c <= cost => {}
            _ => best = Some((cost, order)),
        }
    }
    let (objective, permutation) = best.unwrap_or_default();
    debug!(event = "heuristic_end", objective);
    UpperBound::with_permutation(objective, permutation)
}
