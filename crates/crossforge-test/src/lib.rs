//! Shared test fixtures for CrossForge crates.
//!
//! - [`instances`] - small graphs with known optima
//! - [`random_graph`] - seeded random bipartite graphs
//! - [`brute_force_optimum`] - exact optimum by subset dynamic programming
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! crossforge-test = { workspace = true }
//! ```

pub mod instances;

use crossforge_core::{BipartiteGraph, CrossingMatrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use instances::{reference_instances, Instance};

/// Random graph where each of the `fixed * free` edges exists with
/// probability `p`. Same seed, same graph.
pub fn random_graph(seed: u64, fixed: usize, free: usize, p: f64) -> BipartiteGraph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let adjacency = (0..free)
        .map(|_| (0..fixed).filter(|_| rng.random_bool(p)).collect())
        .collect();
    BipartiteGraph::from_adjacency(fixed, adjacency).expect("generated graph is valid")
}

/// Every free vertex adjacent to every fixed vertex.
pub fn complete_bipartite(fixed: usize, free: usize) -> BipartiteGraph {
    BipartiteGraph::from_adjacency(fixed, vec![(0..fixed).collect(); free])
        .expect("complete graph is valid")
}

/// Minimum crossing number over all orders of the free layer.
///
/// `best[S]` is the cheapest order of the vertex set `S`; its last vertex
/// `v` crosses every earlier `u` with `c(u, v)`. Exponential, keep the free
/// layer small.
pub fn brute_force_optimum(graph: &BipartiteGraph) -> u64 {
    let n = graph.free_count();
    assert!(n <= 20, "brute force limited to 20 free vertices");
    let matrix = CrossingMatrix::new(graph);

    let full = 1usize << n;
    let mut best = vec![u64::MAX; full];
    best[0] = 0;
    for set in 1..full {
        for v in (0..n).filter(|&v| set & (1 << v) != 0) {
            let rest = set & !(1 << v);
            let mut cost = best[rest];
            for u in (0..n).filter(|&u| rest & (1 << u) != 0) {
                cost += matrix.count(u, v);
            }
            best[set] = best[set].min(cost);
        }
    }
    best[full - 1]
}
