//! Pairwise crossing counts.
//!
//! `counts[i][j]` is the number of edge crossings incurred between free
//! vertices `i` and `j` when `i` is drawn left of `j`. The reduced matrix
//! extracts the unavoidable part of every pair into a single constant, so
//! that for every pair one direction costs zero.

use rayon::prelude::*;

use crate::graph::BipartiteGraph;

/// Counts pairs `(a, b)` with `a` in `left`, `b` in `right` and `a > b`.
///
/// Both slices must be sorted ascending. Runs in `O(|left| + |right|)`.
///
/// # Examples
///
/// ```
/// use crossforge_core::crossing;
///
/// assert_eq!(crossing(&[1, 2], &[1, 2]), 1);
/// assert_eq!(crossing(&[10], &[5]), 1);
/// assert_eq!(crossing(&[0, 1], &[3, 4]), 0);
/// ```
pub fn crossing(left: &[usize], right: &[usize]) -> u64 {
    let mut count = 0u64;
    let mut l = 0;
    let mut r = 0;
    while l < left.len() && r < right.len() {
        if left[l] <= right[r] {
            l += 1;
        } else {
            r += 1;
            count += (left.len() - l) as u64;
        }
    }
    count
}

/// Total number of crossings of the drawing that orders the free layer as
/// `permutation` (free vertex indices, left to right).
pub fn crossing_number(graph: &BipartiteGraph, permutation: &[usize]) -> u64 {
    let mut total = 0;
    for (a, &u) in permutation.iter().enumerate() {
        for &v in &permutation[a + 1..] {
            total += crossing(graph.neighbors(u), graph.neighbors(v));
        }
    }
    total
}

/// Full crossing matrix of a graph plus its reduced form.
///
/// Invariant: for every pair, `min(reduced(i, j), reduced(j, i)) == 0` and
/// `reduced(i, j) == count(i, j) - min(count(i, j), count(j, i))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingMatrix {
    n: usize,
    counts: Vec<u64>,
    reduced: Vec<u64>,
    constant: u64,
}

impl CrossingMatrix {
    /// Computes every pairwise count, one row per rayon task.
    pub fn new(graph: &BipartiteGraph) -> Self {
        let n = graph.free_count();
        let adjacency = graph.adjacency();
        let counts: Vec<u64> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                (0..n).map(move |j| {
                    if i == j {
                        0
                    } else {
                        crossing(&adjacency[i], &adjacency[j])
                    }
                })
            })
            .collect();
        Self::from_counts(n, counts)
    }

    /// Builds the reduced matrix from a dense row-major count matrix.
    pub fn from_counts(n: usize, counts: Vec<u64>) -> Self {
        debug_assert_eq!(counts.len(), n * n);
        let mut reduced = vec![0; n * n];
        let mut constant = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let cij = counts[i * n + j];
                let cji = counts[j * n + i];
                let shared = cij.min(cji);
                constant += shared;
                reduced[i * n + j] = cij - shared;
                reduced[j * n + i] = cji - shared;
            }
        }
        Self {
            n,
            counts,
            reduced,
            constant,
        }
    }

    /// Number of free vertices.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Crossings incurred if `i` precedes `j`.
    #[inline]
    pub fn count(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.n + j]
    }

    #[inline]
    pub fn reduced(&self, i: usize, j: usize) -> u64 {
        self.reduced[i * self.n + j]
    }

    /// Row `i` of the reduced matrix.
    pub fn reduced_row(&self, i: usize) -> &[u64] {
        &self.reduced[i * self.n..(i + 1) * self.n]
    }

    /// Sum over all pairs of the smaller direction.
    pub fn constant(&self) -> u64 {
        self.constant
    }

    /// Sum of every reduced entry; an upper bound on any reduced objective.
    pub fn reduced_total(&self) -> u64 {
        self.reduced.iter().sum()
    }

    /// Crossing number of `permutation` evaluated on the reduced matrix.
    pub fn permutation_cost(&self, permutation: &[usize]) -> u64 {
        let mut total = self.constant;
        for (a, &u) in permutation.iter().enumerate() {
            for &v in &permutation[a + 1..] {
                total += self.reduced(u, v);
            }
        }
        total
    }
}
