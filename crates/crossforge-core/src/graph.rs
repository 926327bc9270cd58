//! Two-layer bipartite graph with a fixed and a free layer.
//!
//! Free vertices keep their fixed-layer neighbors in a sorted list so that
//! crossing counts reduce to linear merges. A graph is immutable once built;
//! use [`GraphBuilder`] to assemble and validate one.

use crate::error::{CrossForgeError, Result};

/// Bipartite graph whose free layer is to be ordered against a fixed layer.
///
/// Indices are 0-based on both layers.
///
/// # Examples
///
/// ```
/// use crossforge_core::GraphBuilder;
///
/// let graph = GraphBuilder::new(3, 2)
///     .with_edge(2, 0)
///     .with_edge(0, 0)
///     .with_edge(1, 1)
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.free_count(), 2);
/// assert_eq!(graph.neighbors(0), &[0, 2]);
/// assert_eq!(graph.edge_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BipartiteGraph {
    fixed_count: usize,
    edge_count: usize,
    adjacency: Vec<Vec<usize>>,
}

impl BipartiteGraph {
    /// Builds a graph from per-free-vertex neighbor lists.
    ///
    /// Lists may be unsorted; duplicates and out-of-range indices are rejected.
    pub fn from_adjacency(fixed_count: usize, adjacency: Vec<Vec<usize>>) -> Result<Self> {
        let mut builder = GraphBuilder::new(fixed_count, adjacency.len());
        for (free, neighbors) in adjacency.iter().enumerate() {
            for &fixed in neighbors {
                builder.add_edge(fixed, free);
            }
        }
        builder.build()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    pub fn free_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sorted fixed-layer neighbors of free vertex `free`.
    pub fn neighbors(&self, free: usize) -> &[usize] {
        &self.adjacency[free]
    }

    pub fn degree(&self, free: usize) -> usize {
        self.adjacency[free].len()
    }

    /// All neighbor lists, indexed by free vertex.
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Median neighbor position; the mean of the two middle entries for even
    /// degree, 0 for isolated vertices.
    pub fn median(&self, free: usize) -> f64 {
        let adj = &self.adjacency[free];
        match adj.len() {
            0 => 0.0,
            d if d % 2 == 1 => adj[d / 2] as f64,
            d => (adj[d / 2 - 1] + adj[d / 2]) as f64 / 2.0,
        }
    }

    /// Mean neighbor position, 0 for isolated vertices.
    pub fn barycenter(&self, free: usize) -> f64 {
        let adj = &self.adjacency[free];
        if adj.is_empty() {
            0.0
        } else {
            adj.iter().sum::<usize>() as f64 / adj.len() as f64
        }
    }

    /// Returns true if both free vertices have identical neighbor lists.
    pub fn are_twins(&self, a: usize, b: usize) -> bool {
        self.adjacency[a] == self.adjacency[b]
    }
}

/// Incremental, validating builder for [`BipartiteGraph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    fixed_count: usize,
    free_count: usize,
    edges: Vec<(usize, usize)>,
}

impl GraphBuilder {
    pub fn new(fixed_count: usize, free_count: usize) -> Self {
        Self {
            fixed_count,
            free_count,
            edges: Vec::new(),
        }
    }

    /// Adds an edge between 0-based fixed vertex `fixed` and free vertex `free`.
    pub fn add_edge(&mut self, fixed: usize, free: usize) -> &mut Self {
        self.edges.push((fixed, free));
        self
    }

    /// Adds an edge using PACE ids: fixed ids are `1..=F`, free ids `F+1..=F+R`.
    pub fn add_pace_edge(&mut self, fixed_id: usize, free_id: usize) -> Result<&mut Self> {
        if fixed_id == 0 || fixed_id > self.fixed_count {
            return Err(CrossForgeError::ModelConstruction(format!(
                "fixed id {} outside 1..={}",
                fixed_id, self.fixed_count
            )));
        }
        if free_id <= self.fixed_count || free_id > self.fixed_count + self.free_count {
            return Err(CrossForgeError::ModelConstruction(format!(
                "free id {} outside {}..={}",
                free_id,
                self.fixed_count + 1,
                self.fixed_count + self.free_count
            )));
        }
        Ok(self.add_edge(fixed_id - 1, free_id - self.fixed_count - 1))
    }

    /// Chained form of [`add_edge`](Self::add_edge).
    pub fn with_edge(mut self, fixed: usize, free: usize) -> Self {
        self.add_edge(fixed, free);
        self
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Validates edges and produces the immutable graph.
    ///
    /// # Errors
    ///
    /// Returns [`CrossForgeError::ModelConstruction`] for dangling indices
    /// or duplicate edges.
    pub fn build(self) -> Result<BipartiteGraph> {
        let mut adjacency = vec![Vec::new(); self.free_count];
        for &(fixed, free) in &self.edges {
            if fixed >= self.fixed_count {
                return Err(CrossForgeError::ModelConstruction(format!(
                    "edge ({}, {}) references fixed vertex outside 0..{}",
                    fixed, free, self.fixed_count
                )));
            }
            if free >= self.free_count {
                return Err(CrossForgeError::ModelConstruction(format!(
                    "edge ({}, {}) references free vertex outside 0..{}",
                    fixed, free, self.free_count
                )));
            }
            adjacency[free].push(fixed);
        }

        for (free, neighbors) in adjacency.iter_mut().enumerate() {
            neighbors.sort_unstable();
            if let Some(w) = neighbors.windows(2).find(|w| w[0] == w[1]) {
                return Err(CrossForgeError::ModelConstruction(format!(
                    "duplicate edge ({}, {})",
                    w[0], free
                )));
            }
        }

        Ok(BipartiteGraph {
            fixed_count: self.fixed_count,
            edge_count: self.edges.len(),
            adjacency,
        })
    }
}

#[cfg(test)]
mod tests;
