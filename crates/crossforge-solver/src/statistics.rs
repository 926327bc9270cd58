//! Solve statistics.

use std::time::Duration;

use crate::reduction::ReductionStats;

/// Counters of a finished solve.
///
/// # Example
///
/// ```
/// use crossforge_solver::SolverStatistics;
///
/// let stats = SolverStatistics {
///     nodes: 120,
///     fails: 40,
///     ..SolverStatistics::default()
/// };
/// assert!((stats.fail_ratio() - 1.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    /// Search nodes visited, both branches counted.
    pub nodes: u64,
    /// Nodes whose propagation failed.
    pub fails: u64,
    /// Improving solutions found by search.
    pub solutions: u64,
    pub restarts: u64,
    /// Propagator executions.
    pub propagations: u64,
    /// Lower bound computations.
    pub lower_bound_calls: u64,
    /// Lower bound computations that raised the bound or failed the node.
    pub lower_bound_prunes: u64,
    pub reduction: ReductionStats,
    pub duration: Duration,
}

impl SolverStatistics {
    /// Fraction of visited nodes that failed.
    pub fn fail_ratio(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.fails as f64 / self.nodes as f64
        }
    }

    /// Nodes visited per second.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}
