//! CrossForge - Exact One-Sided Crossing Minimization in Rust
//!
//! Orders the free layer of a two-layer drawing so that the number of edge
//! crossings is minimal, and proves it.
//!
//! # Example
//!
//! ```rust
//! use crossforge::prelude::*;
//!
//! let graph = pace::parse_str("p ocr 2 2 2\n1 4\n2 3\n").unwrap();
//! let result = crossforge::solve(&graph, &SolverConfig::default()).unwrap();
//!
//! assert_eq!(result.solution.status, SolveStatus::Optimal);
//! assert_eq!(result.solution.objective, Some(0));
//! assert_eq!(result.solution.permutation, Some(vec![1, 0]));
//! ```

// Graph, counts and solution types
pub use crossforge_core::{
    crossing, crossing_number, pace, BipartiteGraph, CrossForgeError, CrossingMatrix,
    GraphBuilder, OcmSolution, Result, SolveStatus, UpperBound,
};

// Configuration
pub use crossforge_config::{
    ConfigError, EnvironmentMode, ModelConfig, RestartConfig, SearchConfig, SearchStrategy,
    SolverConfig, TerminationConfig,
};

// Solver
pub use crossforge_solver::{SolveResult, Solver, SolverStatistics};

#[cfg(feature = "console")]
pub use crossforge_console as console;

mod solver;
pub use solver::{solve, solve_with_bound, solve_with_channel};

/// Propagation engine, model and search for custom setups.
pub use crossforge_solver as internals;

pub mod prelude {
    pub use super::{pace, BipartiteGraph, GraphBuilder, OcmSolution, SolveStatus, UpperBound};
    pub use super::{ModelConfig, RestartConfig, SearchStrategy, SolverConfig};
    pub use super::{SolveResult, Solver};
}
