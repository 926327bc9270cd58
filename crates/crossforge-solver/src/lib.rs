//! CrossForge Solver Engine
//!
//! Exact one-sided crossing minimization:
//! - Partial order reduction of the free layer
//! - Finite-domain propagation engine and the ordering model built on it
//! - Assignment-based objective lower bound
//! - Median/barycenter heuristic warm start
//! - Branch-and-bound search with restarts and no-goods
//! - Termination conditions and statistics

mod bitset;

pub mod bound;
pub mod constraint;
pub mod engine;
pub mod heuristic;
pub mod model;
pub mod reduction;
pub mod scope;
pub mod search;
pub mod solver;
pub mod statistics;
pub mod termination;

pub use bound::{AssignmentLowerBound, AssignmentRowBuilder, Hungarian};
pub use engine::{Engine, PropagationError, Propagator, Store};
pub use heuristic::{barycenter_order, heuristic_upper_bound, median_order};
pub use model::OrderingModel;
pub use reduction::{reduce, PartialOrder, ReductionRules, ReductionStats};
pub use scope::SearchScope;
pub use search::{BranchAndBound, SearchEnd};
pub use solver::{solve, solve_with_channel, SolveResult, Solver};
pub use statistics::SolverStatistics;
pub use termination::{
    AndTermination, ExternalTermination, FailCountTermination, NoTermination,
    NodeCountTermination, OrTermination, SolutionCountTermination, Termination, TimeTermination,
};
