//! Solve entry points that set up console output first.

use crossforge_config::SolverConfig;
use crossforge_core::{BipartiteGraph, OcmSolution, Result, UpperBound};
use crossforge_solver::SolveResult;
use tokio::sync::mpsc;

fn init_console() {
    #[cfg(feature = "console")]
    crossforge_console::init();
}

/// Solves `graph` to optimality or until a configured limit.
pub fn solve(graph: &BipartiteGraph, config: &SolverConfig) -> Result<SolveResult> {
    init_console();
    crossforge_solver::solve(graph, config, None)
}

/// Solves `graph` starting from a known solution or objective cap.
pub fn solve_with_bound(
    graph: &BipartiteGraph,
    config: &SolverConfig,
    upper_bound: UpperBound,
) -> Result<SolveResult> {
    init_console();
    crossforge_solver::solve(graph, config, Some(upper_bound))
}

/// Solves `graph`, sending every improving solution and then the final one
/// through `sender`.
pub fn solve_with_channel(
    graph: &BipartiteGraph,
    config: &SolverConfig,
    sender: mpsc::UnboundedSender<OcmSolution>,
) -> Result<SolveResult> {
    init_console();
    crossforge_solver::solve_with_channel(graph, config, None, sender)
}

#[cfg(test)]
mod tests;
