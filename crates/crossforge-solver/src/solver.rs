//! Solve entry points.
//!
//! One solve runs these steps:
//!
//! 1. crossing matrix
//! 2. incumbent from the caller's bound or the heuristic
//! 3. partial order reduction
//! 4. model construction
//! 5. branch-and-bound under the configured terminations
//!
//! Logging levels:
//! - **INFO**: solve start/end, reduction summary, model size, each solution
//! - **WARN**: a warm-start objective that does not match its permutation
//! - **DEBUG**: heuristic result, search progress

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossforge_config::{EnvironmentMode, SolverConfig};
use crossforge_core::{
    crossing_number, BipartiteGraph, CrossForgeError, CrossingMatrix, OcmSolution, Result,
    SolveStatus, UpperBound,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::Engine;
use crate::heuristic::heuristic_upper_bound;
use crate::model::OrderingModel;
use crate::reduction::{reduce, ReductionRules};
use crate::scope::SearchScope;
use crate::search::{BranchAndBound, BranchSelector, SearchEnd, ValueOrder};
use crate::statistics::SolverStatistics;
use crate::termination::{
    ExternalTermination, FailCountTermination, NodeCountTermination, OrTermination,
    SolutionCountTermination, TimeTermination,
};

/// Solution of one solve plus what it cost to get there.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub solution: OcmSolution,
    pub stats: SolverStatistics,
}

type ConfiguredTermination = OrTermination<(
    Option<TimeTermination>,
    Option<SolutionCountTermination>,
    Option<NodeCountTermination>,
    Option<FailCountTermination>,
    ExternalTermination,
)>;

/// Reusable solver bound to one configuration.
///
/// # Example
///
/// ```
/// use crossforge_config::SolverConfig;
/// use crossforge_core::{BipartiteGraph, SolveStatus};
/// use crossforge_solver::Solver;
///
/// let graph = BipartiteGraph::from_adjacency(3, vec![vec![2], vec![0, 1], vec![1]]).unwrap();
/// let result = Solver::new(SolverConfig::default()).solve(&graph, None).unwrap();
///
/// assert_eq!(result.solution.status, SolveStatus::Optimal);
/// assert_eq!(result.solution.objective, Some(0));
/// ```
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    sender: Option<mpsc::UnboundedSender<OcmSolution>>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            sender: None,
        }
    }

    /// Streams every improving solution, then the final one.
    pub fn with_solution_sender(mut self, sender: mpsc::UnboundedSender<OcmSolution>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Requests early termination of the running solve.
    ///
    /// Safe to call from another thread. Returns false when nothing is
    /// solving.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Flag checked between nodes; setting it ends the solve with the
    /// incumbent.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    /// Solves `graph` to optimality or until a termination fires.
    ///
    /// # Errors
    ///
    /// [`CrossForgeError::Config`] for an invalid configuration,
    /// [`CrossForgeError::ModelConstruction`] for a warm-start permutation
    /// that is not a permutation of the free layer,
    /// [`CrossForgeError::Internal`] when an assert mode catches an
    /// inconsistent solution.
    pub fn solve(
        &self,
        graph: &BipartiteGraph,
        upper_bound: Option<UpperBound>,
    ) -> Result<SolveResult> {
        self.config
            .validate()
            .map_err(|e| CrossForgeError::Config(e.to_string()))?;

        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        let result = self.run(graph, upper_bound);
        self.solving.store(false, Ordering::SeqCst);

        if let (Ok(result), Some(sender)) = (&result, &self.sender) {
            let _ = sender.send(result.solution.clone());
        }
        result
    }

    fn run(&self, graph: &BipartiteGraph, upper_bound: Option<UpperBound>) -> Result<SolveResult> {
        let start = Instant::now();
        let config = &self.config;
        info!(
            event = "solve_start",
            free_count = graph.free_count(),
            fixed_count = graph.fixed_count(),
            edge_count = graph.edge_count(),
            strategy = %config.search.strategy,
        );

        let mut scope = SearchScope::from_seed(config.effective_seed());
        scope.start_solving();

        if graph.free_count() == 0 {
            let solution = OcmSolution::found(SolveStatus::Optimal, 0, Vec::new());
            return Ok(finish(solution, SolverStatistics::default(), start));
        }

        let matrix = CrossingMatrix::new(graph);

        let upper_bound = match upper_bound {
            Some(bound) => Some(checked_upper_bound(graph, bound)?),
            None if config.search.heuristic_warm_start => {
                Some(heuristic_upper_bound(graph, &matrix))
            }
            None => None,
        };
        let cap = match upper_bound {
            Some(UpperBound {
                objective,
                permutation: Some(permutation),
            }) => {
                scope.set_incumbent(objective, permutation);
                if objective == 0 {
                    return Ok(finish(
                        incumbent_solution(&mut scope, SolveStatus::Optimal),
                        SolverStatistics::default(),
                        start,
                    ));
                }
                Some(objective - 1)
            }
            Some(UpperBound {
                objective,
                permutation: None,
            }) => Some(objective),
            None => None,
        };

        let order = reduce(graph, &matrix, ReductionRules::from(&config.model));
        let reduction = *order.stats();
        info!(
            event = "reduction_end",
            ordered_edges = reduction.ordered_edges,
            incomparable_pairs = reduction.incomparable_pairs,
            constant = matrix.constant(),
        );

        let (model, mut engine) = OrderingModel::build(graph, &matrix, &order, &config.model);
        let selector = BranchSelector::new(
            &model,
            ValueOrder::for_strategy(config.search.strategy, graph),
        );

        let mode = config.environment_mode;
        let sender = self.sender.as_ref();
        let mut search = BranchAndBound::new(&mut engine, &model, selector, self.termination())
            .with_restarts(config.search.restarts.clone());
        if let Some(cap) = cap {
            search = search.with_cap(cap);
        }
        let end = search.run(&mut scope, |engine, scope, objective, permutation| {
            if mode.is_asserted() {
                assert_solution(graph, engine, mode, objective, permutation)?;
            }
            info!(event = "solution", objective, nodes = scope.nodes());
            if let Some(sender) = sender {
                let _ = sender.send(OcmSolution::found(
                    SolveStatus::Satisfiable,
                    objective,
                    permutation.to_vec(),
                ));
            }
            Ok(())
        })?;
        drop(search);

        let status = match (end, scope.best_objective().is_some()) {
            (SearchEnd::Exhausted, true) => SolveStatus::Optimal,
            (SearchEnd::Exhausted, false) => SolveStatus::Unsatisfiable,
            (SearchEnd::Limit, true) => SolveStatus::Satisfiable,
            (SearchEnd::Limit, false) => SolveStatus::Unknown,
        };

        let (lower_bound_calls, lower_bound_prunes) = model
            .bound_counters()
            .map_or((0, 0), |c| (c.calls(), c.prunes()));
        let stats = SolverStatistics {
            nodes: scope.nodes(),
            fails: scope.fails(),
            solutions: scope.solutions(),
            restarts: scope.restarts(),
            propagations: engine.propagation_count(),
            lower_bound_calls,
            lower_bound_prunes,
            reduction,
            duration: start.elapsed(),
        };
        Ok(finish(incumbent_solution(&mut scope, status), stats, start))
    }

    fn termination(&self) -> ConfiguredTermination {
        let limits = self.config.termination.clone().unwrap_or_default();
        OrTermination::new((
            self.config.time_limit().map(TimeTermination::new),
            limits
                .solution_count_limit
                .map(SolutionCountTermination::new),
            limits.node_count_limit.map(NodeCountTermination::new),
            limits.fail_count_limit.map(FailCountTermination::new),
            ExternalTermination::new(Arc::clone(&self.terminate_early_flag)),
        ))
    }
}

/// Solves `graph` with `config`.
///
/// With a permutation in `upper_bound`, only strictly better orderings are
/// searched and the given one is returned if none exists. With an objective
/// alone, any ordering at most that costly is accepted.
pub fn solve(
    graph: &BipartiteGraph,
    config: &SolverConfig,
    upper_bound: Option<UpperBound>,
) -> Result<SolveResult> {
    Solver::new(config.clone()).solve(graph, upper_bound)
}

/// Like [`solve`], streaming each improving solution through `sender`.
///
/// The final solution is sent last with its terminal status.
pub fn solve_with_channel(
    graph: &BipartiteGraph,
    config: &SolverConfig,
    upper_bound: Option<UpperBound>,
    sender: mpsc::UnboundedSender<OcmSolution>,
) -> Result<SolveResult> {
    Solver::new(config.clone())
        .with_solution_sender(sender)
        .solve(graph, upper_bound)
}

/// Validates a caller-supplied permutation and recounts its objective.
fn checked_upper_bound(graph: &BipartiteGraph, bound: UpperBound) -> Result<UpperBound> {
    let Some(permutation) = bound.permutation else {
        return Ok(bound);
    };
    let n = graph.free_count();
    if permutation.len() != n {
        return Err(CrossForgeError::ModelConstruction(format!(
            "warm-start permutation has {} entries, expected {}",
            permutation.len(),
            n
        )));
    }
    let mut seen = vec![false; n];
    for &v in &permutation {
        if v >= n || std::mem::replace(&mut seen[v], true) {
            return Err(CrossForgeError::ModelConstruction(format!(
                "warm-start permutation repeats or exceeds vertex {}",
                v
            )));
        }
    }

    let actual = crossing_number(graph, &permutation);
    if actual != bound.objective {
        warn!(
            event = "warm_start_mismatch",
            claimed = bound.objective,
            actual,
        );
    }
    Ok(UpperBound::with_permutation(actual, permutation))
}

fn assert_solution(
    graph: &BipartiteGraph,
    engine: &Engine,
    mode: EnvironmentMode,
    objective: u64,
    permutation: &[usize],
) -> Result<()> {
    let recount = crossing_number(graph, permutation);
    if recount != objective {
        return Err(CrossForgeError::Internal(format!(
            "solution objective {} but the permutation has {} crossings",
            objective, recount
        )));
    }
    if mode == EnvironmentMode::FullAssert {
        if let Some(name) = engine.first_unsatisfied() {
            return Err(CrossForgeError::Internal(format!(
                "propagator {} is not entailed by a solution",
                name
            )));
        }
    }
    Ok(())
}

fn incumbent_solution(scope: &mut SearchScope, status: SolveStatus) -> OcmSolution {
    match scope.take_best() {
        Some((objective, permutation)) => OcmSolution::found(status, objective, permutation),
        None => OcmSolution::empty(status),
    }
}

fn finish(solution: OcmSolution, mut stats: SolverStatistics, start: Instant) -> SolveResult {
    stats.duration = start.elapsed();
    info!(
        event = "solve_end",
        status = %solution.status,
        objective = ?solution.objective,
        nodes = stats.nodes,
        fails = stats.fails,
        duration_ms = stats.duration.as_millis() as u64,
    );
    SolveResult { solution, stats }
}

#[cfg(test)]
mod tests;
