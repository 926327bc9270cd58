//! Depth-first branch-and-bound.
//!
//! Binary branching: the left branch posts `x = v` in a new level, the
//! right branch posts `x ≠ v` in the parent's level once the left subtree
//! is exhausted. After every solution the objective is capped strictly
//! below it and the cap is re-applied at each node.
//!
//! With restarts enabled, a run stops after a geometric number of failures;
//! every right branch on the current path is then recorded as a nogood
//! (the left decisions above it plus its own value) and search resumes
//! from the root.
//!
//! Logging levels:
//! - **INFO**: restarts
//! - **DEBUG**: progress once per second
//! - **TRACE**: every decision

mod selector;

use std::time::{Duration, Instant};

use crossforge_config::RestartConfig;
use crossforge_core::{CrossForgeError, Result};
use tracing::{debug, info, trace};

use crate::constraint::Nogood;
use crate::engine::{Engine, PropagationError, VarId};
use crate::model::OrderingModel;
use crate::scope::SearchScope;
use crate::termination::Termination;

pub use selector::{centered_value, BranchSelector, ValueOrder};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEnd {
    /// Every branch was refuted or explored.
    Exhausted,
    /// A termination fired first.
    Limit,
}

enum Node {
    Consistent,
    Failed,
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Left { var: VarId, value: usize },
    Right { var: VarId, value: usize },
}

/// Branch-and-bound over one model.
#[derive(Debug)]
pub struct BranchAndBound<'a, T> {
    engine: &'a mut Engine,
    model: &'a OrderingModel,
    selector: BranchSelector,
    restarts: RestartConfig,
    termination: T,
    stack: Vec<Branch>,
    cap: Option<u64>,
}

impl<'a, T: Termination> BranchAndBound<'a, T> {
    pub fn new(
        engine: &'a mut Engine,
        model: &'a OrderingModel,
        selector: BranchSelector,
        termination: T,
    ) -> Self {
        Self {
            engine,
            model,
            selector,
            restarts: RestartConfig::default(),
            termination,
            stack: Vec::new(),
            cap: None,
        }
    }

    pub fn with_restarts(mut self, restarts: RestartConfig) -> Self {
        self.restarts = restarts;
        self
    }

    /// Only solutions with objective at most `cap` are accepted.
    pub fn with_cap(mut self, cap: u64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Runs until exhaustion or termination.
    ///
    /// `on_solution` sees every improving solution before it is recorded in
    /// `scope`; an error from it aborts the search.
    pub fn run<F>(&mut self, scope: &mut SearchScope, mut on_solution: F) -> Result<SearchEnd>
    where
        F: FnMut(&Engine, &SearchScope, u64, &[usize]) -> Result<()>,
    {
        let mut restart_index = 0u32;
        let mut run_fails = 0u64;
        let mut fail_limit = self
            .restarts
            .enabled
            .then(|| self.restarts.fail_limit(restart_index));
        let mut last_progress = Instant::now();

        if !self.propagate()? {
            scope.increment_fails();
            return Ok(SearchEnd::Exhausted);
        }

        loop {
            if self.termination.is_terminated(scope) {
                return Ok(SearchEnd::Limit);
            }
            if last_progress.elapsed() >= PROGRESS_INTERVAL {
                last_progress = Instant::now();
                debug!(
                    event = "progress",
                    nodes = scope.nodes(),
                    fails = scope.fails(),
                    depth = self.stack.len(),
                    best = ?scope.best_objective(),
                );
            }

            let outcome = match self.selector.select(self.engine, scope.rng()) {
                Some((var, value)) => {
                    scope.increment_nodes();
                    trace!(event = "branch", depth = self.stack.len(), var, value);
                    self.stack.push(Branch::Left { var, value });
                    self.engine.store_mut().push_level();
                    if self.decide(|engine| engine.store_mut().instantiate(var, value))? {
                        Node::Consistent
                    } else {
                        Node::Failed
                    }
                }
                None => {
                    let (objective, permutation) = self.read_solution()?;
                    on_solution(self.engine, scope, objective, &permutation)?;
                    scope.record_solution(objective, permutation);
                    if objective == 0 {
                        return Ok(SearchEnd::Exhausted);
                    }
                    self.cap = Some(objective - 1);
                    if self.termination.is_terminated(scope) {
                        return Ok(SearchEnd::Limit);
                    }
                    Node::Solved
                }
            };
            match outcome {
                Node::Consistent => continue,
                Node::Failed => {
                    scope.increment_fails();
                    run_fails += 1;
                }
                Node::Solved => {}
            }

            // Backtrack until some right branch propagates.
            loop {
                if fail_limit.is_some_and(|limit| run_fails >= limit) {
                    restart_index += 1;
                    run_fails = 0;
                    let limit = self.restarts.fail_limit(restart_index);
                    fail_limit = Some(limit);
                    let nogoods = self.restart();
                    scope.increment_restarts();
                    info!(
                        event = "restart",
                        index = restart_index,
                        fail_limit = limit,
                        nogoods,
                        best = ?scope.best_objective(),
                    );
                    if !self.propagate()? {
                        scope.increment_fails();
                        return Ok(SearchEnd::Exhausted);
                    }
                    break;
                }

                let Some((var, value)) = self.pop_left() else {
                    return Ok(SearchEnd::Exhausted);
                };
                scope.increment_nodes();
                trace!(event = "refute", depth = self.stack.len(), var, value);
                self.stack.push(Branch::Right { var, value });
                if self.decide(|engine| engine.store_mut().remove(var, value))? {
                    break;
                }
                scope.increment_fails();
                run_fails += 1;
            }
        }
    }

    /// Applies a decision, then the cap, then propagates.
    fn decide<D>(&mut self, decision: D) -> Result<bool>
    where
        D: FnOnce(&mut Engine) -> std::result::Result<bool, PropagationError>,
    {
        match decision(self.engine) {
            Ok(_) => self.propagate(),
            Err(PropagationError::Contradiction) => {
                self.engine.discard_pending();
                Ok(false)
            }
            Err(PropagationError::Internal(message)) => Err(CrossForgeError::Internal(message)),
        }
    }

    /// Re-applies the cap and runs propagation to a fixed point.
    fn propagate(&mut self) -> Result<bool> {
        if let Some(cap) = self.cap {
            if self.engine.store_mut().update_objective_ub(cap).is_err() {
                self.engine.discard_pending();
                return Ok(false);
            }
        }
        match self.engine.fixpoint() {
            Ok(()) => Ok(true),
            Err(PropagationError::Contradiction) => Ok(false),
            Err(PropagationError::Internal(message)) => Err(CrossForgeError::Internal(message)),
        }
    }

    /// Pops right branches, then the deepest left branch and its level.
    fn pop_left(&mut self) -> Option<(VarId, usize)> {
        while let Some(branch) = self.stack.pop() {
            if let Branch::Left { var, value } = branch {
                self.engine.store_mut().pop_level();
                return Some((var, value));
            }
        }
        None
    }

    /// Turns right branches into nogoods and returns to the root.
    fn restart(&mut self) -> usize {
        let mut lefts: Vec<(VarId, usize)> = Vec::new();
        let mut nogoods = Vec::new();
        for &branch in &self.stack {
            match branch {
                Branch::Left { var, value } => lefts.push((var, value)),
                // Root-level refutations stay in the root level already.
                Branch::Right { var, value } if !lefts.is_empty() => {
                    nogoods.push(Nogood::new(
                        lefts.iter().copied().chain(std::iter::once((var, value))),
                    ));
                }
                Branch::Right { .. } => {}
            }
        }
        self.stack.clear();
        self.engine.store_mut().backtrack_to(0);
        self.engine.discard_pending();
        let count = nogoods.len();
        for nogood in nogoods {
            self.engine.post(nogood);
        }
        count
    }

    fn read_solution(&self) -> Result<(u64, Vec<usize>)> {
        let store = self.engine.store();
        let objective = self.model.extract_objective(store).ok_or_else(|| {
            CrossForgeError::Internal("cost variables unfixed at a leaf".to_string())
        })?;
        let permutation = self.model.extract_permutation(store).ok_or_else(|| {
            CrossForgeError::Internal("permutation unfixed at a leaf".to_string())
        })?;
        Ok((objective, permutation))
    }
}

#[cfg(test)]
mod tests;
