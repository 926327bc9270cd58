//! Assignment-based lower bound on the objective.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossforge_core::CrossingMatrix;
use tracing::trace;

use super::hungarian::Hungarian;
use super::row_builder::AssignmentRowBuilder;
use crate::engine::{
    Entailment, EventMask, PropResult, PropagationError, Propagator, Priority, Store, VarId,
};

/// Call and pruning counters shared with the solver statistics.
#[derive(Debug, Default)]
pub struct BoundCounters {
    calls: AtomicU64,
    prunes: AtomicU64,
}

impl BoundCounters {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Calls that raised the objective lower bound or failed the node.
    pub fn prunes(&self) -> u64 {
        self.prunes.load(Ordering::Relaxed)
    }
}

/// Lower-bounds the objective by an assignment of vertices to positions.
///
/// Every pair's reduced cost is charged to the vertex placed first, so a
/// vertex at position `k` pays at least the `n - 1 - k` smallest entries
/// of its row among the vertices that may still follow it. Those per-cell
/// costs come from one [`AssignmentRowBuilder`] sweep over the columns;
/// the bound is the matrix constant plus a minimum-weight perfect matching
/// of the resulting cost matrix.
///
/// Cells outside a domain, or whose row ran out of candidates, cost
/// `infeasible`, which exceeds any feasible matching; a matching that uses
/// one proves the node infeasible.
#[derive(Debug)]
pub struct AssignmentLowerBound {
    positions: Vec<VarId>,
    /// `rank[i * n + j]`: rank of vertex `j` in row `i`.
    rank: Vec<usize>,
    constant: u64,
    infeasible: u64,
    rows: Vec<AssignmentRowBuilder>,
    cost: Vec<i64>,
    lb: Vec<usize>,
    ub: Vec<usize>,
    by_lb: Vec<Vec<usize>>,
    by_ub: Vec<Vec<usize>>,
    active: Vec<bool>,
    hungarian: Hungarian,
    counters: Arc<BoundCounters>,
}

impl AssignmentLowerBound {
    pub fn new(positions: Vec<VarId>, matrix: &CrossingMatrix) -> Self {
        let n = positions.len();
        debug_assert_eq!(n, matrix.len());
        let mut rank = vec![0; n * n];
        let mut rows = Vec::with_capacity(n);
        let mut order: Vec<usize> = Vec::with_capacity(n);
        for i in 0..n {
            let row = matrix.reduced_row(i);
            order.clear();
            order.extend(0..n);
            order.sort_by_key(|&j| (row[j], j));
            for (r, &j) in order.iter().enumerate() {
                rank[i * n + j] = r;
            }
            rows.push(AssignmentRowBuilder::new(
                order.iter().map(|&j| row[j]).collect(),
            ));
        }

        Self {
            positions,
            rank,
            constant: matrix.constant(),
            infeasible: matrix.reduced_total() + 1,
            rows,
            cost: vec![0; n * n],
            lb: vec![0; n],
            ub: vec![0; n],
            by_lb: vec![Vec::new(); n],
            by_ub: vec![Vec::new(); n],
            active: vec![false; n],
            hungarian: Hungarian::new(),
            counters: Arc::new(BoundCounters::default()),
        }
    }

    pub fn counters(&self) -> Arc<BoundCounters> {
        Arc::clone(&self.counters)
    }

    /// Fills the cost matrix from the current position domains.
    fn build_costs(&mut self, store: &Store) {
        let n = self.positions.len();
        for k in 0..n {
            self.by_lb[k].clear();
            self.by_ub[k].clear();
        }
        for (i, &var) in self.positions.iter().enumerate() {
            self.lb[i] = store.lb(var);
            self.ub[i] = store.ub(var);
            self.by_lb[self.lb[i]].push(i);
            self.by_ub[self.ub[i]].push(i);
            self.active[i] = false;
            self.rows[i].reset();
        }

        let infeasible = self.infeasible as i64;
        for k in 0..n {
            // Vertices that end by column k precede any row placed at k or later.
            for &j in &self.by_ub[k] {
                for i in 0..n {
                    if i != j && self.ub[i] >= k {
                        self.rows[i].remove(self.rank[i * n + j]);
                    }
                }
            }
            for &i in &self.by_lb[k] {
                self.active[i] = true;
            }
            for i in 0..n {
                self.cost[i * n + k] = if self.active[i] && store.contains(self.positions[i], k) {
                    self.rows[i].cost(self.infeasible) as i64
                } else {
                    infeasible
                };
            }
            for &i in &self.by_ub[k] {
                self.active[i] = false;
            }
            for i in 0..n {
                if self.ub[i] > k {
                    self.rows[i].advance();
                }
            }
        }
    }

    /// Computes the bound for the current domains without touching them.
    pub fn compute(&mut self, store: &Store) -> Option<u64> {
        let n = self.positions.len();
        self.build_costs(store);
        let weight = self.hungarian.solve(n, &self.cost);
        if weight >= self.infeasible as i64 {
            None
        } else {
            Some(self.constant + weight as u64)
        }
    }
}

impl Propagator for AssignmentLowerBound {
    fn name(&self) -> &'static str {
        "assignment_lower_bound"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        self.positions
            .iter()
            .map(|&v| (v, EventMask::BOUND | EventMask::INSTANTIATE))
            .collect()
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        self.counters.calls.fetch_add(1, Ordering::Relaxed);
        let Some(bound) = self.compute(store) else {
            self.counters.prunes.fetch_add(1, Ordering::Relaxed);
            trace!(event = "lower_bound", infeasible = true);
            return Err(PropagationError::Contradiction);
        };
        trace!(event = "lower_bound", bound, objective_ub = store.objective_ub());
        if bound > store.objective_ub() {
            self.counters.prunes.fetch_add(1, Ordering::Relaxed);
            return Err(PropagationError::Contradiction);
        }
        if store.update_objective_lb(bound)? {
            self.counters.prunes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn entailment(&self, store: &Store) -> Entailment {
        let n = self.positions.len();
        let mut placed = vec![0; n];
        for (i, &var) in self.positions.iter().enumerate() {
            match store.value(var) {
                Some(k) => placed[k] = i,
                None => return Entailment::Undefined,
            }
        }
        // Recount the reduced cost of the complete order.
        let mut total = self.constant;
        for (a, &i) in placed.iter().enumerate() {
            for &j in &placed[a + 1..] {
                total += self.rows[i].cost_at_rank(self.rank[i * n + j]);
            }
        }
        if total <= store.objective_ub() {
            Entailment::True
        } else {
            Entailment::False
        }
    }
}
