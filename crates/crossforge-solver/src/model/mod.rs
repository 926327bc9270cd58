//! Constraint model of one ordering problem.
//!
//! Variables, in declaration order:
//!
//! - `positions[i]`: slot of free vertex `i`, domain `0..n`
//! - `permutation[k]`: free vertex in slot `k`, domain `0..n`
//! - one two-valued cost variable per open pair whose costs differ
//!
//! Pairs fixed by the partial order contribute their reduced cost to the
//! model constant. Open pairs with both reduced costs zero need no cost
//! variable: either order is free.

use std::sync::Arc;

use crossforge_config::ModelConfig;
use crossforge_core::{BipartiteGraph, CrossingMatrix};
use tracing::info;

use crate::bound::{AssignmentLowerBound, BoundCounters};
use crate::constraint::{
    AdjacentPairTable, BinaryDisjunction, InverseChanneling, ObjectiveSum, PairRelation,
    Precedence, HIGH,
};
use crate::engine::{Engine, Store, VarId};
use crate::reduction::PartialOrder;

/// Cost decision for one open pair.
///
/// `b == LOW` iff `first` is placed before `second`, which costs nothing;
/// the opposite order costs `weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostVar {
    pub var: VarId,
    pub first: usize,
    pub second: usize,
    pub weight: u64,
}

/// Model built for one graph; the matching [`Engine`] owns the domains.
#[derive(Debug)]
pub struct OrderingModel {
    positions: Vec<VarId>,
    permutation: Vec<VarId>,
    cost_vars: Vec<CostVar>,
    constant: u64,
    objective_ceiling: u64,
    bound_counters: Option<Arc<BoundCounters>>,
}

impl OrderingModel {
    /// Declares the variables and posts every propagator.
    pub fn build(
        graph: &BipartiteGraph,
        matrix: &CrossingMatrix,
        order: &PartialOrder,
        config: &ModelConfig,
    ) -> (Self, Engine) {
        let n = graph.free_count();

        let mut constant = matrix.constant();
        for (before, after) in order.closure_pairs() {
            constant += matrix.reduced(before, after);
        }

        let mut open = Vec::new();
        let mut open_total = 0u64;
        for &(i, j) in order.incomparable_pairs() {
            let (forward, backward) = (matrix.reduced(i, j), matrix.reduced(j, i));
            if forward == 0 && backward == 0 {
                continue;
            }
            let (first, second) = if forward == 0 { (i, j) } else { (j, i) };
            let weight = forward.max(backward);
            open_total += weight;
            open.push((first, second, weight));
        }

        let edges = graph.edge_count() as u64;
        let objective_ceiling = edges
            .saturating_mul(edges)
            .min(constant + open_total)
            .max(constant);

        let mut store = Store::new(constant, objective_ceiling);
        let positions: Vec<VarId> = (0..n).map(|_| store.new_var(n)).collect();
        let permutation: Vec<VarId> = (0..n).map(|_| store.new_var(n)).collect();
        let cost_vars: Vec<CostVar> = open
            .into_iter()
            .map(|(first, second, weight)| CostVar {
                var: store.new_var(2),
                first,
                second,
                weight,
            })
            .collect();

        let mut engine = Engine::new(store);
        engine.post(InverseChanneling::new(positions.clone(), permutation.clone()));
        for (before, after) in order.ordered_edges() {
            engine.post(Precedence::new(positions[before], positions[after]));
        }
        for cost in &cost_vars {
            engine.post(BinaryDisjunction::new(
                positions[cost.first],
                positions[cost.second],
                cost.var,
            ));
        }
        engine.post(ObjectiveSum::new(
            constant,
            cost_vars.iter().map(|c| (c.var, c.weight)).collect(),
        ));

        if config.adjacent_pair_table && n > 1 {
            let relation = Arc::new(preferred_pairs(matrix));
            for k in 0..n - 1 {
                engine.post(AdjacentPairTable::new(
                    permutation[k],
                    permutation[k + 1],
                    Arc::clone(&relation),
                ));
            }
        }

        let bound_counters = if config.lower_bound && n > 1 {
            let bound = AssignmentLowerBound::new(positions.clone(), matrix);
            let counters = bound.counters();
            engine.post(bound);
            Some(counters)
        } else {
            None
        };

        info!(
            event = "model_built",
            cost_vars = cost_vars.len(),
            constant,
            objective_ceiling,
            propagators = engine.propagator_count(),
        );

        (
            Self {
                positions,
                permutation,
                cost_vars,
                constant,
                objective_ceiling,
                bound_counters,
            },
            engine,
        )
    }

    pub fn free_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[VarId] {
        &self.positions
    }

    pub fn permutation(&self) -> &[VarId] {
        &self.permutation
    }

    pub fn cost_vars(&self) -> &[CostVar] {
        &self.cost_vars
    }

    /// Matrix constant plus the reduced costs of all forced pairs.
    pub fn constant(&self) -> u64 {
        self.constant
    }

    /// Initial upper bound of the objective.
    pub fn objective_ceiling(&self) -> u64 {
        self.objective_ceiling
    }

    pub fn bound_counters(&self) -> Option<&Arc<BoundCounters>> {
        self.bound_counters.as_ref()
    }

    /// Vertex order read from the permutation variables, once all are fixed.
    pub fn extract_permutation(&self, store: &Store) -> Option<Vec<usize>> {
        self.permutation.iter().map(|&v| store.value(v)).collect()
    }

    /// Objective read from the cost variables, once all are fixed.
    pub fn extract_objective(&self, store: &Store) -> Option<u64> {
        let mut total = self.constant;
        for cost in &self.cost_vars {
            if store.value(cost.var)? == HIGH {
                total += cost.weight;
            }
        }
        Some(total)
    }
}

/// Adjacent pairs `(i, j)` allowed when `i` directly precedes `j`.
///
/// `(i, j)` is allowed iff `c(i, j) < c(j, i)`, or the counts tie and
/// `i < j`. Swapping a disallowed adjacent pair never costs more, so some
/// optimum uses allowed pairs only.
pub fn preferred_pairs(matrix: &CrossingMatrix) -> PairRelation {
    let n = matrix.len();
    let mut relation = PairRelation::new(n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (cij, cji) = (matrix.count(i, j), matrix.count(j, i));
            if cij < cji || (cij == cji && i < j) {
                relation.allow(i, j);
            }
        }
    }
    relation
}

#[cfg(test)]
mod tests;
