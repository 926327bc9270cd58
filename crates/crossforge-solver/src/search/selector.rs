//! Variable and value selection.

use crossforge_config::SearchStrategy;
use crossforge_core::BipartiteGraph;
use rand::rngs::StdRng;
use rand::Rng;

use crate::engine::{Engine, IntDomain, VarId};
use crate::heuristic::{barycenter_order, median_order, ranks};
use crate::model::OrderingModel;

/// Value tried first on the left branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOrder {
    /// Smallest value in the domain.
    Min,
    /// Value closest to the vertex's slot in a reference ordering.
    Centered(Vec<usize>),
}

impl ValueOrder {
    pub fn for_strategy(strategy: SearchStrategy, graph: &BipartiteGraph) -> Self {
        match strategy {
            SearchStrategy::Default => Self::Min,
            SearchStrategy::Median => Self::Centered(ranks(&median_order(graph))),
            SearchStrategy::Barycenter => Self::Centered(ranks(&barycenter_order(graph))),
        }
    }
}

/// Domain value closest to `target`; ties go to the larger value.
pub fn centered_value(domain: &IntDomain, target: usize) -> usize {
    let target = target.min(domain.ub());
    match (domain.prev_value(target), domain.next_value(target)) {
        (Some(below), Some(above)) => {
            if target - below < above - target {
                below
            } else {
                above
            }
        }
        (Some(below), None) => below,
        (None, Some(above)) => above,
        (None, None) => domain.lb(),
    }
}

/// Picks the next decision `var = value`.
///
/// Variables: the unfixed position with the smallest domain size over
/// failure weight, ties broken uniformly at random. Once every position is
/// fixed, any other unfixed variable at its minimum.
#[derive(Debug, Clone)]
pub struct BranchSelector {
    positions: Vec<VarId>,
    values: ValueOrder,
}

impl BranchSelector {
    pub fn new(model: &OrderingModel, values: ValueOrder) -> Self {
        Self {
            positions: model.positions().to_vec(),
            values,
        }
    }

    /// Returns `None` when every variable is fixed.
    pub fn select(&self, engine: &Engine, rng: &mut StdRng) -> Option<(VarId, usize)> {
        let store = engine.store();
        let mut best: Option<(usize, VarId)> = None;
        let mut best_size = 0usize;
        let mut best_weight = 0u64;
        let mut ties = 0u32;

        for (vertex, &var) in self.positions.iter().enumerate() {
            let size = store.size(var);
            if size <= 1 {
                continue;
            }
            let weight = engine.var_weight(var);
            if best.is_none() {
                best = Some((vertex, var));
                best_size = size;
                best_weight = weight;
                ties = 1;
                continue;
            }
            // size / weight against best_size / best_weight
            let lhs = size as u128 * best_weight as u128;
            let rhs = best_size as u128 * weight as u128;
            if lhs < rhs {
                best = Some((vertex, var));
                best_size = size;
                best_weight = weight;
                ties = 1;
            } else if lhs == rhs {
                ties += 1;
                if rng.random_range(0..ties) == 0 {
                    best = Some((vertex, var));
                }
            }
        }

        if let Some((vertex, var)) = best {
            let domain = store.domain(var);
            let value = match &self.values {
                ValueOrder::Min => domain.lb(),
                ValueOrder::Centered(target) => centered_value(domain, target[vertex]),
            };
            return Some((var, value));
        }

        (0..store.var_count())
            .find(|&var| !store.is_fixed(var))
            .map(|var| (var, store.lb(var)))
    }
}
