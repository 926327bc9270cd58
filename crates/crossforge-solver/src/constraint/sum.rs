//! Objective definition: `objective = constant + Σ weight_k * b_k` over 0/1
//! cost variables.

use crate::engine::{Entailment, EventMask, PropResult, Propagator, Store, VarId};

#[derive(Debug)]
pub struct ObjectiveSum {
    constant: u64,
    terms: Vec<(VarId, u64)>,
}

impl ObjectiveSum {
    pub fn new(constant: u64, terms: Vec<(VarId, u64)>) -> Self {
        Self { constant, terms }
    }

    fn bounds(&self, store: &Store) -> (u64, u64) {
        let mut lb = self.constant;
        let mut ub = self.constant;
        for &(var, weight) in &self.terms {
            if store.lb(var) == 1 {
                lb += weight;
            }
            if store.ub(var) == 1 {
                ub += weight;
            }
        }
        (lb, ub)
    }
}

impl Propagator for ObjectiveSum {
    fn name(&self) -> &'static str {
        "objective_sum"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        self.terms
            .iter()
            .map(|&(var, _)| (var, EventMask::INSTANTIATE))
            .collect()
    }

    fn watches_objective(&self) -> bool {
        true
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        let (lb, ub) = self.bounds(store);
        store.update_objective_lb(lb)?;
        store.update_objective_ub(ub)?;

        let obj_lb = store.objective_lb();
        let obj_ub = store.objective_ub();
        for &(var, weight) in &self.terms {
            if store.is_fixed(var) {
                continue;
            }
            if lb + weight > obj_ub {
                store.instantiate(var, 0)?;
            } else if ub - weight < obj_lb {
                store.instantiate(var, 1)?;
            }
        }
        Ok(())
    }

    fn entailment(&self, store: &Store) -> Entailment {
        let (lb, ub) = self.bounds(store);
        if lb > store.objective_ub() || ub < store.objective_lb() {
            Entailment::False
        } else if lb == ub && store.objective_lb() == lb && store.objective_ub() == ub {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
