//! Binary disjunction linking a cost decision to the relative order of two
//! position variables.
//!
//! The cost variable `b` takes value [`LOW`] exactly when `x < y` and
//! [`HIGH`] exactly when `y < x`; `x == y` satisfies neither.

use super::precedence::{filter_less_than, less_than_entailment};
use crate::engine::{Entailment, EventMask, PropResult, Propagator, Store, VarId};

/// Value of the cost variable when `x` precedes `y`.
pub const LOW: usize = 0;

/// Value of the cost variable when `y` precedes `x`.
pub const HIGH: usize = 1;

#[derive(Debug)]
pub struct BinaryDisjunction {
    x: VarId,
    y: VarId,
    b: VarId,
}

impl BinaryDisjunction {
    pub fn new(x: VarId, y: VarId, b: VarId) -> Self {
        Self { x, y, b }
    }
}

impl Propagator for BinaryDisjunction {
    fn name(&self) -> &'static str {
        "binary_disjunction"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        vec![
            (self.x, EventMask::BOUND),
            (self.y, EventMask::BOUND),
            (self.b, EventMask::INSTANTIATE),
        ]
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        if !store.is_fixed(self.b) {
            // Positions are pairwise distinct, so touching bounds already decide the order.
            if store.ub(self.x) <= store.lb(self.y) {
                store.instantiate(self.b, LOW)?;
            } else if store.ub(self.y) <= store.lb(self.x) {
                store.remove(self.b, LOW)?;
            } else {
                return Ok(());
            }
        }
        match store.value(self.b) {
            Some(LOW) => filter_less_than(store, self.x, self.y),
            _ => filter_less_than(store, self.y, self.x),
        }
    }

    fn entailment(&self, store: &Store) -> Entailment {
        match store.value(self.b) {
            Some(LOW) => less_than_entailment(store, self.x, self.y),
            Some(_) => less_than_entailment(store, self.y, self.x),
            None => match (store.value(self.x), store.value(self.y)) {
                (Some(a), Some(b)) if a == b => Entailment::False,
                _ => Entailment::Undefined,
            },
        }
    }
}
