//! Strict precedence between two position variables.

use crate::engine::{Entailment, EventMask, PropResult, PropagationError, Propagator, Store, VarId};

/// Enforces `before < after`.
#[derive(Debug)]
pub struct Precedence {
    before: VarId,
    after: VarId,
}

impl Precedence {
    pub fn new(before: VarId, after: VarId) -> Self {
        Self { before, after }
    }
}

/// Bound filtering for `x < y`, shared with the disjunction.
pub(crate) fn filter_less_than(store: &mut Store, x: VarId, y: VarId) -> PropResult {
    let y_ub = store.ub(y);
    if y_ub == 0 {
        return Err(PropagationError::Contradiction);
    }
    store.update_ub(x, y_ub - 1)?;
    let x_lb = store.lb(x);
    store.update_lb(y, x_lb + 1)?;
    Ok(())
}

/// Entailment of `x < y` from bounds.
pub(crate) fn less_than_entailment(store: &Store, x: VarId, y: VarId) -> Entailment {
    if store.ub(x) < store.lb(y) {
        Entailment::True
    } else if store.lb(x) >= store.ub(y) {
        Entailment::False
    } else {
        Entailment::Undefined
    }
}

impl Propagator for Precedence {
    fn name(&self) -> &'static str {
        "precedence"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        vec![
            (self.before, EventMask::BOUND),
            (self.after, EventMask::BOUND),
        ]
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        filter_less_than(store, self.before, self.after)
    }

    fn entailment(&self, store: &Store) -> Entailment {
        less_than_entailment(store, self.before, self.after)
    }
}
