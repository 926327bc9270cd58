//! Clauses of disequalities learned at restarts.

use smallvec::SmallVec;

use crate::engine::{
    Entailment, EventMask, PropResult, PropagationError, Propagator, Store, VarId,
};

/// Forbids the conjunction `x_1 = v_1 ∧ … ∧ x_n = v_n`, i.e. enforces
/// `x_1 ≠ v_1 ∨ … ∨ x_n ≠ v_n`.
#[derive(Debug, Clone)]
pub struct Nogood {
    literals: SmallVec<[(VarId, usize); 8]>,
}

impl Nogood {
    pub fn new(literals: impl IntoIterator<Item = (VarId, usize)>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

impl Propagator for Nogood {
    fn name(&self) -> &'static str {
        "nogood"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        self.literals
            .iter()
            .map(|&(var, _)| (var, EventMask::INSTANTIATE))
            .collect()
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        let mut open = None;
        for &(var, value) in &self.literals {
            if !store.contains(var, value) {
                return Ok(());
            }
            if !store.is_fixed(var) {
                if open.is_some() {
                    return Ok(());
                }
                open = Some((var, value));
            }
        }
        match open {
            Some((var, value)) => store.remove(var, value).map(|_| ()),
            None => Err(PropagationError::Contradiction),
        }
    }

    fn entailment(&self, store: &Store) -> Entailment {
        let mut all_false = true;
        for &(var, value) in &self.literals {
            if !store.contains(var, value) {
                return Entailment::True;
            }
            if !store.is_fixed(var) {
                all_false = false;
            }
        }
        if all_false {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}
