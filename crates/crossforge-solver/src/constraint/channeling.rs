//! Inverse channeling between positions and permutation.

use crate::engine::{Entailment, EventMask, PropResult, Propagator, Store, VarId};

/// Enforces `positions[permutation[k]] == k` for every `k`.
///
/// Keeps `k ∈ dom(positions[i])` equivalent to `i ∈ dom(permutation[k])`,
/// which also makes both arrays all-different.
#[derive(Debug)]
pub struct InverseChanneling {
    positions: Vec<VarId>,
    permutation: Vec<VarId>,
    scratch: Vec<usize>,
}

impl InverseChanneling {
    pub fn new(positions: Vec<VarId>, permutation: Vec<VarId>) -> Self {
        debug_assert_eq!(positions.len(), permutation.len());
        Self {
            positions,
            permutation,
            scratch: Vec::new(),
        }
    }

    fn filter(
        store: &mut Store,
        from: &[VarId],
        to: &[VarId],
        scratch: &mut Vec<usize>,
    ) -> PropResult {
        for (i, &var) in from.iter().enumerate() {
            store.collect_values(var, scratch);
            for &k in scratch.iter() {
                if !store.contains(to[k], i) {
                    store.remove(var, k)?;
                }
            }
            if let Some(k) = store.value(var) {
                store.instantiate(to[k], i)?;
            }
        }
        Ok(())
    }
}

impl Propagator for InverseChanneling {
    fn name(&self) -> &'static str {
        "inverse_channeling"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        self.positions
            .iter()
            .chain(&self.permutation)
            .map(|&v| (v, EventMask::REMOVE))
            .collect()
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        Self::filter(store, &self.positions, &self.permutation, &mut self.scratch)?;
        Self::filter(store, &self.permutation, &self.positions, &mut self.scratch)
    }

    fn entailment(&self, store: &Store) -> Entailment {
        let mut all_fixed = true;
        for (k, &var) in self.permutation.iter().enumerate() {
            match store.value(var) {
                Some(i) => match store.value(self.positions[i]) {
                    Some(p) if p != k => return Entailment::False,
                    Some(_) => {}
                    None => all_fixed = false,
                },
                None => all_fixed = false,
            }
        }
        if all_fixed {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
