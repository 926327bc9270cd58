//! Allowed ordered pairs for two consecutive permutation slots.

use std::sync::Arc;

use crate::bitset::BitSet;
use crate::engine::{Entailment, EventMask, PropResult, Propagator, Store, VarId};

/// Row-major `n × n` relation; `allows(i, j)` means `i` may sit directly
/// before `j`.
#[derive(Debug, Clone)]
pub struct PairRelation {
    n: usize,
    bits: BitSet,
}

impl PairRelation {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            bits: BitSet::new(n * n),
        }
    }

    pub fn allow(&mut self, i: usize, j: usize) {
        self.bits.insert(i * self.n + j);
    }

    #[inline]
    pub fn allows(&self, i: usize, j: usize) -> bool {
        self.bits.contains(i * self.n + j)
    }
}

/// Positive table over `(permutation[k], permutation[k + 1])`.
#[derive(Debug)]
pub struct AdjacentPairTable {
    left: VarId,
    right: VarId,
    relation: Arc<PairRelation>,
    scratch: Vec<usize>,
    support: Vec<usize>,
}

impl AdjacentPairTable {
    pub fn new(left: VarId, right: VarId, relation: Arc<PairRelation>) -> Self {
        Self {
            left,
            right,
            relation,
            scratch: Vec::new(),
            support: Vec::new(),
        }
    }

    fn revise(&mut self, store: &mut Store, var: VarId, other: VarId, forward: bool) -> PropResult {
        store.collect_values(var, &mut self.scratch);
        store.collect_values(other, &mut self.support);
        for &a in &self.scratch {
            let supported = self.support.iter().any(|&b| {
                b != a
                    && if forward {
                        self.relation.allows(a, b)
                    } else {
                        self.relation.allows(b, a)
                    }
            });
            if !supported {
                store.remove(var, a)?;
            }
        }
        Ok(())
    }
}

impl Propagator for AdjacentPairTable {
    fn name(&self) -> &'static str {
        "adjacent_pair_table"
    }

    fn subscriptions(&self) -> Vec<(VarId, EventMask)> {
        vec![
            (self.left, EventMask::REMOVE),
            (self.right, EventMask::REMOVE),
        ]
    }

    fn propagate(&mut self, store: &mut Store) -> PropResult {
        let (left, right) = (self.left, self.right);
        self.revise(store, left, right, true)?;
        self.revise(store, right, left, false)
    }

    fn entailment(&self, store: &Store) -> Entailment {
        match (store.value(self.left), store.value(self.right)) {
            (Some(a), Some(b)) if a != b && self.relation.allows(a, b) => Entailment::True,
            (Some(_), Some(_)) => Entailment::False,
            _ => Entailment::Undefined,
        }
    }
}
