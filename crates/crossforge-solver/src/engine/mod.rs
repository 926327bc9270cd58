//! Propagation engine.
//!
//! A [`Store`] of finite integer domains, a set of [`Propagator`]s subscribed
//! to domain events, and a two-level queue that runs them to a fixed point.
//! Contradictions are ordinary results: the search catches them at the node
//! boundary and backtracks.
//!
//! Failing propagators gain weight; the weights feed the weighted-degree
//! variable selection.

mod domain;
mod store;

use std::collections::VecDeque;
use std::fmt::Debug;
use std::ops::BitOr;

use smallvec::SmallVec;
use thiserror::Error;

pub use domain::IntDomain;
pub use store::Store;

/// Index of a variable in the [`Store`].
pub type VarId = usize;

/// Index of a propagator in the [`Engine`].
pub type PropId = usize;

/// Failure raised by propagation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    /// Some domain would become empty; the current node is infeasible.
    #[error("contradiction")]
    Contradiction,

    /// A propagator detected a broken internal invariant.
    #[error("{0}")]
    Internal(String),
}

pub type PropResult<T = ()> = Result<T, PropagationError>;

/// Kinds of domain change a propagator can subscribe to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    /// Any value removed.
    pub const REMOVE: EventMask = EventMask(1);
    /// Lower or upper bound moved.
    pub const BOUND: EventMask = EventMask(2);
    /// Domain became a singleton.
    pub const INSTANTIATE: EventMask = EventMask(4);
    pub const ANY: EventMask = EventMask(7);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn intersects(self, other: EventMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventMask(self.0 | rhs.0)
    }
}

/// Scheduling class. Expensive propagators run only once cheap ones are quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    Low,
}

/// Whether a constraint holds for every, no, or some remaining tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entailment {
    True,
    False,
    Undefined,
}

/// A filtering algorithm attached to some variables.
pub trait Propagator: Send + Debug {
    /// Short name used in logs and assertion failures.
    fn name(&self) -> &'static str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// Variables and the events that wake this propagator.
    fn subscriptions(&self) -> Vec<(VarId, EventMask)>;

    /// Whether objective bound changes wake this propagator.
    fn watches_objective(&self) -> bool {
        false
    }

    /// Removes values that cannot take part in any solution.
    fn propagate(&mut self, store: &mut Store) -> PropResult;

    fn entailment(&self, store: &Store) -> Entailment;
}

/// Store plus propagators, run to a fixed point on demand.
#[derive(Debug)]
pub struct Engine {
    store: Store,
    propagators: Vec<Box<dyn Propagator>>,
    priorities: Vec<Priority>,
    watchers: Vec<SmallVec<[(PropId, EventMask); 4]>>,
    objective_watchers: Vec<PropId>,
    prop_vars: Vec<Vec<VarId>>,
    queues: [VecDeque<PropId>; 2],
    queued: Vec<bool>,
    prop_weights: Vec<u64>,
    var_weights: Vec<u64>,
    events: Vec<(VarId, EventMask)>,
    propagation_count: u64,
}

impl Engine {
    pub fn new(store: Store) -> Self {
        let var_count = store.var_count();
        Self {
            store,
            propagators: Vec::new(),
            priorities: Vec::new(),
            watchers: vec![SmallVec::new(); var_count],
            objective_watchers: Vec::new(),
            prop_vars: Vec::new(),
            queues: [VecDeque::new(), VecDeque::new()],
            queued: Vec::new(),
            prop_weights: Vec::new(),
            var_weights: vec![1; var_count],
            events: Vec::new(),
            propagation_count: 0,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Adds a propagator and schedules it for the next fixed point.
    pub fn post<P: Propagator + 'static>(&mut self, propagator: P) -> PropId {
        self.post_boxed(Box::new(propagator))
    }

    pub fn post_boxed(&mut self, propagator: Box<dyn Propagator>) -> PropId {
        let id = self.propagators.len();
        // Variables declared after construction still need slots.
        let var_count = self.store.var_count();
        if self.watchers.len() < var_count {
            self.watchers.resize(var_count, SmallVec::new());
            self.var_weights.resize(var_count, 1);
        }

        let subscriptions = propagator.subscriptions();
        let mut vars = Vec::with_capacity(subscriptions.len());
        for (var, mask) in subscriptions {
            self.watchers[var].push((id, mask));
            vars.push(var);
        }
        if propagator.watches_objective() {
            self.objective_watchers.push(id);
        }
        self.priorities.push(propagator.priority());
        self.prop_vars.push(vars);
        self.prop_weights.push(1);
        self.queued.push(false);
        self.propagators.push(propagator);
        self.enqueue(id);
        id
    }

    pub fn propagator_count(&self) -> usize {
        self.propagators.len()
    }

    /// Total propagator executions so far.
    pub fn propagation_count(&self) -> u64 {
        self.propagation_count
    }

    /// Failures raised by propagator `id`, plus one.
    pub fn propagator_weight(&self, id: PropId) -> u64 {
        self.prop_weights[id]
    }

    /// Accumulated failure weight of the propagators watching `var`.
    pub fn var_weight(&self, var: VarId) -> u64 {
        self.var_weights[var]
    }

    /// Schedules every propagator, e.g. after posting at a restart.
    pub fn schedule_all(&mut self) {
        for id in 0..self.propagators.len() {
            self.enqueue(id);
        }
    }

    /// Runs scheduled propagators until none is pending.
    ///
    /// On failure the queue is flushed and the failing propagator's weight
    /// grows; the store is left as is for the caller to backtrack.
    pub fn fixpoint(&mut self) -> PropResult {
        loop {
            self.schedule_events();
            let Some(id) = self.dequeue() else {
                return Ok(());
            };
            self.propagation_count += 1;
            if let Err(err) = self.propagators[id].propagate(&mut self.store) {
                if err == PropagationError::Contradiction {
                    self.prop_weights[id] += 1;
                    for &var in &self.prop_vars[id] {
                        self.var_weights[var] += 1;
                    }
                }
                self.flush();
                return Err(err);
            }
        }
    }

    /// Drops pending events without running anything, after the caller
    /// failed the node on its own.
    pub fn discard_pending(&mut self) {
        self.flush();
    }

    /// Name of the first propagator not entailed by the current domains.
    pub fn first_unsatisfied(&self) -> Option<&'static str> {
        self.propagators
            .iter()
            .find(|p| p.entailment(&self.store) != Entailment::True)
            .map(|p| p.name())
    }

    fn schedule_events(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        self.store.drain_events(&mut events);
        for &(var, mask) in &events {
            for i in 0..self.watchers[var].len() {
                let (id, wanted) = self.watchers[var][i];
                if wanted.intersects(mask) {
                    self.enqueue(id);
                }
            }
        }
        events.clear();
        self.events = events;

        if self.store.take_objective_event() {
            for i in 0..self.objective_watchers.len() {
                let id = self.objective_watchers[i];
                self.enqueue(id);
            }
        }
    }

    fn enqueue(&mut self, id: PropId) {
        if !self.queued[id] {
            self.queued[id] = true;
            let level = match self.priorities[id] {
                Priority::Normal => 0,
                Priority::Low => 1,
            };
            self.queues[level].push_back(id);
        }
    }

    fn dequeue(&mut self) -> Option<PropId> {
        let id = self.queues[0]
            .pop_front()
            .or_else(|| self.queues[1].pop_front())?;
        self.queued[id] = false;
        Some(id)
    }

    fn flush(&mut self) {
        for queue in &mut self.queues {
            for id in queue.drain(..) {
                self.queued[id] = false;
            }
        }
        self.store.clear_events();
    }
}
