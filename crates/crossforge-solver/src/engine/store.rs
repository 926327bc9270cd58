//! Variable store with a chronological trail.
//!
//! Every domain change is logged so that search can undo a whole subtree by
//! popping one level. Changes also raise per-variable events that the engine
//! turns into propagator wake-ups.

use super::domain::IntDomain;
use super::{EventMask, PropResult, PropagationError, VarId};

#[derive(Debug, Clone, Copy)]
enum TrailEntry {
    Removed { var: VarId, value: usize },
    Objective { lb: u64, ub: u64 },
}

/// Domains of all integer variables plus the objective interval.
#[derive(Debug)]
pub struct Store {
    domains: Vec<IntDomain>,
    objective_lb: u64,
    objective_ub: u64,
    trail: Vec<TrailEntry>,
    marks: Vec<usize>,
    pending: Vec<EventMask>,
    touched: Vec<VarId>,
    objective_touched: bool,
}

impl Store {
    /// Creates a store whose objective ranges over `lb..=ub`.
    pub fn new(objective_lb: u64, objective_ub: u64) -> Self {
        Self {
            domains: Vec::new(),
            objective_lb,
            objective_ub,
            trail: Vec::new(),
            marks: Vec::new(),
            pending: Vec::new(),
            touched: Vec::new(),
            objective_touched: false,
        }
    }

    /// Declares a variable with domain `0..size`.
    pub fn new_var(&mut self, size: usize) -> VarId {
        self.domains.push(IntDomain::range(size));
        self.pending.push(EventMask::NONE);
        self.domains.len() - 1
    }

    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    pub fn domain(&self, var: VarId) -> &IntDomain {
        &self.domains[var]
    }

    #[inline]
    pub fn lb(&self, var: VarId) -> usize {
        self.domains[var].lb()
    }

    #[inline]
    pub fn ub(&self, var: VarId) -> usize {
        self.domains[var].ub()
    }

    #[inline]
    pub fn size(&self, var: VarId) -> usize {
        self.domains[var].size()
    }

    #[inline]
    pub fn contains(&self, var: VarId, value: usize) -> bool {
        self.domains[var].contains(value)
    }

    #[inline]
    pub fn is_fixed(&self, var: VarId) -> bool {
        self.domains[var].is_fixed()
    }

    /// Value of a fixed variable.
    pub fn value(&self, var: VarId) -> Option<usize> {
        let d = &self.domains[var];
        d.is_fixed().then(|| d.lb())
    }

    /// Copies the current values of `var` into `out`.
    pub fn collect_values(&self, var: VarId, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.domains[var].values());
    }

    pub fn objective_lb(&self) -> u64 {
        self.objective_lb
    }

    pub fn objective_ub(&self) -> u64 {
        self.objective_ub
    }

    /// Removes `value` from `var`. Returns whether the domain changed.
    pub fn remove(&mut self, var: VarId, value: usize) -> PropResult<bool> {
        let d = &mut self.domains[var];
        if !d.contains(value) {
            return Ok(false);
        }
        if d.size() == 1 {
            return Err(PropagationError::Contradiction);
        }
        let mut event = EventMask::REMOVE;
        if value == d.lb() || value == d.ub() {
            event = event | EventMask::BOUND;
        }
        d.remove(value);
        if d.is_fixed() {
            event = event | EventMask::INSTANTIATE;
        }
        self.trail.push(TrailEntry::Removed { var, value });
        self.notify(var, event);
        Ok(true)
    }

    /// Removes every value below `bound`.
    pub fn update_lb(&mut self, var: VarId, bound: usize) -> PropResult<bool> {
        if bound <= self.lb(var) {
            return Ok(false);
        }
        if bound > self.ub(var) {
            return Err(PropagationError::Contradiction);
        }
        while self.lb(var) < bound {
            let lb = self.lb(var);
            self.remove(var, lb)?;
        }
        Ok(true)
    }

    /// Removes every value above `bound`.
    pub fn update_ub(&mut self, var: VarId, bound: usize) -> PropResult<bool> {
        if bound >= self.ub(var) {
            return Ok(false);
        }
        if bound < self.lb(var) {
            return Err(PropagationError::Contradiction);
        }
        while self.ub(var) > bound {
            let ub = self.ub(var);
            self.remove(var, ub)?;
        }
        Ok(true)
    }

    /// Reduces the domain of `var` to `{value}`.
    pub fn instantiate(&mut self, var: VarId, value: usize) -> PropResult<bool> {
        if !self.contains(var, value) {
            return Err(PropagationError::Contradiction);
        }
        if self.is_fixed(var) {
            return Ok(false);
        }
        let mut v = self.lb(var);
        while let Some(current) = self.domains[var].next_value(v) {
            if current != value {
                self.remove(var, current)?;
            }
            v = current + 1;
        }
        Ok(true)
    }

    /// Raises the objective lower bound.
    pub fn update_objective_lb(&mut self, bound: u64) -> PropResult<bool> {
        if bound <= self.objective_lb {
            return Ok(false);
        }
        if bound > self.objective_ub {
            return Err(PropagationError::Contradiction);
        }
        self.save_objective();
        self.objective_lb = bound;
        Ok(true)
    }

    /// Lowers the objective upper bound.
    pub fn update_objective_ub(&mut self, bound: u64) -> PropResult<bool> {
        if bound >= self.objective_ub {
            return Ok(false);
        }
        if bound < self.objective_lb {
            return Err(PropagationError::Contradiction);
        }
        self.save_objective();
        self.objective_ub = bound;
        Ok(true)
    }

    /// Number of open levels.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Opens a new level; changes made from now on are undone together.
    pub fn push_level(&mut self) {
        self.marks.push(self.trail.len());
    }

    /// Undoes every change made since the matching [`push_level`](Self::push_level).
    pub fn pop_level(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.undo_to(mark);
        }
    }

    /// Pops levels until `depth` remain.
    pub fn backtrack_to(&mut self, depth: usize) {
        while self.marks.len() > depth {
            self.pop_level();
        }
    }

    /// Moves pending `(variable, events)` pairs into `out`.
    pub(crate) fn drain_events(&mut self, out: &mut Vec<(VarId, EventMask)>) {
        for &var in &self.touched {
            out.push((var, self.pending[var]));
            self.pending[var] = EventMask::NONE;
        }
        self.touched.clear();
    }

    /// Returns and clears the objective-changed flag.
    pub(crate) fn take_objective_event(&mut self) -> bool {
        std::mem::take(&mut self.objective_touched)
    }

    pub(crate) fn clear_events(&mut self) {
        for &var in &self.touched {
            self.pending[var] = EventMask::NONE;
        }
        self.touched.clear();
        self.objective_touched = false;
    }

    fn notify(&mut self, var: VarId, event: EventMask) {
        if self.pending[var].is_empty() {
            self.touched.push(var);
        }
        self.pending[var] = self.pending[var] | event;
    }

    fn save_objective(&mut self) {
        self.trail.push(TrailEntry::Objective {
            lb: self.objective_lb,
            ub: self.objective_ub,
        });
        self.objective_touched = true;
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop() {
                Some(TrailEntry::Removed { var, value }) => self.domains[var].restore(value),
                Some(TrailEntry::Objective { lb, ub }) => {
                    self.objective_lb = lb;
                    self.objective_ub = ub;
                }
                None => break,
            }
        }
    }
}
