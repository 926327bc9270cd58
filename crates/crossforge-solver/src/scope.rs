//! Search-level scope.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Counters and incumbent of one search, read by terminations.
#[derive(Debug)]
pub struct SearchScope {
    rng: StdRng,
    start_time: Option<Instant>,
    nodes: u64,
    fails: u64,
    solutions: u64,
    restarts: u64,
    best_objective: Option<u64>,
    best_permutation: Option<Vec<usize>>,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, from OS entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            start_time: None,
            nodes: 0,
            fails: 0,
            solutions: 0,
            restarts: 0,
            best_objective: None,
            best_permutation: None,
        }
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn increment_nodes(&mut self) -> u64 {
        self.nodes += 1;
        self.nodes
    }

    pub fn increment_fails(&mut self) -> u64 {
        self.fails += 1;
        self.fails
    }

    pub fn increment_restarts(&mut self) -> u64 {
        self.restarts += 1;
        self.restarts
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn fails(&self) -> u64 {
        self.fails
    }

    /// Improving solutions found by search; a warm start does not count.
    pub fn solutions(&self) -> u64 {
        self.solutions
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn best_objective(&self) -> Option<u64> {
        self.best_objective
    }

    pub fn best_permutation(&self) -> Option<&[usize]> {
        self.best_permutation.as_deref()
    }

    /// Installs a known solution without counting it as found.
    pub fn set_incumbent(&mut self, objective: u64, permutation: Vec<usize>) {
        self.best_objective = Some(objective);
        self.best_permutation = Some(permutation);
    }

    /// Records an improving solution found by search.
    pub fn record_solution(&mut self, objective: u64, permutation: Vec<usize>) {
        debug_assert!(self.best_objective.map_or(true, |best| objective < best));
        self.solutions += 1;
        self.set_incumbent(objective, permutation);
    }

    pub fn take_best(&mut self) -> Option<(u64, Vec<usize>)> {
        let objective = self.best_objective.take()?;
        let permutation = self.best_permutation.take()?;
        Some((objective, permutation))
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::new()
    }
}
