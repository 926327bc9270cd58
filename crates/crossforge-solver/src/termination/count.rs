//! Counter-based terminations.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once search has found `limit` improving solutions.
#[derive(Debug, Clone)]
pub struct SolutionCountTermination {
    limit: u64,
}

impl SolutionCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for SolutionCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.solutions() >= self.limit
    }
}

/// Terminates after visiting `limit` nodes.
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.nodes() >= self.limit
    }
}

/// Terminates after `limit` failed nodes.
#[derive(Debug, Clone)]
pub struct FailCountTermination {
    limit: u64,
}

impl FailCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for FailCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.fails() >= self.limit
    }
}
