//! Solve outcomes.

use std::fmt;

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveStatus {
    /// Search space exhausted; the returned permutation is optimal.
    Optimal,
    /// A resource limit stopped search after a solution was found.
    Satisfiable,
    /// Search space exhausted without any solution.
    Unsatisfiable,
    /// A resource limit stopped search before any solution was found.
    Unknown,
}

impl SolveStatus {
    /// Returns true if the status carries a permutation.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Satisfiable)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Satisfiable => write!(f, "satisfiable"),
            SolveStatus::Unsatisfiable => write!(f, "unsatisfiable"),
            SolveStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Best ordering of the free layer found by a solve.
///
/// `objective` and `permutation` are both present exactly when
/// [`SolveStatus::has_solution`] holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OcmSolution {
    pub status: SolveStatus,
    pub objective: Option<u64>,
    pub permutation: Option<Vec<usize>>,
}

impl OcmSolution {
    pub fn found(status: SolveStatus, objective: u64, permutation: Vec<usize>) -> Self {
        Self {
            status,
            objective: Some(objective),
            permutation: Some(permutation),
        }
    }

    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            objective: None,
            permutation: None,
        }
    }
}

/// Known solution or objective cap supplied before search.
///
/// With a permutation, search only looks for strictly better orderings and
/// falls back to this one. With an objective alone, search looks for any
/// ordering at most as costly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpperBound {
    pub objective: u64,
    pub permutation: Option<Vec<usize>>,
}

impl UpperBound {
    pub fn with_permutation(objective: u64, permutation: Vec<usize>) -> Self {
        Self {
            objective,
            permutation: Some(permutation),
        }
    }

    pub fn objective_only(objective: u64) -> Self {
        Self {
            objective,
            permutation: None,
        }
    }
}
