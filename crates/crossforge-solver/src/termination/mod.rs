//! Termination conditions for the search.
//!
//! Checked cooperatively between nodes; a terminated search keeps its
//! incumbent.

mod composite;
mod count;
mod external;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use composite::{AndTermination, OrTermination};
pub use count::{FailCountTermination, NodeCountTermination, SolutionCountTermination};
pub use external::ExternalTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if search should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}

/// Marker type indicating no termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        false
    }
}
