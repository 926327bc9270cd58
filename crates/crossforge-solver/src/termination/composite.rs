//! Composite termination conditions (AND/OR).
//!
//! Uses macro-generated tuple implementations for zero type erasure.

use super::Termination;
use crate::scope::SearchScope;

/// Combines multiple terminations with OR logic (any must terminate).
///
/// # Examples
///
/// ```
/// use crossforge_solver::termination::{
///     NodeCountTermination, OrTermination, TimeTermination,
/// };
///
/// // Terminate after 30 seconds OR 100 000 nodes
/// let termination = OrTermination::new((
///     TimeTermination::seconds(30),
///     NodeCountTermination::new(100_000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR tuples.
macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);

/// Combines multiple terminations with AND logic (all must terminate).
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    /// Creates a new AND termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for AND tuples.
macro_rules! impl_and_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for AndTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$idx.is_terminated(scope))&&+
            }
        }
    };
}

impl_and_termination!(0: T0);
impl_and_termination!(0: T0, 1: T1);
impl_and_termination!(0: T0, 1: T1, 2: T2);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
