//! Propagators used by the ordering model.

mod channeling;
mod disjunction;
mod nogood;
mod precedence;
mod sum;
mod table;

pub use channeling::InverseChanneling;
pub use disjunction::{BinaryDisjunction, HIGH, LOW};
pub use nogood::Nogood;
pub use precedence::Precedence;
pub use sum::ObjectiveSum;
pub use table::{AdjacentPairTable, PairRelation};
