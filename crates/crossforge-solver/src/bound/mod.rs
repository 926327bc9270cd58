//! Objective lower bounds.
//!
//! Logging levels:
//! - **TRACE**: every bound computation

mod assignment;
mod hungarian;
mod row_builder;

pub use assignment::{AssignmentLowerBound, BoundCounters};
pub use hungarian::Hungarian;
pub use row_builder::AssignmentRowBuilder;

#[cfg(test)]
mod tests;
