//! CrossForge Core - graph and crossing-count primitives
//!
//! This crate provides the data every other CrossForge crate builds on:
//! - [`BipartiteGraph`] with sorted per-vertex adjacency
//! - [`CrossingMatrix`] of pairwise crossing counts and its reduced form
//! - PACE text input and output
//! - Solve status and solution types

pub mod crossing;
pub mod error;
pub mod graph;
pub mod pace;
pub mod solution;

pub use crossing::{crossing, crossing_number, CrossingMatrix};
pub use error::{CrossForgeError, Result};
pub use graph::{BipartiteGraph, GraphBuilder};
pub use solution::{OcmSolution, SolveStatus, UpperBound};
