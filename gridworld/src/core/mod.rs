//! Deterministic, pure planning logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod generate;
pub mod grid;
pub mod path;
pub mod reachability;
pub mod types;
pub mod value_iteration;
