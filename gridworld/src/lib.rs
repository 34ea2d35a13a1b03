//! Grid-world planning with value iteration.
//!
//! A small square board holds a start, a goal and a few obstacles. The
//! planner checks that the goal is reachable, runs value iteration to get a
//! value matrix and a tie-preserving greedy policy, then walks the policy
//! from start to goal.
//!
//! - **[`core`]**: Pure, deterministic logic (grid model, reachability,
//!   value iteration, path reconstruction). No I/O.
//! - **[`io`]**: Grid and configuration files.
//!
//! [`plan`] chains the core stages the way callers are expected to use them,
//! and [`render`] formats the results for the CLI.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod plan;
pub mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::grid::Grid;
pub use crate::core::path::{is_complete, reconstruct_path};
pub use crate::core::reachability::path_exists;
pub use crate::core::types::{Action, CellKind, Position};
pub use crate::core::value_iteration::{SolveParams, Solution, solve};
pub use crate::error::GridError;
pub use crate::plan::{Plan, PlanOutcome, plan};
