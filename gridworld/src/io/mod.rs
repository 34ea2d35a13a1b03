//! I/O helpers for gridworld commands.

pub mod config;
pub mod grid_file;
