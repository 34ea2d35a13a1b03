//! Stable exit codes for gridworld CLI commands.

/// Command succeeded; for `solve`, the path reaches the goal.
pub const OK: i32 = 0;
/// Invalid grid, config or arguments, including a missing start or goal.
pub const INVALID: i32 = 1;
/// Obstacles separate start from goal.
pub const UNREACHABLE: i32 = 2;
/// `solve` produced a path that stops before the goal.
pub const INCOMPLETE: i32 = 3;
