//! Greedy path reconstruction from a solved policy.

use crate::core::grid::Grid;
use crate::core::types::{Action, Position};
use crate::core::value_iteration::PolicyMatrix;

/// Follow the first best action of each cell from `start` toward `goal`.
///
/// Stops early (returning the prefix walked so far) when a cell has no
/// action, when the chosen move would leave the board or hit an obstacle, or
/// after `N²` steps. A result whose last element is not `goal` is incomplete;
/// check with [`is_complete`].
pub fn reconstruct_path(
    policy: &PolicyMatrix,
    start: Position,
    goal: Position,
    grid: &Grid,
) -> Vec<Position> {
    let max_steps = grid.size() * grid.size();
    let mut path = vec![start];
    let mut current = start;
    let mut steps = 0;

    while current != goal && steps < max_steps {
        let Some(action) = policy.get(current).and_then(|entry| entry.best()) else {
            break;
        };
        let Some(next) = grid.neighbor(current, action) else {
            break;
        };
        if grid.is_obstacle(next) {
            break;
        }
        current = next;
        path.push(current);
        steps += 1;
    }

    path
}

/// True if `path` ends at `goal`.
pub fn is_complete(path: &[Position], goal: Position) -> bool {
    path.last() == Some(&goal)
}

/// Direction of each step along `path`. Non-adjacent pairs are skipped.
pub fn path_directions(path: &[Position]) -> Vec<Action> {
    path.windows(2)
        .filter_map(|pair| Action::between(pair[0], pair[1]))
        .collect()
}
