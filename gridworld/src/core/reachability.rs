//! Breadth-first reachability over open cells.

use std::collections::VecDeque;

use crate::core::grid::Grid;
use crate::core::types::{Action, Position};

/// True if `goal` can be reached from `start` through 4-connected,
/// in-bounds, non-obstacle cells.
///
/// Returns as soon as `goal` is dequeued.
pub fn path_exists(grid: &Grid, start: Position, goal: Position) -> bool {
    let mut found = false;
    bfs(grid, start, |pos| {
        found = pos == goal;
        !found
    });
    found
}

/// Every open cell reachable from `start`, in BFS discovery order.
pub fn reachable_cells(grid: &Grid, start: Position) -> Vec<Position> {
    let mut cells = Vec::new();
    bfs(grid, start, |pos| {
        cells.push(pos);
        true
    });
    cells
}

/// Visit cells in BFS order until `visit` returns false or the frontier
/// empties. Cells are marked visited on enqueue.
fn bfs(grid: &Grid, start: Position, mut visit: impl FnMut(Position) -> bool) {
    let Some(start_idx) = grid.index(start) else {
        return;
    };
    if grid.is_obstacle(start) {
        return;
    }

    let mut visited = vec![false; grid.size() * grid.size()];
    let mut queue = VecDeque::new();
    visited[start_idx] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        if !visit(pos) {
            return;
        }
        for action in Action::ALL {
            let Some(next) = grid.neighbor(pos, action) else {
                continue;
            };
            if grid.is_obstacle(next) {
                continue;
            }
            if let Some(idx) = grid.index(next)
                && !visited[idx]
            {
                visited[idx] = true;
                queue.push_back(next);
            }
        }
    }
}
