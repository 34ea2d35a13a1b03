//! Seeded random boards for demos and stress tests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::grid::{Grid, MAX_SIZE, MIN_SIZE, max_obstacles};
use crate::core::reachability::path_exists;
use crate::core::types::Position;
use crate::error::{GridError, Result};

/// Shuffles tried before giving up on a connected layout.
pub const MAX_ATTEMPTS: u32 = 64;

/// Generate a board with a start, a goal and `obstacles` obstacles (random
/// count within the budget when `None`), where the goal is reachable.
///
/// The same `(size, obstacles, seed)` always yields the same grid.
pub fn random_grid(size: usize, obstacles: Option<usize>, seed: u64) -> Result<Grid> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(GridError::InvalidSize {
            size,
            min: MIN_SIZE,
            max: MAX_SIZE,
        });
    }
    let max = max_obstacles(size);
    let mut rng = StdRng::seed_from_u64(seed);
    let count = match obstacles {
        Some(count) if count > max => {
            return Err(GridError::TooManyObstacles { count, max });
        }
        Some(count) => count,
        None => rng.gen_range(0..=max),
    };

    let mut cells: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .collect();

    for attempt in 1..=MAX_ATTEMPTS {
        cells.shuffle(&mut rng);
        let grid = Grid::from_parts(size, Some(cells[0]), Some(cells[1]), &cells[2..2 + count])?;
        if path_exists(&grid, cells[0], cells[1]) {
            debug!(size, count, seed, attempt, "generated grid");
            return Ok(grid);
        }
    }

    Err(GridError::GenerationFailed {
        attempts: MAX_ATTEMPTS,
    })
}
