//! Static grid model: cell kinds, bounds and endpoints.
//!
//! A [`Grid`] is validated once at construction and never mutated afterwards.
//! Editing belongs to whatever produced the rows; the planner only reads.

use std::collections::HashSet;

use serde::Serialize;

use crate::core::types::{Action, CellKind, Position};
use crate::error::{GridError, Result};

/// Smallest supported board edge.
pub const MIN_SIZE: usize = 5;
/// Largest supported board edge.
pub const MAX_SIZE: usize = 9;

/// Obstacle budget for an `size`×`size` board.
pub fn max_obstacles(size: usize) -> usize {
    size.saturating_sub(2)
}

/// Square board of [`CellKind`]s stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    size: usize,
    cells: Vec<CellKind>,
    start: Option<Position>,
    goal: Option<Position>,
}

impl Grid {
    /// Build a grid from explicit rows.
    ///
    /// Rejects non-square input, sizes outside [`MIN_SIZE`]..=[`MAX_SIZE`],
    /// repeated start/goal cells and more than [`max_obstacles`] obstacles.
    /// Missing endpoints are allowed here and reported by [`Grid::endpoints`].
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> Result<Self> {
        let size = rows.len();
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GridError::InvalidSize {
                size,
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }

        let mut cells = Vec::with_capacity(size * size);
        let mut start = None;
        let mut goal = None;
        let mut obstacles = 0;
        for (row, kinds) in rows.into_iter().enumerate() {
            if kinds.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: kinds.len(),
                    size,
                });
            }
            for (col, kind) in kinds.into_iter().enumerate() {
                let pos = Position::new(row, col);
                match kind {
                    CellKind::Start => claim_endpoint(&mut start, "start", pos)?,
                    CellKind::Goal => claim_endpoint(&mut goal, "goal", pos)?,
                    CellKind::Obstacle => obstacles += 1,
                    CellKind::Empty => {}
                }
                cells.push(kind);
            }
        }

        let max = max_obstacles(size);
        if obstacles > max {
            return Err(GridError::TooManyObstacles {
                count: obstacles,
                max,
            });
        }

        Ok(Self {
            size,
            cells,
            start,
            goal,
        })
    }

    /// Build a grid from layout strings, one per row, using the symbols of
    /// [`CellKind::symbol`].
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self> {
        let mut rows = Vec::with_capacity(layout.len());
        for (row, line) in layout.iter().enumerate() {
            let kinds = line
                .as_ref()
                .chars()
                .enumerate()
                .map(|(col, symbol)| {
                    CellKind::from_symbol(symbol).ok_or(GridError::InvalidSymbol {
                        symbol,
                        pos: Position::new(row, col),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(kinds);
        }
        Self::from_rows(rows)
    }

    /// Build a grid from a size, optional endpoints and an obstacle list.
    pub fn from_parts(
        size: usize,
        start: Option<Position>,
        goal: Option<Position>,
        obstacles: &[Position],
    ) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GridError::InvalidSize {
                size,
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }

        let mut rows = vec![vec![CellKind::Empty; size]; size];
        let mut used = HashSet::new();
        let placements = start
            .map(|pos| (pos, CellKind::Start))
            .into_iter()
            .chain(goal.map(|pos| (pos, CellKind::Goal)))
            .chain(obstacles.iter().map(|pos| (*pos, CellKind::Obstacle)));
        for (pos, kind) in placements {
            if pos.row >= size || pos.col >= size {
                return Err(GridError::OutOfBounds { pos, size });
            }
            if !used.insert(pos) {
                return Err(GridError::Overlap { pos });
            }
            rows[pos.row][pos.col] = kind;
        }

        Self::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Signed bounds predicate: `0 <= row < N && 0 <= col < N`.
    pub fn is_valid(&self, row: isize, col: isize) -> bool {
        let size = self.size as isize;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    /// Kind of the cell at `pos`. Off-grid positions read as obstacles.
    pub fn kind(&self, pos: Position) -> CellKind {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .unwrap_or(CellKind::Obstacle)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.kind(pos) == CellKind::Obstacle
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    /// `(start, goal)`, or [`GridError::MissingEndpoints`] if either is unset.
    pub fn endpoints(&self) -> Result<(Position, Position)> {
        match (self.start, self.goal) {
            (Some(start), Some(goal)) => Ok((start, goal)),
            _ => Err(GridError::MissingEndpoints),
        }
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| **kind == CellKind::Obstacle)
            .count()
    }

    /// In-bounds destination of `action` from `pos`, regardless of its kind.
    pub fn neighbor(&self, pos: Position, action: Action) -> Option<Position> {
        pos.step(action, self.size)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    /// Row-major index of `pos`, if it is on the board.
    pub fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < self.size && pos.col < self.size {
            Some(pos.row * self.size + pos.col)
        } else {
            None
        }
    }

    /// Rows of layout symbols, top to bottom.
    pub fn layout(&self) -> Vec<String> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }
}

fn claim_endpoint(slot: &mut Option<Position>, kind: &'static str, pos: Position) -> Result<()> {
    if slot.is_some() {
        return Err(GridError::DuplicateEndpoint { kind, pos });
    }
    *slot = Some(pos);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::grid;

    #[test]
    fn from_rows_records_endpoints() {
        let grid = grid(&["S....", ".....", "..#..", ".....", "....G"]);
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.start(), Some(Position::new(0, 0)));
        assert_eq!(grid.goal(), Some(Position::new(4, 4)));
        assert_eq!(grid.obstacle_count(), 1);
        assert!(grid.is_obstacle(Position::new(2, 2)));
    }

    #[test]
    fn rejects_sizes_outside_range() {
        let rows = vec![vec![CellKind::Empty; 4]; 4];
        assert_eq!(
            Grid::from_rows(rows),
            Err(GridError::InvalidSize {
                size: 4,
                min: MIN_SIZE,
                max: MAX_SIZE
            })
        );
        let rows = vec![vec![CellKind::Empty; 10]; 10];
        assert!(matches!(
            Grid::from_rows(rows),
            Err(GridError::InvalidSize { size: 10, .. })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut rows = vec![vec![CellKind::Empty; 5]; 5];
        rows[3].pop();
        assert_eq!(
            Grid::from_rows(rows),
            Err(GridError::NotSquare {
                row: 3,
                len: 4,
                size: 5
            })
        );
    }

    #[test]
    fn rejects_second_start() {
        let mut rows = vec![vec![CellKind::Empty; 5]; 5];
        rows[0][0] = CellKind::Start;
        rows[1][1] = CellKind::Start;
        assert!(matches!(
            Grid::from_rows(rows),
            Err(GridError::DuplicateEndpoint { kind: "start", .. })
        ));
    }

    #[test]
    fn enforces_obstacle_budget() {
        let ok = Grid::from_parts(
            5,
            None,
            None,
            &[Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)],
        );
        assert!(ok.is_ok());

        let too_many = Grid::from_parts(
            5,
            None,
            None,
            &[
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(3, 1),
            ],
        );
        assert_eq!(too_many, Err(GridError::TooManyObstacles { count: 4, max: 3 }));
    }

    #[test]
    fn from_parts_rejects_overlap_and_bounds() {
        let overlap = Grid::from_parts(
            5,
            Some(Position::new(0, 0)),
            Some(Position::new(4, 4)),
            &[Position::new(0, 0)],
        );
        assert_eq!(
            overlap,
            Err(GridError::Overlap {
                pos: Position::new(0, 0)
            })
        );

        let outside = Grid::from_parts(5, Some(Position::new(5, 0)), None, &[]);
        assert!(matches!(outside, Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn endpoints_requires_both() {
        let grid = Grid::from_parts(5, Some(Position::new(0, 0)), None, &[]).expect("grid");
        assert_eq!(grid.endpoints(), Err(GridError::MissingEndpoints));
    }

    #[test]
    fn is_valid_checks_signed_bounds() {
        let grid = grid(&["S....", ".....", ".....", ".....", "....G"]);
        assert!(grid.is_valid(0, 0));
        assert!(grid.is_valid(4, 4));
        assert!(!grid.is_valid(-1, 0));
        assert!(!grid.is_valid(0, 5));
    }

    #[test]
    fn from_layout_rejects_unknown_symbols() {
        let err = Grid::from_layout(&["S....", ".....", "..x..", ".....", "....G"])
            .expect_err("invalid symbol");
        assert_eq!(
            err,
            GridError::InvalidSymbol {
                symbol: 'x',
                pos: Position::new(2, 2)
            }
        );
    }

    #[test]
    fn layout_matches_input() {
        let rows = ["S.#..", "..#..", "..#..", ".....", "....G"];
        let grid = grid(&rows);
        assert_eq!(grid.layout(), rows);
    }
}
