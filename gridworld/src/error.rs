//! Error types for grid construction and planning.

use thiserror::Error;

use crate::core::types::Position;

/// Structural problems with a grid, plus the missing-endpoint failure that
/// blocks solving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size {size} is outside {min}..={max}")]
    InvalidSize { size: usize, min: usize, max: usize },

    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Position, size: usize },

    #[error("more than one {kind} cell (second at {pos})")]
    DuplicateEndpoint { kind: &'static str, pos: Position },

    #[error("{count} obstacles exceed the limit of {max}")]
    TooManyObstacles { count: usize, max: usize },

    #[error("{pos} is used by more than one of start, goal and obstacles")]
    Overlap { pos: Position },

    #[error("unknown layout symbol {symbol:?} at {pos}")]
    InvalidSymbol { symbol: char, pos: Position },

    #[error("grid needs both a start and a goal cell")]
    MissingEndpoints,

    #[error("no connected layout found after {attempts} attempts")]
    GenerationFailed { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, GridError>;
