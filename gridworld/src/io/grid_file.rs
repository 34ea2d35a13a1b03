//! Grid description files (TOML).
//!
//! Two equivalent forms are accepted:
//!
//! ```toml
//! size = 5
//! start = [0, 0]
//! goal = [4, 4]
//! obstacles = [[0, 2], [1, 2]]
//! ```
//!
//! or one layout string per row using `.`, `S`, `G` and `#`:
//!
//! ```toml
//! layout = ["S.#..", "..#..", ".....", ".....", "....G"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::grid::Grid;
use crate::core::types::Position;

/// On-disk grid description. Exactly one of `size` or `layout` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GridFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obstacles: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<String>>,
}

impl GridFile {
    /// Validate the description and build the grid.
    pub fn to_grid(&self) -> Result<Grid> {
        match (self.size, &self.layout) {
            (Some(_), Some(_)) => bail!("grid must set either size or layout, not both"),
            (None, None) => bail!("grid must set size or layout"),
            (Some(size), None) => {
                let grid = Grid::from_parts(size, self.start, self.goal, &self.obstacles)?;
                Ok(grid)
            }
            (None, Some(layout)) => {
                if self.start.is_some() || self.goal.is_some() || !self.obstacles.is_empty() {
                    bail!("layout grids must not also set start, goal or obstacles");
                }
                Ok(Grid::from_layout(layout)?)
            }
        }
    }

    /// Layout-form description of `grid`.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            layout: Some(grid.layout()),
            ..Self::default()
        }
    }
}

/// Parse a grid description from TOML text.
pub fn parse_grid(contents: &str) -> Result<Grid> {
    let file: GridFile = toml::from_str(contents).context("parse grid toml")?;
    file.to_grid().context("invalid grid")
}

/// Load a grid description from disk.
pub fn load_grid(path: &Path) -> Result<Grid> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read grid {}", path.display()))?;
    parse_grid(&contents).with_context(|| format!("load grid {}", path.display()))
}

/// Serialize `grid` in layout form.
pub fn grid_to_toml(grid: &Grid) -> Result<String> {
    toml::to_string_pretty(&GridFile::from_grid(grid)).context("serialize grid toml")
}
