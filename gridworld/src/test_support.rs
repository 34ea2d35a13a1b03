//! Test-only helpers for constructing grids, policies and fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::grid::Grid;
use crate::core::types::Action;
use crate::core::value_iteration::PolicyEntry;

/// 5×5, start top-left, goal bottom-right, no obstacles.
pub const OPEN_5X5: [&str; 5] = ["S....", ".....", ".....", ".....", "....G"];

/// 5×5 with a wall at column 2 over rows 0–2; the opening is rows 3–4.
pub const WALL_5X5: [&str; 5] = ["S.#..", "..#..", "..#..", ".....", "....G"];

/// 5×5 with the goal cornered by two obstacles.
pub const ENCLOSED_5X5: [&str; 5] = ["S....", ".....", ".....", "....#", "...#G"];

/// Build a grid from layout rows, panicking on invalid input.
pub fn grid(layout: &[&str]) -> Grid {
    Grid::from_layout(layout).expect("valid test layout")
}

/// Square policy where every cell prefers `action`.
pub fn uniform_policy(size: usize, action: Action) -> Vec<Vec<PolicyEntry>> {
    vec![vec![PolicyEntry::Actions(vec![action]); size]; size]
}

/// Temporary directory for grid, config and case files.
pub struct Fixtures {
    dir: tempfile::TempDir,
}

impl Fixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create tempdir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the fixture directory.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write a grid file in layout form.
    pub fn write_layout(&self, name: &str, layout: &[&str]) -> Result<PathBuf> {
        let rows = layout
            .iter()
            .map(|row| format!("  \"{row}\","))
            .collect::<Vec<_>>()
            .join("\n");
        self.write(name, &format!("layout = [\n{rows}\n]\n"))
    }
}
