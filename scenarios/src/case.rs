//! Case file parsing and validation.
//!
//! Cases are TOML files pairing a grid with solver overrides and the checks
//! the resulting plan must satisfy. See `scenarios/cases/` for examples.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use gridworld::Position;
use gridworld::io::config::{SolverConfig, SolverOverrides};
use gridworld::io::grid_file::GridFile;

/// Default absolute tolerance for `value_at`, half a display unit.
pub const DEFAULT_VALUE_TOLERANCE: f64 = 0.005;

/// A parsed case file containing the grid, overrides and checks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CaseFile {
    pub case: CaseMeta,
    pub grid: GridFile,
    #[serde(default)]
    pub config: SolverOverrides,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// Case metadata: identifier and a short description.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    pub description: String,
}

/// Assertion evaluated against a planning outcome.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Reachability gate answers `expected`.
    PathExists { expected: bool },
    /// Walked path ends on the goal.
    ReachesGoal,
    /// Walked path has exactly `expected` positions (start and goal included).
    PathLength { expected: usize },
    /// Walked path touches none of `cells`.
    Avoids { cells: Vec<Position> },
    /// Walked path touches at least one of `cells`.
    VisitsAny { cells: Vec<Position> },
    /// Rounded value at `cell` is within `tolerance` of `expected`.
    ValueAt {
        cell: Position,
        expected: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    /// Solver stopped on `theta` rather than the sweep cap.
    Converged,
}

fn default_tolerance() -> f64 {
    DEFAULT_VALUE_TOLERANCE
}

impl CaseFile {
    /// Load and validate a case file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read case {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("load case {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let case: CaseFile = toml::from_str(contents).context("parse case")?;
        case.validate()?;
        Ok(case)
    }

    /// Solver config for this case: defaults plus the `[config]` overrides.
    pub fn solver_config(&self) -> Result<SolverConfig> {
        self.config
            .apply(SolverConfig::default())
            .context("config overrides invalid")
    }

    fn validate(&self) -> Result<()> {
        validate_case_id(&self.case.id)?;
        if self.case.description.trim().is_empty() {
            bail!("case.description must be non-empty");
        }
        let grid = self.grid.to_grid().context("grid invalid")?;
        self.solver_config()?;
        if self.checks.is_empty() {
            bail!("checks must be a non-empty array");
        }
        for (index, check) in self.checks.iter().enumerate() {
            check
                .validate(grid.size())
                .with_context(|| format!("checks[{}] invalid", index))?;
        }
        Ok(())
    }
}

impl Check {
    /// Short label used in reports, e.g. `value_at((0, 0))`.
    pub fn label(&self) -> String {
        match self {
            Check::PathExists { expected } => format!("path_exists({expected})"),
            Check::ReachesGoal => "reaches_goal".to_string(),
            Check::PathLength { expected } => format!("path_length({expected})"),
            Check::Avoids { cells } => format!("avoids({})", join_cells(cells)),
            Check::VisitsAny { cells } => format!("visits_any({})", join_cells(cells)),
            Check::ValueAt { cell, .. } => format!("value_at({cell})"),
            Check::Converged => "converged".to_string(),
        }
    }

    fn validate(&self, size: usize) -> Result<()> {
        match self {
            Check::PathLength { expected } => {
                if *expected == 0 || *expected > size * size + 1 {
                    bail!("path_length.expected must be in 1..={}", size * size + 1);
                }
            }
            Check::Avoids { cells } | Check::VisitsAny { cells } => {
                if cells.is_empty() {
                    bail!("cells must be a non-empty array");
                }
                for cell in cells {
                    check_in_bounds(*cell, size)?;
                }
            }
            Check::ValueAt {
                cell,
                expected,
                tolerance,
            } => {
                check_in_bounds(*cell, size)?;
                if !expected.is_finite() {
                    bail!("value_at.expected must be finite");
                }
                if !(tolerance.is_finite() && *tolerance >= 0.0) {
                    bail!("value_at.tolerance must be >= 0");
                }
            }
            Check::PathExists { .. } | Check::ReachesGoal | Check::Converged => {}
        }
        Ok(())
    }
}

fn check_in_bounds(cell: Position, size: usize) -> Result<()> {
    if cell.row >= size || cell.col >= size {
        bail!("cell {cell} outside {size}x{size} grid");
    }
    Ok(())
}

fn join_cells(cells: &[Position]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Discover and load all case files from a directory.
///
/// Returns cases sorted by id. Errors if duplicate ids are found.
pub fn discover_cases(dir: &Path) -> Result<Vec<CaseFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut cases = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read cases dir {}", dir.display()))? {
        let entry = entry.context("read case entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        cases.push(CaseFile::load(&path)?);
    }
    cases.sort_by(|left, right| left.case.id.cmp(&right.case.id));
    for pair in cases.windows(2) {
        if pair[0].case.id == pair[1].case.id {
            return Err(anyhow!("duplicate case.id {}", pair[0].case.id));
        }
    }
    Ok(cases)
}

fn validate_case_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("case.id must be non-empty");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("case.id must use [a-z0-9_-] only");
    }
    Ok(())
}
