//! Plain-text and JSON rendering of planning results for CLI output.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::grid::Grid;
use crate::core::path::path_directions;
use crate::core::types::{CellKind, Position};
use crate::core::value_iteration::{PolicyEntry, PolicyMatrix, ValueMatrix};
use crate::plan::PlanOutcome;

/// Value table, two decimals per cell.
pub fn render_values(values: &ValueMatrix) -> String {
    let mut out = String::new();
    for row in values.rows() {
        let cells: Vec<String> = row.iter().map(|value| format!("{value:>6.2}")).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Policy table: arrows for best actions (all ties), `#` for obstacles, `G`
/// for the goal and `.` for cells without an action.
pub fn render_policy(policy: &PolicyMatrix) -> String {
    let mut out = String::new();
    for row in policy.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|entry| format!("{:<4}", policy_label(entry)))
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn policy_label(entry: &PolicyEntry) -> String {
    match entry {
        PolicyEntry::Blocked => CellKind::Obstacle.symbol().to_string(),
        PolicyEntry::Terminal => CellKind::Goal.symbol().to_string(),
        PolicyEntry::Actions(_) if entry.actions().is_empty() => ".".to_string(),
        PolicyEntry::Actions(_) => entry.actions().iter().map(|action| action.arrow()).collect(),
    }
}

/// Board with each path cell (except start and goal) marked by the
/// direction taken out of it.
pub fn render_path(grid: &Grid, path: &[Position]) -> String {
    let mut rows: Vec<Vec<char>> = grid
        .layout()
        .into_iter()
        .map(|row| row.chars().collect())
        .collect();
    for (pos, action) in path.iter().zip(path_directions(path)) {
        if grid.kind(*pos) == CellKind::Empty {
            rows[pos.row][pos.col] = action.arrow();
        }
    }
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(char::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

fn render_steps(path: &[Position]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Full text report for `gridworld solve`.
pub fn render_plan(grid: &Grid, outcome: &PlanOutcome) -> String {
    match outcome {
        PlanOutcome::Unreachable { start, goal } => {
            format!("no path from {start} to {goal}\n")
        }
        PlanOutcome::Solved(plan) => {
            let solution = &plan.solution;
            let status = if solution.converged {
                "converged"
            } else {
                "sweep cap reached"
            };
            let mut out = format!("iterations: {} ({status})\n", solution.iterations);
            out.push_str(&format!("\nvalues:\n{}\n", render_values(&solution.values)));
            out.push_str(&format!("policy:\n{}\n", render_policy(&solution.policy)));
            if !solution.trace.is_empty() {
                out.push_str("trace:\n");
                for (sweep, path) in solution.trace.iter().enumerate() {
                    out.push_str(&format!("sweep {}: {}\n", sweep + 1, render_steps(path)));
                }
                out.push('\n');
            }
            out.push_str(&format!("path:\n{}\n", render_path(grid, &plan.path)));
            out.push_str(&render_steps(&plan.path));
            out.push('\n');
            if !plan.complete {
                out.push_str(&format!("incomplete: path stops before {}\n", plan.goal));
            }
            out
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    layout: Vec<String>,
    #[serde(flatten)]
    outcome: &'a PlanOutcome,
}

/// Pretty JSON report for `gridworld solve --format json`.
pub fn plan_json(grid: &Grid, outcome: &PlanOutcome) -> Result<String> {
    let report = JsonReport {
        layout: grid.layout(),
        outcome,
    };
    serde_json::to_string_pretty(&report).context("serialize plan json")
}
