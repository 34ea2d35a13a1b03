//! Value iteration over the grid world.
//!
//! Sweeps run in row-major order and update values in place, so a cell may
//! read neighbors already updated earlier in the same sweep. Moves that leave
//! the board produce no candidate at all, while moves into an obstacle are a
//! self-loop charged with the bump penalty.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::core::grid::Grid;
use crate::core::path::reconstruct_path;
use crate::core::types::{Action, Position};
use crate::error::Result;

/// Candidates closer than this to the running maximum count as ties.
pub const TIE_EPSILON: f64 = 1e-6;
/// Fixed value reported for obstacle cells.
pub const OBSTACLE_VALUE: f64 = -1.0;
/// Fixed value of the goal cell.
pub const GOAL_VALUE: f64 = 1.0;
pub const VALUE_MIN: f64 = -1.0;
pub const VALUE_MAX: f64 = 1.0;

/// Rewards for a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardModel {
    /// Reward for stepping onto the goal.
    pub goal_reward: f64,
    /// Reward for an ordinary move.
    pub step_cost: f64,
    /// Reward for running into an obstacle and staying put.
    pub bump_penalty: f64,
}

impl Default for RewardModel {
    fn default() -> Self {
        Self {
            goal_reward: 1.0,
            step_cost: -0.04,
            bump_penalty: -0.1,
        }
    }
}

/// Tuning knobs for [`solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveParams {
    /// Discount applied to the next state's value.
    pub gamma: f64,
    /// Stop once a full sweep changes no value by more than this.
    pub theta: f64,
    /// Hard cap on sweeps. At least one sweep always runs.
    pub max_iterations: usize,
    pub rewards: RewardModel,
    /// Walk the greedy path after every sweep and keep it in
    /// [`Solution::trace`].
    pub trace_paths: bool,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 0.001,
            max_iterations: 1000,
            rewards: RewardModel::default(),
            trace_paths: false,
        }
    }
}

/// Per-cell policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "actions", rename_all = "lowercase")]
pub enum PolicyEntry {
    /// Obstacle cell; never acted from.
    Blocked,
    /// Goal cell; the walk ends here.
    Terminal,
    /// Best actions in discovery order. Empty until the first sweep reaches
    /// the cell.
    Actions(Vec<Action>),
}

impl PolicyEntry {
    /// First (tie-winning) action, if any.
    pub fn best(&self) -> Option<Action> {
        match self {
            PolicyEntry::Actions(actions) => actions.first().copied(),
            PolicyEntry::Blocked | PolicyEntry::Terminal => None,
        }
    }

    pub fn actions(&self) -> &[Action] {
        match self {
            PolicyEntry::Actions(actions) => actions,
            PolicyEntry::Blocked | PolicyEntry::Terminal => &[],
        }
    }
}

/// N×N state values, row-major. Serializes as a list of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Vec<Vec<f64>>")]
pub struct ValueMatrix {
    size: usize,
    values: Vec<f64>,
}

impl ValueMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `pos`, or `None` off the board.
    pub fn get(&self, pos: Position) -> Option<f64> {
        if pos.row < self.size && pos.col < self.size {
            self.values.get(pos.row * self.size + pos.col).copied()
        } else {
            None
        }
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.size).map(<[f64]>::to_vec).collect()
    }
}

impl From<ValueMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ValueMatrix) -> Self {
        matrix.rows()
    }
}

/// N×N policy entries, row-major. Serializes as a list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<Vec<PolicyEntry>>")]
pub struct PolicyMatrix {
    size: usize,
    entries: Vec<PolicyEntry>,
}

impl PolicyMatrix {
    /// Build a policy from explicit rows. Returns `None` unless the rows are
    /// square.
    pub fn from_rows(rows: Vec<Vec<PolicyEntry>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            entries: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `pos`, or `None` off the board.
    pub fn get(&self, pos: Position) -> Option<&PolicyEntry> {
        if pos.row < self.size && pos.col < self.size {
            self.entries.get(pos.row * self.size + pos.col)
        } else {
            None
        }
    }

    pub fn rows(&self) -> Vec<Vec<PolicyEntry>> {
        self.entries.chunks(self.size).map(<[PolicyEntry]>::to_vec).collect()
    }
}

impl From<PolicyMatrix> for Vec<Vec<PolicyEntry>> {
    fn from(matrix: PolicyMatrix) -> Self {
        matrix.rows()
    }
}

/// Output of [`solve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Values rounded to two decimals; obstacles are exactly −1.0.
    pub values: ValueMatrix,
    pub policy: PolicyMatrix,
    /// Sweeps performed.
    pub iterations: usize,
    /// False when the sweep cap was hit before `delta <= theta`.
    pub converged: bool,
    /// Largest per-cell change of each sweep, in order.
    pub deltas: Vec<f64>,
    /// Greedy path from start after each sweep. Empty unless
    /// [`SolveParams::trace_paths`] is set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<Vec<Position>>,
}

/// Run value iteration on `grid`.
///
/// Fails only with [`crate::error::GridError::MissingEndpoints`]. Hitting the
/// iteration cap is reported through [`Solution::converged`].
#[instrument(skip_all, fields(size = grid.size()))]
pub fn solve(grid: &Grid, params: &SolveParams) -> Result<Solution> {
    let (start, goal) = grid.endpoints()?;
    let size = grid.size();

    let mut values = vec![0.0; size * size];
    let mut policy = PolicyMatrix {
        size,
        entries: vec![PolicyEntry::Actions(Vec::new()); size * size],
    };
    for pos in grid.positions() {
        let idx = pos.row * size + pos.col;
        if grid.is_obstacle(pos) {
            values[idx] = OBSTACLE_VALUE;
            policy.entries[idx] = PolicyEntry::Blocked;
        } else if pos == goal {
            values[idx] = GOAL_VALUE;
            policy.entries[idx] = PolicyEntry::Terminal;
        }
    }

    let max_iterations = params.max_iterations.max(1);
    let mut deltas = Vec::new();
    let mut trace = Vec::new();
    let mut converged = false;
    while deltas.len() < max_iterations {
        let delta = sweep(grid, goal, params, &mut values, &mut policy.entries);
        deltas.push(delta);
        if params.trace_paths {
            trace.push(reconstruct_path(&policy, start, goal, grid));
        }
        if delta <= params.theta {
            converged = true;
            break;
        }
    }

    let iterations = deltas.len();
    if converged {
        debug!(iterations, "value iteration converged");
    } else {
        warn!(
            iterations,
            last_delta = deltas.last().copied().unwrap_or_default(),
            theta = params.theta,
            "value iteration hit the sweep cap before converging"
        );
    }

    let values = grid
        .positions()
        .map(|pos| {
            let value = values[pos.row * size + pos.col];
            if grid.is_obstacle(pos) {
                OBSTACLE_VALUE
            } else {
                round2(value)
            }
        })
        .collect();

    Ok(Solution {
        values: ValueMatrix { size, values },
        policy,
        iterations,
        converged,
        deltas,
        trace,
    })
}

/// One in-place row-major sweep. Returns the largest value change.
fn sweep(
    grid: &Grid,
    goal: Position,
    params: &SolveParams,
    values: &mut [f64],
    policy: &mut [PolicyEntry],
) -> f64 {
    let size = grid.size();
    let mut delta: f64 = 0.0;

    for pos in grid.positions() {
        if pos == goal || grid.is_obstacle(pos) {
            continue;
        }
        let idx = pos.row * size + pos.col;

        let mut best = f64::NEG_INFINITY;
        let mut best_actions = Vec::new();
        for action in Action::ALL {
            let Some(candidate) = q_value(grid, goal, params, values, pos, action) else {
                continue;
            };
            if (candidate - best).abs() < TIE_EPSILON {
                best_actions.push(action);
            } else if candidate > best {
                best = candidate;
                best_actions = vec![action];
            }
        }

        if best_actions.is_empty() {
            continue;
        }

        let old = values[idx];
        let new = best.clamp(VALUE_MIN, VALUE_MAX);
        values[idx] = new;
        policy[idx] = PolicyEntry::Actions(best_actions);
        delta = delta.max((old - new).abs());
    }

    delta
}

/// Value of taking `action` from `pos` under the current `values`.
///
/// `None` when the move leaves the board.
pub(crate) fn q_value(
    grid: &Grid,
    goal: Position,
    params: &SolveParams,
    values: &[f64],
    pos: Position,
    action: Action,
) -> Option<f64> {
    let size = grid.size();
    let dest = grid.neighbor(pos, action)?;
    let rewards = &params.rewards;
    let (reward, next) = if grid.is_obstacle(dest) {
        (rewards.bump_penalty, pos)
    } else if dest == goal {
        (rewards.goal_reward, goal)
    } else {
        (rewards.step_cost, dest)
    };
    Some(reward + params.gamma * values[next.row * size + next.col])
}

/// Round half up to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
