//! Solver configuration stored as TOML (e.g. `gridworld.toml`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::core::value_iteration::{RewardModel, SolveParams};

/// Solver configuration (TOML).
///
/// Intended to be edited by hand. Missing fields default to the values the
/// planner was tuned with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    pub solver: IterationConfig,
    pub rewards: RewardModel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IterationConfig {
    /// Discount factor, in (0, 1].
    pub gamma: f64,

    /// Convergence threshold on the largest per-sweep change.
    pub theta: f64,

    /// Sweep cap.
    pub max_iterations: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        let params = SolveParams::default();
        Self {
            gamma: params.gamma,
            theta: params.theta,
            max_iterations: params.max_iterations,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        let solver = &self.solver;
        if !(solver.gamma > 0.0 && solver.gamma <= 1.0) {
            return Err(anyhow!("solver.gamma must be in (0, 1]"));
        }
        if !(solver.theta.is_finite() && solver.theta > 0.0) {
            return Err(anyhow!("solver.theta must be > 0"));
        }
        if solver.max_iterations == 0 {
            return Err(anyhow!("solver.max_iterations must be > 0"));
        }
        let rewards = &self.rewards;
        for (name, value) in [
            ("goal_reward", rewards.goal_reward),
            ("step_cost", rewards.step_cost),
            ("bump_penalty", rewards.bump_penalty),
        ] {
            if !value.is_finite() {
                return Err(anyhow!("rewards.{name} must be finite"));
            }
        }
        Ok(())
    }

    /// Solver parameters described by this config.
    pub fn params(&self) -> SolveParams {
        SolveParams {
            gamma: self.solver.gamma,
            theta: self.solver.theta,
            max_iterations: self.solver.max_iterations,
            rewards: self.rewards,
            trace_paths: false,
        }
    }
}

/// Per-invocation overrides, from CLI flags or a scenario's `[config]` table.
#[derive(Debug, Clone, Default, PartialEq, Args, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverOverrides {
    /// Discount factor.
    #[arg(long)]
    pub gamma: Option<f64>,
    /// Convergence threshold.
    #[arg(long)]
    pub theta: Option<f64>,
    /// Sweep cap.
    #[arg(long)]
    pub max_iterations: Option<usize>,
    /// Reward for stepping onto the goal.
    #[arg(long, allow_hyphen_values = true)]
    pub goal_reward: Option<f64>,
    /// Reward for an ordinary move.
    #[arg(long, allow_hyphen_values = true)]
    pub step_cost: Option<f64>,
    /// Reward for bumping into an obstacle.
    #[arg(long, allow_hyphen_values = true)]
    pub bump_penalty: Option<f64>,
}

impl SolverOverrides {
    /// Apply overrides on top of `base` and re-validate.
    pub fn apply(&self, mut base: SolverConfig) -> Result<SolverConfig> {
        if let Some(gamma) = self.gamma {
            base.solver.gamma = gamma;
        }
        if let Some(theta) = self.theta {
            base.solver.theta = theta;
        }
        if let Some(max_iterations) = self.max_iterations {
            base.solver.max_iterations = max_iterations;
        }
        if let Some(goal_reward) = self.goal_reward {
            base.rewards.goal_reward = goal_reward;
        }
        if let Some(step_cost) = self.step_cost {
            base.rewards.step_cost = step_cost;
        }
        if let Some(bump_penalty) = self.bump_penalty {
            base.rewards.bump_penalty = bump_penalty;
        }
        base.validate()?;
        Ok(base)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SolverConfig::default()`.
pub fn load_config(path: &Path) -> Result<SolverConfig> {
    if !path.exists() {
        let cfg = SolverConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SolverConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SolverConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
