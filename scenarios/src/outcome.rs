use serde::Serialize;

use gridworld::PlanOutcome;

use crate::judge::Judgment;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Fail,
    Unreachable,
    Error,
}

/// Every check passing is a success, even for cases that expect the goal to
/// be cut off. Otherwise an unreachable goal explains the failure.
pub fn classify_outcome(plan: &PlanOutcome, judgment: &Judgment) -> Outcome {
    if judgment.all_passed() {
        return Outcome::Success;
    }
    match plan {
        PlanOutcome::Unreachable { .. } => Outcome::Unreachable,
        PlanOutcome::Solved(_) => Outcome::Fail,
    }
}
