//! Check execution and outcome recording.
//!
//! Evaluates a case's checks against the plan produced for its grid. Checks
//! that need a walked path fail when the reachability gate stopped planning.

use serde::Serialize;
use tracing::{debug, instrument};

use gridworld::{PlanOutcome, Position};

use crate::case::Check;

/// Collected check outcomes for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgment {
    pub checks: Vec<CheckOutcome>,
}

impl Judgment {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }
}

/// Result of running a single check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub label: String,
    pub passed: bool,
    #[serde(flatten)]
    pub detail: CheckDetail,
}

/// What a check observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckDetail {
    PathExists {
        expected: bool,
        actual: bool,
    },
    ReachesGoal {
        last: Option<Position>,
    },
    PathLength {
        expected: usize,
        actual: Option<usize>,
    },
    Avoids {
        touched: Vec<Position>,
    },
    VisitsAny {
        visited: Vec<Position>,
    },
    ValueAt {
        cell: Position,
        expected: f64,
        actual: Option<f64>,
    },
    Converged {
        iterations: Option<usize>,
    },
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Run all checks against `outcome` and collect the results.
#[instrument(skip_all, fields(check_count = checks.len()))]
pub fn run_checks(checks: &[Check], outcome: &PlanOutcome) -> Judgment {
    let plan = match outcome {
        PlanOutcome::Solved(plan) => Some(plan),
        PlanOutcome::Unreachable { .. } => None,
    };
    let path = plan.map(|plan| plan.path.as_slice());

    let mut outcomes = Vec::with_capacity(checks.len());
    for check in checks {
        let (passed, detail) = match check {
            Check::PathExists { expected } => {
                let actual = plan.is_some();
                (
                    actual == *expected,
                    CheckDetail::PathExists {
                        expected: *expected,
                        actual,
                    },
                )
            }
            Check::ReachesGoal => {
                let last = path.and_then(|path| path.last().copied());
                (
                    plan.is_some_and(|plan| plan.complete),
                    CheckDetail::ReachesGoal { last },
                )
            }
            Check::PathLength { expected } => {
                let actual = path.map(<[Position]>::len);
                (
                    actual == Some(*expected),
                    CheckDetail::PathLength {
                        expected: *expected,
                        actual,
                    },
                )
            }
            Check::Avoids { cells } => {
                let touched = touched_cells(path.unwrap_or_default(), cells);
                (
                    path.is_some() && touched.is_empty(),
                    CheckDetail::Avoids { touched },
                )
            }
            Check::VisitsAny { cells } => {
                let visited = touched_cells(path.unwrap_or_default(), cells);
                (!visited.is_empty(), CheckDetail::VisitsAny { visited })
            }
            Check::ValueAt {
                cell,
                expected,
                tolerance,
            } => {
                let actual = plan.and_then(|plan| plan.solution.values.get(*cell));
                (
                    actual.is_some_and(|value| (value - expected).abs() <= *tolerance),
                    CheckDetail::ValueAt {
                        cell: *cell,
                        expected: *expected,
                        actual,
                    },
                )
            }
            Check::Converged => (
                plan.is_some_and(|plan| plan.solution.converged),
                CheckDetail::Converged {
                    iterations: plan.map(|plan| plan.solution.iterations),
                },
            ),
        };
        let label = check.label();
        debug!(check = %label, passed, "check result");
        outcomes.push(CheckOutcome {
            label,
            passed,
            detail,
        });
    }
    Judgment { checks: outcomes }
}

fn touched_cells(path: &[Position], cells: &[Position]) -> Vec<Position> {
    cells
        .iter()
        .copied()
        .filter(|cell| path.contains(cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridworld::test_support::{ENCLOSED_5X5, OPEN_5X5, WALL_5X5, grid};
    use gridworld::{SolveParams, plan};

    fn outcome(layout: &[&str]) -> PlanOutcome {
        plan(&grid(layout), &SolveParams::default()).expect("plan")
    }

    #[test]
    fn open_grid_checks_pass() {
        let checks = vec![
            Check::PathExists { expected: true },
            Check::ReachesGoal,
            Check::PathLength { expected: 9 },
            Check::ValueAt {
                cell: Position::new(0, 0),
                expected: 0.27,
                tolerance: 0.005,
            },
            Check::Converged,
        ];
        let judgment = run_checks(&checks, &outcome(&OPEN_5X5));
        assert!(judgment.all_passed(), "{judgment:?}");
    }

    #[test]
    fn avoids_and_visits_any_report_touched_cells() {
        let checks = vec![
            Check::Avoids {
                cells: vec![Position::new(0, 2), Position::new(0, 0)],
            },
            Check::VisitsAny {
                cells: vec![Position::new(3, 2), Position::new(4, 2)],
            },
        ];
        let judgment = run_checks(&checks, &outcome(&WALL_5X5));

        let avoids = &judgment.checks[0];
        assert!(!avoids.passed);
        assert_eq!(
            avoids.detail,
            CheckDetail::Avoids {
                touched: vec![Position::new(0, 0)]
            }
        );
        assert!(judgment.checks[1].passed);
    }

    #[test]
    fn unreachable_plan_fails_path_checks() {
        let checks = vec![
            Check::PathExists { expected: false },
            Check::ReachesGoal,
            Check::Avoids {
                cells: vec![Position::new(1, 1)],
            },
            Check::ValueAt {
                cell: Position::new(4, 4),
                expected: 1.0,
                tolerance: 0.005,
            },
            Check::Converged,
        ];
        let judgment = run_checks(&checks, &outcome(&ENCLOSED_5X5));
        let passed: Vec<bool> = judgment.checks.iter().map(CheckOutcome::passed).collect();
        assert_eq!(passed, vec![true, false, false, false, false]);
        assert_eq!(
            judgment.checks[3].detail,
            CheckDetail::ValueAt {
                cell: Position::new(4, 4),
                expected: 1.0,
                actual: None,
            }
        );
    }

    #[test]
    fn value_within_tolerance_passes() {
        let checks = vec![Check::ValueAt {
            cell: Position::new(2, 4),
            expected: 0.857,
            tolerance: 0.005,
        }];
        let judgment = run_checks(&checks, &outcome(&OPEN_5X5));
        assert!(judgment.all_passed(), "{judgment:?}");
    }

    #[test]
    fn outcome_serializes_with_type_tag() {
        let judgment = run_checks(&[Check::Converged], &outcome(&OPEN_5X5));
        let value = serde_json::to_value(&judgment).expect("json");
        assert_eq!(value["checks"][0]["type"], "converged");
        assert_eq!(value["checks"][0]["label"], "converged");
        assert_eq!(value["checks"][0]["passed"], true);
    }
}
