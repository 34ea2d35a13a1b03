use std::collections::BTreeMap;

use crate::outcome::Outcome;
use crate::run::RunOutcome;

#[derive(Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub runs: usize,
    pub success: usize,
    pub fail: usize,
    pub unreachable: usize,
    pub error: usize,
    pub avg_iterations: Option<f64>,
    pub check_pass_rates: BTreeMap<String, (usize, usize)>,
}

impl ReportSummary {
    pub fn all_succeeded(&self) -> bool {
        self.success == self.runs
    }
}

pub fn aggregate(runs: &[RunOutcome]) -> ReportSummary {
    let mut summary = ReportSummary::default();
    let mut solved = 0usize;

    for run in runs {
        summary.runs += 1;
        match run.outcome {
            Outcome::Success => summary.success += 1,
            Outcome::Fail => summary.fail += 1,
            Outcome::Unreachable => summary.unreachable += 1,
            Outcome::Error => summary.error += 1,
        }

        if let Some(iterations) = run.iterations {
            solved += 1;
            summary.avg_iterations = Some(match summary.avg_iterations {
                None => iterations as f64,
                Some(avg) => {
                    let total = avg * (solved as f64 - 1.0) + iterations as f64;
                    total / solved as f64
                }
            });
        }

        for check in &run.checks {
            let entry = summary
                .check_pass_rates
                .entry(check.label.clone())
                .or_insert((0, 0));
            if check.passed {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
    }

    summary
}
