use crate::domain::models::{CaseOutcome, CaseStatus, JsonOut, RunSummary};
use serde::Serialize;

pub fn print_json<T: Serialize>(ok: bool, data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    Ok(())
}

pub fn case_line(outcome: &CaseOutcome) -> String {
    let tag = match outcome.status {
        CaseStatus::Pass => "PASS",
        CaseStatus::Fail => "FAIL",
        CaseStatus::Error => "ERROR",
    };
    let mut line = format!("{tag}\t{}", outcome.test);
    match (&outcome.status, outcome.accepted, &outcome.error) {
        (CaseStatus::Fail, Some(accepted), _) => {
            let verdict = if accepted { "accepted" } else { "rejected" };
            line.push_str(&format!("\t(evaluator {verdict} input)"));
        }
        (CaseStatus::Error, _, Some(err)) => line.push_str(&format!("\t{err}")),
        _ => {}
    }
    line
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "{} policies ({} halted), {} cases: {} passed, {} failed, {} errors",
        summary.policies,
        summary.halted,
        summary.cases,
        summary.passed,
        summary.failed,
        summary.errored
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Expectation;

    #[test]
    fn failing_case_line_names_the_verdict() {
        let outcome = CaseOutcome {
            test: "s3.rego/INVALID CASE_public".to_string(),
            case: "INVALID CASE_public".to_string(),
            expectation: Expectation::Invalid,
            accepted: Some(true),
            status: CaseStatus::Fail,
            error: None,
        };
        assert_eq!(
            case_line(&outcome),
            "FAIL\ts3.rego/INVALID CASE_public\t(evaluator accepted input)"
        );
    }

    #[test]
    fn summary_line_reports_all_counts() {
        let summary = RunSummary {
            policies: 3,
            halted: 1,
            cases: 4,
            passed: 2,
            failed: 1,
            errored: 1,
        };
        assert_eq!(
            summary_line(&summary),
            "3 policies (1 halted), 4 cases: 2 passed, 1 failed, 1 errors"
        );
    }
}
