//! Test execution engine.

use crate::domain::models::{
    CaseOutcome, CaseStatus, ClassifiedCases, ListError, ListedCase, PolicyReport, TestCase,
};
use crate::services::config::{RunSettings, Selection};
use crate::services::evaluator::{Evaluator, EvaluatorError};
use crate::services::fixtures::{fixture_path_for, load_cases, FixtureError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes the payload to a temporary JSON file and asks the evaluator for
/// a verdict. The file is removed once the evaluator returns, whatever the
/// result.
pub fn run_case(
    evaluator: &dyn Evaluator,
    case: &TestCase,
    policies: &[PathBuf],
) -> Result<bool, EvaluatorError> {
    let payload = serde_json::to_vec(&case.payload).map_err(|source| EvaluatorError::Serialize {
        case: case.name.clone(),
        source,
    })?;
    let mut file = tempfile::Builder::new()
        .prefix("mock_json")
        .suffix(".json")
        .tempfile()
        .map_err(EvaluatorError::TempFile)?;
    file.write_all(&payload)
        .and_then(|_| file.flush())
        .map_err(EvaluatorError::TempFile)?;

    let verdict = evaluator.evaluate(policies, file.path());
    let path = file.path().to_path_buf();
    if let Err(err) = file.close() {
        warn!(path = %path.display(), error = %err, "failed to remove temporary payload file");
    }
    verdict
}

/// Short name for a policy: relative to the scanned root when possible.
pub fn display_name(root: &Path, policy: &Path) -> String {
    policy
        .strip_prefix(root)
        .unwrap_or(policy)
        .to_string_lossy()
        .to_string()
}

/// Loads fixture cases for a policy using the selection's classification rules.
pub fn classify_policy(
    selection: &Selection,
    policy: &Path,
) -> Result<ClassifiedCases, FixtureError> {
    load_cases(
        policy,
        &selection.extension,
        &selection.marker_fields,
        selection.fallback,
    )
}

/// Runs the valid/invalid cases of each policy file, one evaluator call at a time.
pub struct TestRunner<'a> {
    evaluator: &'a dyn Evaluator,
    settings: &'a RunSettings,
    root: PathBuf,
}

impl<'a> TestRunner<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, settings: &'a RunSettings, root: PathBuf) -> Self {
        Self {
            evaluator,
            settings,
            root,
        }
    }

    /// Runs every policy in order. `on_case` sees each outcome as soon as
    /// it is known. With fail-fast, stops after the first non-passing case
    /// or halted policy.
    pub fn run(
        &self,
        policies: &[PathBuf],
        mut on_case: impl FnMut(&CaseOutcome),
    ) -> Vec<PolicyReport> {
        let mut reports = Vec::new();
        for policy in policies {
            let report = self.run_policy(policy, &mut on_case);
            let stop = self.settings.fail_fast && !report.is_ok();
            reports.push(report);
            if stop {
                info!("fail-fast: stopping after first failure");
                break;
            }
        }
        reports
    }

    pub fn run_policy(&self, policy: &Path, emit: &mut dyn FnMut(&CaseOutcome)) -> PolicyReport {
        let name = display_name(&self.root, policy);
        let extension = &self.settings.selection.extension;
        let fixture = display_name(&self.root, &fixture_path_for(policy, extension));
        let cases = match classify_policy(&self.settings.selection, policy) {
            Ok(cases) => cases,
            Err(err) => {
                warn!(policy = %name, error = %err, "policy halted: fixture unusable");
                return PolicyReport {
                    policy: name,
                    fixture,
                    cases: Vec::new(),
                    fatal: Some(err.to_string()),
                };
            }
        };
        if cases.is_empty() {
            warn!(policy = %name, "fixture yielded no cases");
        }

        let mut inputs = self.settings.utils.clone();
        inputs.push(policy.to_path_buf());

        let mut outcomes = Vec::with_capacity(cases.len());
        for case in cases.iter() {
            let outcome = self.run_one(&name, case, &inputs);
            emit(&outcome);
            let stop = self.settings.fail_fast && outcome.status != CaseStatus::Pass;
            outcomes.push(outcome);
            if stop {
                break;
            }
        }

        PolicyReport {
            policy: name,
            fixture,
            cases: outcomes,
            fatal: None,
        }
    }

    fn run_one(&self, policy_name: &str, case: &TestCase, inputs: &[PathBuf]) -> CaseOutcome {
        let label = case.label();
        let test = format!("{policy_name}/{label}");
        let (accepted, status, error) = match run_case(self.evaluator, case, inputs) {
            Ok(accepted) if accepted == case.expectation.expects_accept() => {
                (Some(accepted), CaseStatus::Pass, None)
            }
            Ok(accepted) => (Some(accepted), CaseStatus::Fail, None),
            Err(err) => (None, CaseStatus::Error, Some(err.to_string())),
        };
        match status {
            CaseStatus::Pass => info!(test = %test, "pass"),
            CaseStatus::Fail => warn!(test = %test, accepted = ?accepted, "verdict mismatch"),
            CaseStatus::Error => warn!(test = %test, error = ?error, "case errored"),
        }
        CaseOutcome {
            test,
            case: label,
            expectation: case.expectation,
            accepted,
            status,
            error,
        }
    }
}

/// Classifies every policy without invoking the evaluator.
pub fn list_cases(
    selection: &Selection,
    root: &Path,
    policies: &[PathBuf],
) -> (Vec<ListedCase>, Vec<ListError>) {
    let mut listed = Vec::new();
    let mut errors = Vec::new();
    for policy in policies {
        let name = display_name(root, policy);
        match classify_policy(selection, policy) {
            Ok(cases) => {
                for case in cases.iter() {
                    listed.push(ListedCase {
                        policy: name.clone(),
                        case: case.label(),
                        expectation: case.expectation,
                    });
                }
            }
            Err(err) => errors.push(ListError {
                policy: name,
                error: err.to_string(),
            }),
        }
    }
    (listed, errors)
}
