use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Verdict a case expects from the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Valid,
    Invalid,
}

impl Expectation {
    pub fn bucket_key(self) -> &'static str {
        match self {
            Expectation::Valid => crate::domain::constants::VALID_BUCKET,
            Expectation::Invalid => crate::domain::constants::INVALID_BUCKET,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Expectation::Valid => "VALID",
            Expectation::Invalid => "INVALID",
        }
    }

    pub fn expects_accept(self) -> bool {
        matches!(self, Expectation::Valid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub name: String,
    pub expectation: Expectation,
    pub payload: serde_json::Value,
}

impl TestCase {
    /// Sub-test label, e.g. `VALID CASE_caseA`.
    pub fn label(&self) -> String {
        format!("{} CASE_{}", self.expectation.label(), self.name)
    }
}

/// Cases of one fixture document, split by bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedCases {
    pub valid: Vec<TestCase>,
    pub invalid: Vec<TestCase>,
}

impl ClassifiedCases {
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Valid cases first, then invalid ones.
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.valid.iter().chain(self.invalid.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pass,
    Fail,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    /// Fully qualified sub-test name: `<policy>/<label>`.
    pub test: String,
    pub case: String,
    pub expectation: Expectation,
    /// Evaluator verdict; absent when the invocation itself failed.
    pub accepted: Option<bool>,
    pub status: CaseStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyReport {
    pub policy: String,
    pub fixture: String,
    pub cases: Vec<CaseOutcome>,
    /// Set when the fixture could not be classified; no cases ran.
    pub fatal: Option<String>,
}

impl PolicyReport {
    pub fn is_ok(&self) -> bool {
        self.fatal.is_none() && self.cases.iter().all(|c| c.status == CaseStatus::Pass)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub policies: usize,
    pub halted: usize,
    pub cases: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[PolicyReport]) -> Self {
        let mut summary = RunSummary {
            policies: reports.len(),
            ..RunSummary::default()
        };
        for report in reports {
            if report.fatal.is_some() {
                summary.halted += 1;
            }
            for case in &report.cases {
                summary.cases += 1;
                match case.status {
                    CaseStatus::Pass => summary.passed += 1,
                    CaseStatus::Fail => summary.failed += 1,
                    CaseStatus::Error => summary.errored += 1,
                }
            }
        }
        summary
    }

    pub fn is_ok(&self) -> bool {
        self.halted == 0 && self.failed == 0 && self.errored == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub policy_dir: String,
    pub evaluator: String,
    pub policies: Vec<PolicyReport>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListedCase {
    pub policy: String,
    pub case: String,
    pub expectation: Expectation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub policy_dir: String,
    pub cases: Vec<ListedCase>,
    /// Policy files whose fixtures failed to classify, with the reason.
    pub errors: Vec<ListError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListError {
    pub policy: String,
    pub error: String,
}
