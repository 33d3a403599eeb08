/// Policy file extension used when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = "rego";

/// Suffix of the fixture file paired with each policy file.
pub const FIXTURE_SUFFIX: &str = ".mock.json";

/// Top-level fixture field holding the case buckets.
pub const MOCK_FIELD: &str = "mock";

pub const VALID_BUCKET: &str = "valid";
pub const INVALID_BUCKET: &str = "invalid";

/// Name given to a bucket that is itself one composite payload.
pub const DEFAULT_CASE_NAME: &str = "default";

/// Base-name keywords excluding helper and harness files from discovery.
pub const DEFAULT_SKIP_KEYWORDS: &[&str] = &["test", "utils"];

/// Top-level keys of a terraform plan document. A bucket carrying any of
/// them is one payload, not a map of sub-cases.
pub const DEFAULT_MARKER_FIELDS: &[&str] = &[
    "resource_changes",
    "configuration",
    "terraform_version",
    "planned_values",
    "output_changes",
    "format_version",
];

pub const DEFAULT_EVALUATOR: &str = "conftest";

pub const ENV_POLICY_DIR: &str = "POLICY_DIR";
pub const ENV_UTILS: &str = "UTILS_REGO";
pub const ENV_EVALUATOR: &str = "POLICY_EVALUATOR";
pub const ENV_CONFIG: &str = "POLICY_TESTER_CONFIG";
pub const ENV_LOG: &str = "POLICY_TESTER_LOG";
