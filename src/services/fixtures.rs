//! Fixture loading and valid/invalid case classification.
//!
//! Two fixture authoring styles are in use and both stay supported:
//! explicit `mock.valid` / `mock.invalid` buckets, and older fixtures that
//! put named cases straight under `mock` and rely on name prefixes.

use crate::cli::FallbackMode;
use crate::domain::constants::{DEFAULT_CASE_NAME, FIXTURE_SUFFIX, INVALID_BUCKET, MOCK_FIELD};
use crate::domain::models::{ClassifiedCases, Expectation, TestCase};
use crate::services::discovery::has_extension;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("policy file {0} does not exist")]
    PolicyMissing(PathBuf),
    #[error("file {path} is not a .{extension} file")]
    WrongExtension { path: PathBuf, extension: String },
    #[error("mock file {0} does not exist")]
    FixtureMissing(PathBuf),
    #[error("failed to read mock file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse mock file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("mock file {0} is not a JSON object")]
    NotAnObject(PathBuf),
    #[error("mock field not found in {0}")]
    MockMissing(PathBuf),
    #[error("mock field in {0} is not an object")]
    MockNotObject(PathBuf),
    #[error("{bucket} field in mock of {fixture} is not an object")]
    BucketNotObject {
        bucket: &'static str,
        fixture: PathBuf,
    },
}

/// How a bucket's cases were located.
#[derive(Debug, PartialEq)]
pub enum BucketShape<'a> {
    /// The bucket holds a marker field and is one payload.
    Composite(&'a Value),
    /// The bucket maps sub-case names to payloads.
    Named(&'a Map<String, Value>),
    /// No bucket field; entries picked from `mock` by name prefix.
    Fallback(Vec<(&'a str, &'a Value)>),
}

impl BucketShape<'_> {
    pub fn into_cases(self, expectation: Expectation) -> Vec<TestCase> {
        let case = |name: &str, payload: &Value| TestCase {
            name: name.to_string(),
            expectation,
            payload: payload.clone(),
        };
        let mut cases: Vec<TestCase> = match self {
            BucketShape::Composite(payload) => vec![case(DEFAULT_CASE_NAME, payload)],
            BucketShape::Named(map) => map.iter().map(|(k, v)| case(k.as_str(), v)).collect(),
            BucketShape::Fallback(entries) => {
                entries.into_iter().map(|(k, v)| case(k, v)).collect()
            }
        };
        cases.sort_by(|a, b| a.name.cmp(&b.name));
        cases
    }
}

/// `dir/name.<ext>` → `dir/name.mock.json`.
pub fn fixture_path_for(policy: &Path, extension: &str) -> PathBuf {
    let name = match policy.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::new(),
    };
    let suffix = format!(".{extension}");
    let stem = name.strip_suffix(&suffix).unwrap_or(&name);
    policy.with_file_name(format!("{stem}{FIXTURE_SUFFIX}"))
}

/// Loads and classifies the fixture paired with `policy`.
pub fn load_cases(
    policy: &Path,
    extension: &str,
    markers: &[String],
    fallback: FallbackMode,
) -> Result<ClassifiedCases, FixtureError> {
    if !policy.exists() {
        return Err(FixtureError::PolicyMissing(policy.to_path_buf()));
    }
    if !has_extension(policy, extension) {
        return Err(FixtureError::WrongExtension {
            path: policy.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    let fixture = fixture_path_for(policy, extension);
    if !fixture.exists() {
        return Err(FixtureError::FixtureMissing(fixture));
    }
    let raw = std::fs::read(&fixture).map_err(|source| FixtureError::Read {
        path: fixture.clone(),
        source,
    })?;
    let doc: Value = serde_json::from_slice(&raw).map_err(|source| FixtureError::Parse {
        path: fixture.clone(),
        source,
    })?;
    classify(&doc, markers, fallback, &fixture)
}

/// Splits a parsed fixture document into valid and invalid cases.
pub fn classify(
    doc: &Value,
    markers: &[String],
    fallback: FallbackMode,
    fixture: &Path,
) -> Result<ClassifiedCases, FixtureError> {
    let root = doc
        .as_object()
        .ok_or_else(|| FixtureError::NotAnObject(fixture.to_path_buf()))?;
    let mock = root
        .get(MOCK_FIELD)
        .ok_or_else(|| FixtureError::MockMissing(fixture.to_path_buf()))?
        .as_object()
        .ok_or_else(|| FixtureError::MockNotObject(fixture.to_path_buf()))?;

    let valid = resolve_bucket(mock, Expectation::Valid, markers, fallback, fixture)?
        .into_cases(Expectation::Valid);
    let invalid = resolve_bucket(mock, Expectation::Invalid, markers, fallback, fixture)?
        .into_cases(Expectation::Invalid);
    debug!(
        fixture = %fixture.display(),
        valid = valid.len(),
        invalid = invalid.len(),
        "classified fixture"
    );
    Ok(ClassifiedCases { valid, invalid })
}

/// Ordered decision list: explicit bucket as composite payload, explicit
/// bucket as named map, then prefix fallback over `mock`.
pub fn resolve_bucket<'a>(
    mock: &'a Map<String, Value>,
    expectation: Expectation,
    markers: &[String],
    fallback: FallbackMode,
    fixture: &Path,
) -> Result<BucketShape<'a>, FixtureError> {
    let key = expectation.bucket_key();
    if let Some(field) = mock.get(key) {
        let Some(bucket) = field.as_object() else {
            return Err(FixtureError::BucketNotObject {
                bucket: key,
                fixture: fixture.to_path_buf(),
            });
        };
        if markers.iter().any(|m| bucket.contains_key(m)) {
            return Ok(BucketShape::Composite(field));
        }
        return Ok(BucketShape::Named(bucket));
    }

    let mut entries = Vec::new();
    for (name, value) in mock {
        if name.starts_with(key) {
            entries.push((name.as_str(), value));
            continue;
        }
        let loose_valid = expectation == Expectation::Valid
            && fallback == FallbackMode::Compatible
            && !name.starts_with(INVALID_BUCKET);
        if loose_valid {
            warn!(
                fixture = %fixture.display(),
                entry = %name,
                "treating unprefixed mock entry as a valid case"
            );
            entries.push((name.as_str(), value));
        }
    }
    Ok(BucketShape::Fallback(entries))
}
