//! External evaluator invocation.
//!
//! The evaluator is a black box: it takes policy files and one input
//! document and either accepts (exit code 0) or rejects (any other exit
//! code). Output is logged, never interpreted.

use crate::services::discovery::absolutize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum EvaluatorError {
    #[error("failed to resolve path {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch evaluator `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("evaluator `{program}` was terminated without an exit code")]
    Terminated { program: String },
    #[error("failed to serialize payload for case {case}: {source}")]
    Serialize {
        case: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write temporary payload file: {0}")]
    TempFile(#[source] std::io::Error),
}

/// Capability to accept or reject one input document against policy files.
pub trait Evaluator {
    /// `Ok(true)` when the evaluator accepts `input`.
    fn evaluate(&self, policies: &[PathBuf], input: &Path) -> Result<bool, EvaluatorError>;

    /// Name used in reports.
    fn describe(&self) -> String;
}

/// Runs `<program> test --all-namespaces -p <policy>... <input>`.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: String,
}

impl CommandEvaluator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(&self, policies: &[PathBuf], input: &Path) -> Result<Vec<String>, EvaluatorError> {
        let mut args = vec!["test".to_string(), "--all-namespaces".to_string()];
        for policy in policies {
            args.push("-p".to_string());
            args.push(abs_string(policy)?);
        }
        args.push(abs_string(input)?);
        Ok(args)
    }
}

fn abs_string(path: &Path) -> Result<String, EvaluatorError> {
    let abs = absolutize(path).map_err(|source| EvaluatorError::Path {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(abs.to_string_lossy().to_string())
}

impl Evaluator for CommandEvaluator {
    fn evaluate(&self, policies: &[PathBuf], input: &Path) -> Result<bool, EvaluatorError> {
        let args = self.args(policies, input)?;
        debug!(program = %self.program, args = ?args, "invoking evaluator");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| EvaluatorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let Some(code) = output.status.code() else {
            return Err(EvaluatorError::Terminated {
                program: self.program.clone(),
            });
        };
        debug!(
            code,
            stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
            "evaluator finished"
        );
        Ok(code == 0)
    }

    fn describe(&self) -> String {
        self.program.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_test_all_namespaces_contract() {
        let eval = CommandEvaluator::new("conftest");
        let args = eval
            .args(
                &[PathBuf::from("/lib/utils.rego"), PathBuf::from("/p/s3.rego")],
                Path::new("/tmp/mock_json1.json"),
            )
            .unwrap();
        assert_eq!(
            args,
            vec![
                "test",
                "--all-namespaces",
                "-p",
                "/lib/utils.rego",
                "-p",
                "/p/s3.rego",
                "/tmp/mock_json1.json"
            ]
        );
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let eval = CommandEvaluator::new("conftest");
        let args = eval
            .args(&[PathBuf::from("rel/p.rego")], Path::new("in.json"))
            .unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(args[3], cwd.join("rel/p.rego").to_string_lossy());
        assert_eq!(args[4], cwd.join("in.json").to_string_lossy());
    }

    #[test]
    fn missing_program_is_a_launch_error_not_a_rejection() {
        let eval = CommandEvaluator::new("policy-tester-no-such-evaluator-binary");
        let err = eval
            .evaluate(&[PathBuf::from("/p.rego")], Path::new("/in.json"))
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_maps_to_verdict() {
        assert!(CommandEvaluator::new("true")
            .evaluate(&[], Path::new("/in.json"))
            .unwrap());
        assert!(!CommandEvaluator::new("false")
            .evaluate(&[], Path::new("/in.json"))
            .unwrap());
    }
}
