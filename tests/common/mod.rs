#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated policy tree plus a fake evaluator script.
///
/// The fake evaluator follows the `test --all-namespaces -p ... <input>`
/// contract: it rejects any input containing `"deny":true` and appends its
/// arguments to `calls.log`.
pub struct TestEnv {
    _tmp: TempDir,
    pub policies: PathBuf,
    pub evaluator: PathBuf,
    pub calls_log: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let policies = tmp.path().join("policies");
        fs::create_dir_all(&policies).expect("create policy dir");
        let calls_log = tmp.path().join("calls.log");
        let evaluator = write_fake_evaluator(tmp.path(), &calls_log);

        Self {
            _tmp: tmp,
            policies,
            evaluator,
            calls_log,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("policy-tester");
        cmd.env_remove("POLICY_DIR")
            .env_remove("UTILS_REGO")
            .env_remove("POLICY_EVALUATOR")
            .env_remove("POLICY_TESTER_CONFIG")
            .env_remove("POLICY_TESTER_LOG");
        cmd
    }

    /// `run` preconfigured with the policy dir and fake evaluator.
    pub fn run_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("run")
            .arg("--policy-dir")
            .arg(&self.policies)
            .arg("--evaluator")
            .arg(&self.evaluator);
        cmd
    }

    pub fn run_json(&self, extra: &[&str]) -> (bool, Value) {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .arg("run")
            .arg("--policy-dir")
            .arg(&self.policies)
            .arg("--evaluator")
            .arg(&self.evaluator)
            .args(extra)
            .output()
            .expect("run binary");
        let value = serde_json::from_slice(&out.stdout).expect("valid json output");
        (out.status.success(), value)
    }

    pub fn add_policy(&self, rel: &str, fixture: Option<Value>) -> PathBuf {
        let policy = self.policies.join(rel);
        fs::create_dir_all(policy.parent().expect("policy parent")).expect("create policy subdir");
        fs::write(&policy, "package main\n").expect("write policy");
        if let Some(doc) = fixture {
            let stem = policy.file_stem().expect("policy stem").to_string_lossy();
            let mock = policy.with_file_name(format!("{stem}.mock.json"));
            let body = serde_json::to_string_pretty(&doc).expect("serialize fixture");
            fs::write(mock, body).expect("write fixture");
        }
        policy
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.calls_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(unix)]
fn write_fake_evaluator(dir: &Path, calls_log: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-conftest");
    let body = format!(
        r#"#!/bin/sh
echo "$@" >> '{log}'
for last; do :; done
if grep -q '"deny":true' "$last"; then exit 1; fi
exit 0
"#,
        log = calls_log.display()
    );
    fs::write(&script, body).expect("write fake evaluator");
    let mut perms = fs::metadata(&script).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod script");
    script
}

#[cfg(not(unix))]
fn write_fake_evaluator(dir: &Path, _calls_log: &Path) -> PathBuf {
    dir.join("fake-conftest")
}
