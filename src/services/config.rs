use crate::cli::{FallbackMode, SelectionArgs};
use crate::domain::constants::{
    DEFAULT_EVALUATOR, DEFAULT_EXTENSION, DEFAULT_MARKER_FIELDS, DEFAULT_SKIP_KEYWORDS,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("policy directory not set (use --policy-dir, POLICY_DIR or runner.policy_dir)")]
    MissingPolicyDir,
    #[error("policy file extension must not be empty")]
    EmptyExtension,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RunnerSection {
    #[serde(default)]
    pub policy_dir: Option<PathBuf>,
    #[serde(default)]
    pub utils: Vec<PathBuf>,
    #[serde(default)]
    pub evaluator: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub skip_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub marker_fields: Option<Vec<String>>,
    #[serde(default)]
    pub fallback: Option<FallbackMode>,
}

/// What to discover and how to classify it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub policy_dir: PathBuf,
    pub extension: String,
    pub skip_keywords: Vec<String>,
    pub marker_fields: Vec<String>,
    pub fallback: FallbackMode,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub selection: Selection,
    pub evaluator: String,
    pub utils: Vec<PathBuf>,
    pub fail_fast: bool,
}

/// Loads the optional config file. Relative paths inside it resolve against
/// the file's own directory.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let runner = &mut config.runner;
    if let Some(dir) = runner.policy_dir.take() {
        runner.policy_dir = Some(anchor(base, dir));
    }
    runner.utils = std::mem::take(&mut runner.utils)
        .into_iter()
        .map(|p| anchor(base, p))
        .collect();
    Ok(config)
}

fn anchor(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merges CLI/env values (already combined by clap) over the config file
/// and built-in defaults.
pub fn resolve_selection(
    args: &SelectionArgs,
    file: &RunnerSection,
) -> Result<Selection, ConfigError> {
    let policy_dir = args
        .policy_dir
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| file.policy_dir.clone())
        .ok_or(ConfigError::MissingPolicyDir)?;

    let extension = args
        .extension
        .clone()
        .or_else(|| file.extension.clone())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let extension = extension.trim_start_matches('.').to_string();
    if extension.is_empty() {
        return Err(ConfigError::EmptyExtension);
    }

    let skip_keywords = pick_list(
        &args.skip_keywords,
        &file.skip_keywords,
        DEFAULT_SKIP_KEYWORDS,
    );
    let marker_fields = pick_list(
        &args.marker_fields,
        &file.marker_fields,
        DEFAULT_MARKER_FIELDS,
    );

    Ok(Selection {
        policy_dir,
        extension,
        skip_keywords,
        marker_fields,
        fallback: args.fallback.or(file.fallback).unwrap_or_default(),
        filter: args.filter.clone(),
    })
}

pub fn resolve_run(
    selection: Selection,
    evaluator: Option<String>,
    utils: Option<Vec<PathBuf>>,
    fail_fast: bool,
    file: &RunnerSection,
) -> RunSettings {
    let evaluator = evaluator
        .filter(|e| !e.trim().is_empty())
        .or_else(|| file.evaluator.clone())
        .unwrap_or_else(|| DEFAULT_EVALUATOR.to_string());
    let utils = utils
        .unwrap_or_else(|| file.utils.clone())
        .into_iter()
        .filter(|p| !p.as_os_str().is_empty())
        .collect();

    RunSettings {
        selection,
        evaluator,
        utils,
        fail_fast,
    }
}

fn pick_list(cli: &[String], file: &Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    if !cli.is_empty() {
        return cli.to_vec();
    }
    match file {
        Some(values) => values.clone(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}
