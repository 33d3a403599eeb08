use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::constants::{ENV_CONFIG, ENV_EVALUATOR, ENV_POLICY_DIR, ENV_UTILS};

#[derive(Parser, Debug)]
#[command(
    name = "policy-tester",
    version,
    about = "Run valid/invalid fixture cases for policy files against an external evaluator"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = ENV_CONFIG,
        help = "TOML config file with a [runner] section"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every fixture case and report one sub-test per case.
    Run {
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(
            long,
            env = ENV_EVALUATOR,
            help = "Evaluator program invoked as `<evaluator> test --all-namespaces`"
        )]
        evaluator: Option<String>,
        #[arg(
            long,
            env = ENV_UTILS,
            value_delimiter = ',',
            help = "Comma-separated helper policy files passed to every invocation"
        )]
        utils: Option<Vec<PathBuf>>,
        #[arg(long, help = "Stop at the first failing case")]
        fail_fast: bool,
    },
    /// Print discovered cases without invoking the evaluator.
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Discovery and classification options shared by `run` and `list`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    #[arg(
        long,
        env = ENV_POLICY_DIR,
        help = "Root directory scanned for policy files"
    )]
    pub policy_dir: Option<PathBuf>,
    #[arg(long, help = "Policy file extension (default: rego)")]
    pub extension: Option<String>,
    #[arg(
        long = "skip-keyword",
        help = "Skip policy files whose name contains this keyword (repeatable)"
    )]
    pub skip_keywords: Vec<String>,
    #[arg(
        long = "marker-field",
        help = "Field marking a bucket as one composite payload (repeatable)"
    )]
    pub marker_fields: Vec<String>,
    #[arg(long, value_enum, help = "Case selection when a bucket is absent")]
    pub fallback: Option<FallbackMode>,
    #[arg(long, help = "Only run policies whose relative path contains this")]
    pub filter: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Valid bucket takes every entry not prefixed `invalid`.
    #[default]
    Compatible,
    /// Valid bucket takes only entries prefixed `valid`.
    Strict,
}
