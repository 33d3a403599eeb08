//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `run.rs` — evaluate every case and report sub-tests.
//! - `list.rs` — show discovered cases without evaluating.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod list;
pub mod run;

pub use list::handle_list;
pub use run::handle_run;

use crate::services::config::Selection;
use crate::services::discovery::{absolutize, discover_policies};
use crate::services::runner::display_name;
use anyhow::Context;
use std::path::PathBuf;

/// Absolute scan root plus the policy files selected under it.
pub struct Discovered {
    pub root: PathBuf,
    pub policies: Vec<PathBuf>,
}

pub fn discover(selection: &Selection) -> anyhow::Result<Discovered> {
    let root = absolutize(&selection.policy_dir).with_context(|| {
        format!(
            "failed to get absolute path of {}",
            selection.policy_dir.display()
        )
    })?;
    let mut policies = discover_policies(&root, &selection.extension, &selection.skip_keywords)
        .context("failed to walk through policy directory")?;
    if let Some(filter) = &selection.filter {
        policies.retain(|p| display_name(&root, p).contains(filter.as_str()));
    }
    Ok(Discovered { root, policies })
}
