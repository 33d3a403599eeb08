//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — test case, outcome and report structs.
//! - `constants.rs` — stable defaults (marker fields, skip keywords, naming).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//!
//! ## Compatibility note
//! Report structs define the `--json` output. Keep schema-impacting changes
//! synchronized with `docs/contracts/run_report.schema.json`.

pub mod constants;
pub mod models;
