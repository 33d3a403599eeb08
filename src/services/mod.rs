//! Service layer containing discovery, classification and execution logic.
//!
//! ## Service map
//! - `config.rs` — CLI/env/config-file merge into run settings.
//! - `discovery.rs` — recursive policy file scan.
//! - `fixtures.rs` — fixture loading and valid/invalid classification.
//! - `evaluator.rs` — `Evaluator` capability + subprocess implementation.
//! - `runner.rs` — per-case execution and per-policy aggregation.
//! - `output.rs` — JSON/text output helpers.
//! - `logging.rs` — tracing subscriber setup.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod discovery;
pub mod evaluator;
pub mod fixtures;
pub mod logging;
pub mod output;
pub mod runner;
