use super::discover;
use crate::cli::SelectionArgs;
use crate::domain::models::{RunReport, RunSummary};
use crate::services::config::{resolve_run, resolve_selection, RunnerSection};
use crate::services::evaluator::{CommandEvaluator, Evaluator};
use crate::services::output::{case_line, print_json, summary_line};
use crate::services::runner::TestRunner;
use std::path::PathBuf;
use tracing::info;

/// Returns `Ok(true)` when every case passed and no policy halted.
pub fn handle_run(
    json: bool,
    selection: &SelectionArgs,
    evaluator: Option<String>,
    utils: Option<Vec<PathBuf>>,
    fail_fast: bool,
    file: &RunnerSection,
) -> anyhow::Result<bool> {
    let selection = resolve_selection(selection, file)?;
    let settings = resolve_run(selection, evaluator, utils, fail_fast, file);
    let discovered = discover(&settings.selection)?;
    info!(
        policies = discovered.policies.len(),
        utils = settings.utils.len(),
        evaluator = %settings.evaluator,
        "starting run"
    );

    let evaluator = CommandEvaluator::new(settings.evaluator.clone());
    let runner = TestRunner::new(&evaluator, &settings, discovered.root.clone());
    let policies = runner.run(&discovered.policies, |outcome| {
        if !json {
            println!("{}", case_line(outcome));
        }
    });

    let summary = RunSummary::from_reports(&policies);
    let ok = summary.is_ok();
    if json {
        let report = RunReport {
            policy_dir: discovered.root.to_string_lossy().to_string(),
            evaluator: evaluator.describe(),
            policies,
            summary,
        };
        print_json(ok, report)?;
    } else {
        for report in &policies {
            if let Some(fatal) = &report.fatal {
                println!("HALT\t{}\t{}", report.policy, fatal);
            }
        }
        println!("{}", summary_line(&summary));
    }
    Ok(ok)
}
