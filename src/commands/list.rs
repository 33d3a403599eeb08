use super::discover;
use crate::cli::SelectionArgs;
use crate::domain::models::ListReport;
use crate::services::config::{resolve_selection, RunnerSection};
use crate::services::output::print_json;
use crate::services::runner::list_cases;

/// Returns `Ok(false)` when any fixture failed to classify.
pub fn handle_list(
    json: bool,
    selection: &SelectionArgs,
    file: &RunnerSection,
) -> anyhow::Result<bool> {
    let selection = resolve_selection(selection, file)?;
    let discovered = discover(&selection)?;
    let (cases, errors) = list_cases(&selection, &discovered.root, &discovered.policies);
    let ok = errors.is_empty();

    if json {
        let report = ListReport {
            policy_dir: discovered.root.to_string_lossy().to_string(),
            cases,
            errors,
        };
        print_json(ok, report)?;
    } else {
        for case in &cases {
            println!("{}/{}", case.policy, case.case);
        }
        for err in &errors {
            println!("HALT\t{}\t{}", err.policy, err.error);
        }
    }
    Ok(ok)
}
