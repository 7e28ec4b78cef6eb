//! Orchestrator for the complete push operation
//!
//! Coordinates the pipeline stages over a connected pair of instances and
//! collects their findings into a single [`PushReport`]. The planning stages
//! always run in full; the execution stage is skipped on a dry run, leaving
//! the report with the plan and everything the planning found.

use log::info;

use super::{discovery, execution, filtering, ordering, renaming, resolution};
use crate::config::PushSpec;
use crate::error::Result;
use crate::local::LocalCatalog;
use crate::model::{Action, PushReport};
use crate::remote::RemoteClient;
use crate::resolver::RemoteResolver;
use crate::version;

/// Plan the push of all matching templates and, unless `dry_run` is set,
/// execute the plan.
pub fn execute_push(
    local: &dyn LocalCatalog,
    remote: &dyn RemoteClient,
    spec: &PushSpec,
    dry_run: bool,
) -> Result<PushReport> {
    let compiled = spec.compile()?;

    let local_info = local.server_info()?;
    let remote_info = remote.server_info()?;
    info!(
        "Going to push templates from version {} ({}) to version {} ({})",
        local_info.version, local_info.url, remote_info.version, remote_info.url
    );

    let mut report = PushReport::default();
    if let Some(warning) = version::major_mismatch_warning(&local_info, &remote_info) {
        report.warnings.push(warning);
    }

    // Stage 1: Discovery
    let mut records = discovery::Discovery::new(local).execute(&compiled)?;
    report.stats.n_matched_templates = records.len();

    // Stage 2: Renaming
    renaming::execute(&compiled, &mut records);

    // Stage 3: Resolution
    let resolver = RemoteResolver::new(remote);
    resolution::execute(&resolver, &mut records, &mut report.warnings)?;

    // Stage 4: Filtering
    let records = filtering::filter_by_remote_folder(records, &mut report.errors);
    report.stats.n_with_remote_folder = records.len();
    filtering::report_missing_configurations(&records, &mut report.warnings);
    let mut records = filtering::filter_already_present(records, &mut report.actions);
    report.stats.n_not_existing_remotely = records.len();
    filtering::report_missing_referenced_templates(&records, &mut report.warnings);

    // Stage 5: Ordering
    ordering::execute(&mut records, &mut report.warnings);
    for record in records {
        report.actions.push(Action::Import { template: record });
    }

    // Stage 6: Execution
    if dry_run {
        info!(
            "Skipping execution of {} actions on a dry run",
            report.actions.len()
        );
    } else {
        info!(
            "Prepared an execution plan of {} actions, starting the execution",
            report.actions.len()
        );
        execution::execute(local, remote, &mut report);
        info!(
            "Finished the push, imported {} of {} matched local templates",
            report.stats.n_imported.unwrap_or(0),
            report.stats.n_matched_templates
        );
    }

    Ok(report)
}
