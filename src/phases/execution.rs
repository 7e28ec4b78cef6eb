//! Stage 6: Execution
//!
//! Runs the import actions of the plan against the target instance, in plan
//! order. For every import the template document is fetched again from the
//! source, attachments and triggers are stripped with a warning, and every
//! known identifier reference is rewritten to its counterpart on the target
//! before the document is uploaded.
//!
//! Identifiers produced by earlier imports of the same run are fed forward,
//! so a create-release reference to a template imported moments ago already
//! points at the right place. A failed import is recorded as an error and
//! the run continues with the next action.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::local::LocalCatalog;
use crate::model::{Action, PushReport, TemplateRecord, ROOT_FOLDER_ID};
use crate::path;
use crate::remote::RemoteClient;

/// Import warning emitted because the archive carries no team permissions.
/// It shows up on every import, so it is filtered out of the report.
const TEAM_PERMISSION_WARNING: &str = "Teams in this template have been removed.";

pub fn execute(local: &dyn LocalCatalog, remote: &dyn RemoteClient, report: &mut PushReport) {
    let PushReport {
        warnings,
        errors,
        actions,
        stats,
    } = report;

    let mut imported_ids: HashMap<String, String> = HashMap::new();
    let mut n_imported = 0;
    let mut n_failed = 0;
    for action in actions.iter_mut() {
        let template = match action {
            Action::Import { template } => template,
            Action::Noop { .. } => continue,
        };
        for reference in &mut template.referenced_templates {
            if reference.remote_template_id.is_none() {
                if let Some(remote_id) = imported_ids.get(&reference.id) {
                    reference.remote_template_id = Some(remote_id.clone());
                }
            }
        }
        match import_template(local, remote, template, warnings) {
            Ok(remote_id) => {
                imported_ids.insert(template.id.clone(), remote_id.clone());
                template.remote_template_id = Some(remote_id);
                n_imported += 1;
            }
            Err(error) => {
                errors.push(format!(
                    "Could not import template [{}]({}): {}",
                    template.path, template.id, error
                ));
                n_failed += 1;
            }
        }
    }
    stats.n_imported = Some(n_imported);
    stats.n_failed_import = Some(n_failed);
}

fn import_template(
    local: &dyn LocalCatalog,
    remote: &dyn RemoteClient,
    template: &TemplateRecord,
    warnings: &mut Vec<String>,
) -> Result<String> {
    let mut handle = local.template(&template.id)?.ok_or_else(|| Error::MissingTemplate {
        id: template.id.clone(),
    })?;

    let attachments = handle.strip_attachments();
    if attachments > 0 {
        warnings.push(format!(
            "Skipping export of {} attachments of template [{}]({}) \
             as attachments are not migrated",
            attachments, handle.title, handle.id
        ));
    }
    let triggers = handle.strip_triggers();
    if triggers > 0 {
        warnings.push(format!(
            "Template [{}]({}) has {} triggers, enable them manually after the import",
            handle.title, handle.id, triggers
        ));
    }

    let mut replacements: HashMap<&str, &str> = HashMap::new();
    for configuration in &template.referenced_configurations {
        if let Some(remote_id) = configuration.remote_configuration_id.as_deref() {
            replacements.insert(configuration.id.as_str(), remote_id);
        }
    }
    for reference in &template.referenced_templates {
        if let Some(remote_id) = reference.remote_template_id.as_deref() {
            replacements.insert(reference.id.as_str(), remote_id);
        }
    }
    rewrite_identifiers(&mut handle.document, &replacements);

    let body = handle.to_wire()?;
    let folder_id = template
        .remote_folder_id
        .as_deref()
        .filter(|folder| *folder != ROOT_FOLDER_ID);
    let outcome = remote.import_template(folder_id, &body)?;

    let import_warnings: Vec<&str> = outcome
        .warnings
        .iter()
        .map(String::as_str)
        .filter(|warning| !warning.starts_with(TEAM_PERMISSION_WARNING))
        .collect();
    if !import_warnings.is_empty() {
        warnings.push(format!(
            "Got the following warnings when importing template [{}]: {:?}",
            template.path, import_warnings
        ));
    }

    Ok(public_template_id(&outcome.id))
}

/// Replace every string value that is a known identifier, whole values only.
/// Identifiers are compared without their leading slash.
fn rewrite_identifiers(value: &mut Value, replacements: &HashMap<&str, &str>) {
    match value {
        Value::String(text) => {
            if let Some(remote_id) = replacements.get(path::normalize_id(text)) {
                *text = (*remote_id).to_string();
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_identifiers(item, replacements);
            }
        }
        Value::Object(fields) => {
            for field in fields.values_mut() {
                rewrite_identifiers(field, replacements);
            }
        }
        _ => {}
    }
}

/// The import endpoint answers with the dash-separated internal form of the
/// new identifier. Turn it back into the public form used everywhere else.
fn public_template_id(internal_id: &str) -> String {
    format!("{}/{}", ROOT_FOLDER_ID, internal_id.replace('-', "/"))
}
