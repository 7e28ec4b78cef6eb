//! Stage 4: Filtering
//!
//! Narrows the matched templates down to the ones that can and need to be
//! imported, reporting everything that falls out:
//!
//! - A template whose renamed folder does not exist on the target is an
//!   error; folders are never created implicitly.
//! - A referenced configuration that has no counterpart on the target is a
//!   warning, the import proceeds with the reference left as is.
//! - A template that already exists on the target becomes a no-op action.
//! - A referenced template that neither exists on the target nor is part of
//!   this push is a warning, the create-release task will point nowhere.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;

use crate::model::{Action, TemplateRecord, TemplateRef};
use crate::path;

/// Drop templates whose remote folder is missing, one error per folder.
pub fn filter_by_remote_folder(
    records: Vec<TemplateRecord>,
    errors: &mut Vec<String>,
) -> Vec<TemplateRecord> {
    let mut missing: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if record.remote_folder_id.is_some() {
            kept.push(record);
        } else {
            let parent = record
                .remote_path
                .as_deref()
                .and_then(path::parent)
                .unwrap_or_default();
            *missing.entry(parent.to_string()).or_insert(0) += 1;
        }
    }
    for (folder, count) in missing {
        errors.push(format!(
            "Missing remote folder [{}] for {} matching templates",
            folder, count
        ));
    }
    kept
}

/// Warn once per configuration that has no counterpart on the target.
pub fn report_missing_configurations(records: &[TemplateRecord], warnings: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        for configuration in &record.referenced_configurations {
            if configuration.remote_configuration_id.is_none()
                && seen.insert(configuration.id.as_str())
            {
                warnings.push(format!(
                    "Missing remote configuration by type [{}] and title [{}]",
                    configuration.kind, configuration.title
                ));
            }
        }
    }
}

/// Turn templates that already exist on the target into no-op actions.
pub fn filter_already_present(
    records: Vec<TemplateRecord>,
    actions: &mut Vec<Action>,
) -> Vec<TemplateRecord> {
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if record.remote_template_id.is_some() {
            actions.push(Action::Noop { template: record });
        } else {
            kept.push(record);
        }
    }
    kept
}

/// Warn once per referenced template that is neither on the target nor part
/// of this push.
pub fn report_missing_referenced_templates(records: &[TemplateRecord], warnings: &mut Vec<String>) {
    let pushed: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();
    let mut missing: IndexMap<&str, &TemplateRef> = IndexMap::new();
    for record in records {
        for reference in &record.referenced_templates {
            if reference.remote_template_id.is_none() && !pushed.contains(reference.id.as_str()) {
                missing.entry(reference.id.as_str()).or_insert(reference);
            }
        }
    }
    for (id, reference) in missing {
        let users: Vec<&str> = records
            .iter()
            .filter(|record| {
                record
                    .referenced_templates
                    .iter()
                    .any(|other| other.id == id)
            })
            .map(|record| record.path.as_str())
            .collect();
        warnings.push(format!(
            "Missing remote template [{}] referenced from {} local templates: {:?}",
            reference.remote_path.as_deref().unwrap_or(&reference.path),
            users.len(),
            users
        ));
    }
}
