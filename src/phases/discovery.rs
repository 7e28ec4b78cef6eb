//! Stage 1: Discovery
//!
//! Pages through the local template listing, builds a human-readable folder
//! path for every template and keeps the ones whose path fully matches an
//! include pattern. For each kept template the stage also collects:
//!
//! - **Referenced configurations**: every string value in the wire document
//!   that looks like a shared configuration identifier, enriched with the
//!   configuration's type and title.
//! - **Referenced templates**: the target of every create-release task that
//!   has one, with the same human-readable path as the template itself.
//!
//! Folder titles and configuration details are each fetched at most once per
//! run through lookup caches. A create-release task pointing at a template
//! that no longer exists is logged and skipped; there is nothing to push for
//! it and the task will need manual attention either way.

use log::warn;
use regex::Regex;
use serde_json::Value;

use crate::cache::LookupCache;
use crate::config::CompiledSpec;
use crate::error::Result;
use crate::local::LocalCatalog;
use crate::model::{
    ConfigRef, ConfigurationDetails, TemplateHandle, TemplateRecord, TemplateRef,
    CREATE_RELEASE_TASK,
};
use crate::path;

/// Page size for the local template listing.
pub const PAGE_SIZE: usize = 20;

/// Folder depth of the local template listing, effectively unlimited.
pub const LISTING_DEPTH: u32 = 1000;

/// Shape of a shared configuration identifier inside a template document.
const CONFIGURATION_ID_PATTERN: &str = r"^Configuration/Custom/[\w /]+$";

/// Discovery stage with its per-run lookup caches.
pub struct Discovery<'a> {
    local: &'a dyn LocalCatalog,
    folder_titles: LookupCache<String, String>,
    configurations: LookupCache<String, ConfigurationDetails>,
    configuration_id: Regex,
}

impl<'a> Discovery<'a> {
    pub fn new(local: &'a dyn LocalCatalog) -> Self {
        Self {
            local,
            folder_titles: LookupCache::new(),
            configurations: LookupCache::new(),
            configuration_id: Regex::new(CONFIGURATION_ID_PATTERN).unwrap(),
        }
    }

    /// Find all templates matched by the specification, with their
    /// references attached.
    pub fn execute(&self, spec: &CompiledSpec) -> Result<Vec<TemplateRecord>> {
        let mut records = Vec::new();
        let mut page = 0;
        loop {
            let batch = self.local.list_templates(page, PAGE_SIZE, LISTING_DEPTH)?;
            if batch.is_empty() {
                break;
            }
            for handle in &batch {
                let id = path::normalize_id(&handle.id).to_string();
                let template_path = self.human_path(&id, &handle.title)?;
                if !spec.matches_template(&template_path) {
                    continue;
                }
                let mut record = TemplateRecord::new(id, template_path);
                record.referenced_configurations = self.referenced_configurations(handle)?;
                record.referenced_templates = self.referenced_templates(handle)?;
                records.push(record);
            }
            page += 1;
        }
        Ok(records)
    }

    /// Human-readable path of an entity: the titles of its ancestor folders
    /// from the root down, ending in the entity's own title.
    ///
    /// The walk stops at the root folder, which carries no title of its own.
    fn human_path(&self, id: &str, title: &str) -> Result<String> {
        let mut segments = vec![title.to_string()];
        let mut current = id.to_string();
        loop {
            let parent = match path::parent(&current) {
                Some(parent) if parent.contains('/') => parent.to_string(),
                _ => break,
            };
            let folder_title = self
                .folder_titles
                .get_or_try(parent.clone(), || self.local.folder_title(&parent))?;
            segments.push(folder_title);
            current = parent;
        }
        segments.reverse();
        Ok(segments.join("/"))
    }

    fn referenced_configurations(&self, handle: &TemplateHandle) -> Result<Vec<ConfigRef>> {
        let mut ids = Vec::new();
        collect_configuration_ids(&handle.document, &self.configuration_id, &mut ids);

        let mut references = Vec::with_capacity(ids.len());
        for id in ids {
            let details = self
                .configurations
                .get_or_try(id.clone(), || self.local.configuration(&id))?;
            references.push(ConfigRef {
                id: details.id,
                kind: details.kind,
                title: details.title,
                remote_title: None,
                remote_configuration_id: None,
            });
        }
        Ok(references)
    }

    fn referenced_templates(&self, handle: &TemplateHandle) -> Result<Vec<TemplateRef>> {
        let mut references = Vec::new();
        for task in handle.tasks() {
            if task.kind != CREATE_RELEASE_TASK {
                continue;
            }
            let target = match task.template_id {
                Some(target) => path::normalize_id(&target).to_string(),
                None => continue,
            };
            let referenced = match self.local.template(&target)? {
                Some(referenced) => referenced,
                None => {
                    warn!(
                        "Could not find template [{}] referenced by task [{}]({}) \
                         of template [{}]({}), skipping the reference",
                        target, task.title, task.id, handle.title, handle.id
                    );
                    continue;
                }
            };
            let referenced_path = self.human_path(&target, &referenced.title)?;
            references.push(TemplateRef {
                id: target,
                path: referenced_path,
                remote_path: None,
                remote_folder_id: None,
                remote_template_id: None,
                source_task_id: task.id,
            });
        }
        Ok(references)
    }
}

/// Collect string values that look like configuration identifiers,
/// deduplicated in traversal order.
fn collect_configuration_ids(value: &Value, pattern: &Regex, found: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            if pattern.is_match(text) && !found.contains(text) {
                found.push(text.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_configuration_ids(item, pattern, found);
            }
        }
        Value::Object(fields) => {
            for field in fields.values() {
                collect_configuration_ids(field, pattern, found);
            }
        }
        _ => {}
    }
}
