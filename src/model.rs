//! # Domain Model
//!
//! This module defines the data types that flow through the push pipeline:
//! template records and their references, the wire-level template handle, and
//! the report returned to the caller.
//!
//! ## Key Components
//!
//! - **`TemplateRecord`**: One matched local template, progressively enriched
//!   by the pipeline stages with remote coordinates.
//! - **`TemplateHandle`**: A full template as returned by a release server,
//!   wrapping the raw JSON document. Accessors and mutators for tasks,
//!   attachments and triggers operate on that document, so a serialized
//!   handle always reflects earlier mutations.
//! - **`Action`**: A planned step, either a no-op for a template that already
//!   exists remotely or an import.
//! - **`PushReport`**: Warnings, errors, actions and counters for one run.
//!
//! Remote coordinates on records and references start as `None` and are
//! written exactly once by their owning stage; later stages only read them.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Identifier of the root folder on every release server instance.
pub const ROOT_FOLDER_ID: &str = "Applications";

/// Task type whose `templateId` property points at another template.
pub const CREATE_RELEASE_TASK: &str = "xlrelease.CreateReleaseTask";

/// A configuration entry referenced by a template, for example a shared SMTP
/// server definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// Title to resolve against on the remote instance, set by the renaming
    /// stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_title: Option<String>,
    /// Remote configuration identifier, set by the resolution stage when the
    /// configuration exists remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_configuration_id: Option<String>,
}

/// Another template referenced from a create-release task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: String,
    /// Human-readable path of the referenced template on the local instance.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_template_id: Option<String>,
    /// Identifier of the task holding the reference.
    pub source_task_id: String,
}

/// One template matched by the specification, carried through all stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    /// Human-readable path built from folder titles, e.g. `Samples/Nightly`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_template_id: Option<String>,
    pub referenced_configurations: Vec<ConfigRef>,
    pub referenced_templates: Vec<TemplateRef>,
}

impl TemplateRecord {
    /// A fresh record with no remote coordinates assigned yet.
    pub fn new(id: String, path: String) -> Self {
        Self {
            id,
            path,
            remote_path: None,
            remote_folder_id: None,
            remote_template_id: None,
            referenced_configurations: Vec::new(),
            referenced_templates: Vec::new(),
        }
    }
}

/// A task inside a template, as extracted from the wire document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub kind: String,
    /// Target of a create-release task, when set.
    pub template_id: Option<String>,
}

/// A full template as served by a release server.
///
/// The handle keeps the raw JSON document; everything else is derived from
/// it. Mutating methods change the document itself so that [`to_wire`]
/// reflects them.
///
/// [`to_wire`]: TemplateHandle::to_wire
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateHandle {
    pub id: String,
    pub title: String,
    pub document: Value,
}

impl TemplateHandle {
    /// Build a handle from a wire document, extracting `id` and `title`.
    pub fn from_document(document: Value) -> Result<Self> {
        let id = string_field(&document, "id")?;
        let title = string_field(&document, "title")?;
        Ok(Self {
            id,
            title,
            document,
        })
    }

    /// All tasks in the document, in traversal order.
    ///
    /// A task is any nested object with an `id` and a `type` ending in
    /// `Task`; this covers tasks inside phases as well as tasks nested in
    /// task groups.
    pub fn tasks(&self) -> Vec<TaskSummary> {
        let mut tasks = Vec::new();
        collect_tasks(&self.document, &mut tasks);
        tasks
    }

    /// Number of attachments on the template itself.
    pub fn attachment_count(&self) -> usize {
        self.document
            .get("attachments")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Number of release triggers defined on the template.
    pub fn trigger_count(&self) -> usize {
        self.document
            .get("releaseTriggers")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Remove all attachments from the template and its tasks.
    ///
    /// Attachment payloads cannot travel inside a template import, so every
    /// `attachments` array in the document is emptied. Returns the number of
    /// template-level attachments that were dropped.
    pub fn strip_attachments(&mut self) -> usize {
        let dropped = self.attachment_count();
        clear_arrays_named(&mut self.document, "attachments");
        dropped
    }

    /// Remove all release triggers from the template.
    ///
    /// Triggers reference local infrastructure and would fire on the remote
    /// instance immediately after the import. Returns the number of triggers
    /// that were dropped.
    pub fn strip_triggers(&mut self) -> usize {
        let dropped = self.trigger_count();
        if let Some(triggers) = self.document.get_mut("releaseTriggers") {
            if triggers.is_array() {
                *triggers = Value::Array(Vec::new());
            }
        }
        dropped
    }

    /// Serialize the document into its wire form.
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }
}

fn string_field(document: &Value, field: &str) -> Result<String> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidResponse {
            context: "the template API".to_string(),
            message: format!("template document has no string [{}] field", field),
        })
}

fn collect_tasks(value: &Value, tasks: &mut Vec<TaskSummary>) {
    match value {
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str);
            let id = map.get("id").and_then(Value::as_str);
            if let (Some(kind), Some(id)) = (kind, id) {
                if kind.ends_with("Task") {
                    tasks.push(TaskSummary {
                        id: id.to_string(),
                        title: map
                            .get("title")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        kind: kind.to_string(),
                        template_id: map
                            .get("templateId")
                            .and_then(Value::as_str)
                            .filter(|target| !target.is_empty())
                            .map(str::to_string),
                    });
                }
            }
            for nested in map.values() {
                collect_tasks(nested, tasks);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_tasks(item, tasks);
            }
        }
        _ => {}
    }
}

fn clear_arrays_named(value: &mut Value, field: &str) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if key == field && nested.is_array() {
                    *nested = Value::Array(Vec::new());
                } else {
                    clear_arrays_named(nested, field);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                clear_arrays_named(item, field);
            }
        }
        _ => {}
    }
}

/// A template as it appears in a remote folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
}

/// A configuration entry as served by a release server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigurationDetails {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

/// Version and address of one release server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub url: String,
    pub version: String,
}

/// Result of importing one template on the remote instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportOutcome {
    /// Identifier assigned by the remote instance, in internal form.
    pub id: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A planned pipeline step for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The template already exists on the remote instance.
    Noop { template: TemplateRecord },
    /// The template will be imported into its remote folder.
    Import { template: TemplateRecord },
}

impl Action {
    /// Stable action discriminator used in serialized reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Noop { .. } => "noop",
            Action::Import { .. } => "import",
        }
    }

    /// The template this action concerns.
    pub fn template(&self) -> &TemplateRecord {
        match self {
            Action::Noop { template } | Action::Import { template } => template,
        }
    }

    /// Human-readable description of the action.
    pub fn description(&self) -> String {
        match self {
            Action::Noop { template } => format!(
                "Template [{}]({}) already exists on the remote instance: [{}]({})",
                template.path,
                template.id,
                template.remote_path.as_deref().unwrap_or_default(),
                template.remote_template_id.as_deref().unwrap_or_default()
            ),
            Action::Import { template } => {
                format!("Import template [{}] to the remote instance", template.path)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // No-op actions carry no entity, only a description.
        match self {
            Action::Noop { .. } => {
                let mut state = serializer.serialize_struct("Action", 2)?;
                state.serialize_field("type", self.kind())?;
                state.serialize_field("description", &self.description())?;
                state.end()
            }
            Action::Import { template } => {
                let mut state = serializer.serialize_struct("Action", 3)?;
                state.serialize_field("type", self.kind())?;
                state.serialize_field("description", &self.description())?;
                state.serialize_field("entity", template)?;
                state.end()
            }
        }
    }
}

/// Counters describing one push run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushStats {
    /// Templates matched by the include patterns.
    pub n_matched_templates: usize,
    /// Matched templates whose remote folder exists.
    pub n_with_remote_folder: usize,
    /// Templates that do not exist remotely yet and would be imported.
    pub n_not_existing_remotely: usize,
    /// Templates imported successfully; absent for a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_imported: Option<usize>,
    /// Templates whose import failed; absent for a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_failed_import: Option<usize>,
}

/// The complete outcome of one push run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub actions: Vec<Action>,
    pub stats: PushStats,
}
