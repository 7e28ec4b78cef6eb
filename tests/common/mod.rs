//! Shared test utilities for integration and E2E tests.
//!
//! This module provides in-memory stand-ins for the two server instances,
//! plus fixtures and helpers for driving the CLI binary, to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::{FakeCatalog, FakeRemote};
//!
//! #[test]
//! fn test_example() {
//!     let local = FakeCatalog::new().with_template(common::template(
//!         "Applications/Release1",
//!         "Nightly build",
//!     ));
//!     // ... test code
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert_fs::prelude::*;
use serde_json::{json, Value};

use template_push::error::{Error, Result};
use template_push::local::LocalCatalog;
use template_push::model::{
    ConfigurationDetails, ImportOutcome, ServerInfo, TemplateHandle, TemplateSummary,
};
use template_push::remote::RemoteClient;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::specs;
    pub use super::TestFixture;
}

/// Common specification snippets for testing.
#[allow(dead_code)]
pub mod specs {
    /// Matches every template, renames nothing.
    pub const MATCH_ALL: &str = r#"{"templates": {"include": [".*"]}}"#;

    /// Invalid JSON for error testing.
    pub const INVALID_JSON: &str = r#"{"templates": ["#;

    /// An include pattern that does not compile.
    pub const INVALID_PATTERN: &str = r#"{"templates": {"include": ["Samples/["]}}"#;
}

// ============================================================================
// Template document builders
// ============================================================================

/// Minimal template document with the given identifier and title.
#[allow(dead_code)]
pub fn template(id: &str, title: &str) -> Value {
    json!({"id": id, "type": "xlrelease.Release", "title": title})
}

/// Template document containing a create-release task pointing at `target`.
#[allow(dead_code)]
pub fn template_with_reference(id: &str, title: &str, target: &str) -> Value {
    json!({
        "id": id,
        "type": "xlrelease.Release",
        "title": title,
        "phases": [{
            "id": format!("{}/Phase1", id),
            "type": "xlrelease.Phase",
            "title": "Phase 1",
            "tasks": [{
                "id": format!("{}/Phase1/Task1", id),
                "type": "xlrelease.CreateReleaseTask",
                "title": "Create release",
                "templateId": target
            }]
        }]
    })
}

// ============================================================================
// In-memory instances
// ============================================================================

/// In-memory stand-in for the local instance.
#[allow(dead_code)]
pub struct FakeCatalog {
    version: String,
    templates: Vec<TemplateHandle>,
    folder_titles: HashMap<String, String>,
    configurations: HashMap<String, ConfigurationDetails>,
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            version: "9.7.0".to_string(),
            templates: Vec::new(),
            folder_titles: HashMap::new(),
            configurations: HashMap::new(),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_template(mut self, document: Value) -> Self {
        self.templates
            .push(TemplateHandle::from_document(document).expect("invalid template document"));
        self
    }

    pub fn with_folder(mut self, id: &str, title: &str) -> Self {
        self.folder_titles.insert(id.to_string(), title.to_string());
        self
    }

    pub fn with_configuration(mut self, id: &str, kind: &str, title: &str) -> Self {
        self.configurations.insert(
            id.to_string(),
            ConfigurationDetails {
                id: id.to_string(),
                kind: kind.to_string(),
                title: title.to_string(),
            },
        );
        self
    }
}

impl LocalCatalog for FakeCatalog {
    fn server_info(&self) -> Result<ServerInfo> {
        Ok(ServerInfo {
            url: "http://localhost:5516".to_string(),
            version: self.version.clone(),
        })
    }

    fn list_templates(
        &self,
        page: usize,
        page_size: usize,
        _depth: u32,
    ) -> Result<Vec<TemplateHandle>> {
        Ok(self
            .templates
            .iter()
            .skip(page * page_size)
            .take(page_size)
            .cloned()
            .collect())
    }

    fn folder_title(&self, folder_id: &str) -> Result<String> {
        self.folder_titles
            .get(folder_id)
            .cloned()
            .ok_or_else(|| Error::Request {
                context: format!("read the title of folder [{}]", folder_id),
                status: 404,
                body: "not found".to_string(),
            })
    }

    fn configuration(&self, id: &str) -> Result<ConfigurationDetails> {
        self.configurations
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Request {
                context: format!("read configuration [{}]", id),
                status: 404,
                body: "not found".to_string(),
            })
    }

    fn template(&self, id: &str) -> Result<Option<TemplateHandle>> {
        Ok(self.templates.iter().find(|t| t.id == id).cloned())
    }
}

/// One recorded import request against the fake remote instance.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub folder_id: Option<String>,
    pub document: Value,
}

#[allow(dead_code)]
impl ImportRequest {
    /// The identifier carried by the submitted template document.
    pub fn template_id(&self) -> &str {
        self.document["id"].as_str().unwrap_or_default()
    }
}

/// In-memory stand-in for the remote instance, recording every request that
/// would change or read it.
#[allow(dead_code)]
pub struct FakeRemote {
    version: String,
    folders: HashMap<String, String>,
    configurations: HashMap<String, Vec<String>>,
    remote_templates: HashMap<String, Vec<TemplateSummary>>,
    import_warnings: Vec<String>,
    failing_imports: HashSet<String>,
    imports: Mutex<Vec<ImportRequest>>,
    folder_lookups: Mutex<Vec<String>>,
    configuration_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeRemote {
    pub fn new() -> Self {
        Self {
            version: "9.7.0".to_string(),
            folders: HashMap::new(),
            configurations: HashMap::new(),
            remote_templates: HashMap::new(),
            import_warnings: Vec::new(),
            failing_imports: HashSet::new(),
            imports: Mutex::new(Vec::new()),
            folder_lookups: Mutex::new(Vec::new()),
            configuration_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// A folder that exists on the remote instance, by renamed path.
    pub fn with_folder(mut self, path: &str, id: &str) -> Self {
        self.folders.insert(path.to_string(), id.to_string());
        self
    }

    pub fn with_configuration(mut self, kind: &str, title: &str, id: &str) -> Self {
        self.configurations
            .entry(format!("{}/{}", kind, title))
            .or_default()
            .push(id.to_string());
        self
    }

    /// A template that already exists inside a remote folder.
    pub fn with_remote_template(mut self, folder_id: &str, title: &str, id: &str) -> Self {
        self.remote_templates
            .entry(folder_id.to_string())
            .or_default()
            .push(TemplateSummary {
                id: id.to_string(),
                title: title.to_string(),
            });
        self
    }

    /// A warning the server attaches to every import outcome.
    pub fn with_import_warning(mut self, warning: &str) -> Self {
        self.import_warnings.push(warning.to_string());
        self
    }

    /// Make the import of the template with this document identifier fail.
    pub fn failing_import_of(mut self, template_id: &str) -> Self {
        self.failing_imports.insert(template_id.to_string());
        self
    }

    /// All imports received so far, in request order.
    pub fn imports(&self) -> Vec<ImportRequest> {
        self.imports.lock().unwrap().clone()
    }

    /// All folder paths looked up so far.
    pub fn folder_lookups(&self) -> Vec<String> {
        self.folder_lookups.lock().unwrap().clone()
    }

    /// Number of configuration lookups received so far.
    pub fn configuration_lookups(&self) -> usize {
        self.configuration_calls.load(Ordering::SeqCst)
    }
}

impl RemoteClient for FakeRemote {
    fn server_info(&self) -> Result<ServerInfo> {
        Ok(ServerInfo {
            url: "http://remote:5516".to_string(),
            version: self.version.clone(),
        })
    }

    fn find_folder(&self, path: &str) -> Result<Option<String>> {
        self.folder_lookups.lock().unwrap().push(path.to_string());
        Ok(self.folders.get(path).cloned())
    }

    fn find_configurations(&self, kind: &str, title: &str) -> Result<Vec<String>> {
        self.configuration_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .configurations
            .get(&format!("{}/{}", kind, title))
            .cloned()
            .unwrap_or_default())
    }

    fn list_folder_templates(
        &self,
        folder_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<TemplateSummary>> {
        Ok(self
            .remote_templates
            .get(folder_id)
            .map(|all| {
                all.iter()
                    .skip(page * page_size)
                    .take(page_size)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn import_template(&self, folder_id: Option<&str>, body: &str) -> Result<ImportOutcome> {
        let document: Value = serde_json::from_str(body).map_err(Error::Json)?;
        let id = document["id"].as_str().unwrap_or_default().to_string();
        self.imports.lock().unwrap().push(ImportRequest {
            folder_id: folder_id.map(str::to_string),
            document,
        });

        if self.failing_imports.contains(&id) {
            return Err(Error::Request {
                context: format!(
                    "import a template into folder [{}]",
                    folder_id.unwrap_or("Applications")
                ),
                status: 500,
                body: "Internal server error".to_string(),
            });
        }

        // The real server answers with a fresh dash-separated internal id.
        let internal = format!(
            "Imported-{}",
            id.strip_prefix("Applications/").unwrap_or(&id).replace('/', "-")
        );
        Ok(ImportOutcome {
            id: internal,
            warnings: self.import_warnings.clone(),
        })
    }
}

// ============================================================================
// CLI fixtures
// ============================================================================

/// A test fixture that provides a temporary directory with an optional push
/// specification file, for driving the CLI binary.
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `push-spec.json` specification file with the given content.
    pub fn with_spec(self, content: &str) -> Self {
        self.temp_dir
            .child("push-spec.json")
            .write_str(content)
            .expect("Failed to write specification file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the specification file.
    pub fn spec_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("push-spec.json")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("template-push");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
