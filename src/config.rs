//! # Push Specification
//!
//! This module defines the schema for push specification files, which tell
//! the pipeline which templates to migrate and how to map their folders and
//! configurations onto the remote instance.
//!
//! A specification has three sections, all optional:
//!
//! ```json
//! {
//!     "templates": {
//!         "include": ["Samples/.*", "Release/Nightly build"]
//!     },
//!     "folders": {
//!         "rename": {"Samples/": "Production/"}
//!     },
//!     "configurations": {
//!         "rename": {"smtp.Server/Mail server": "Production mail"}
//!     }
//! }
//! ```
//!
//! - `templates.include` holds regular expressions matched against the full
//!   human-readable path of each local template. A pattern must match the
//!   whole path; `Samples/Build` does not match `Samples/Build app`.
//! - `folders.rename` maps local paths to remote paths. Keys are patterns
//!   anchored at the start of the path, applied first-match-wins in file
//!   order.
//! - `configurations.rename` maps `type/title` keys of shared configurations
//!   to the title carried by the counterpart on the remote instance.
//!
//! Specifications are JSON by default; files with a `.yaml` or `.yml`
//! extension are parsed as YAML with the same structure.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rename::PathRenamer;

/// Template selection section of a push specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFilter {
    /// Full-match patterns against human-readable template paths.
    #[serde(default)]
    pub include: Vec<String>,
}

/// Folder mapping section of a push specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRenames {
    /// Ordered pattern-to-replacement mapping for template paths.
    #[serde(default)]
    pub rename: IndexMap<String, String>,
}

/// Configuration mapping section of a push specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRenames {
    /// Ordered mapping from `type/title` keys to remote titles.
    #[serde(default)]
    pub rename: IndexMap<String, String>,
}

/// A parsed push specification file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSpec {
    #[serde(default)]
    pub templates: TemplateFilter,
    #[serde(default)]
    pub folders: FolderRenames,
    #[serde(default)]
    pub configurations: ConfigurationRenames,
}

impl PushSpec {
    /// Compile all patterns in the specification.
    ///
    /// Returns an error naming the offending pattern when one does not
    /// compile, so a broken specification is rejected before any remote
    /// call is made.
    pub fn compile(&self) -> Result<CompiledSpec> {
        let mut include = Vec::with_capacity(self.templates.include.len());
        for pattern in &self.templates.include {
            // Patterns match the entire path, as if surrounded by ^...$.
            let full = format!("^(?:{})$", pattern);
            let compiled = Regex::new(&full).map_err(|e| Error::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            include.push(compiled);
        }

        Ok(CompiledSpec {
            include,
            folder_renames: PathRenamer::new(&self.folders.rename)?,
            configuration_renames: PathRenamer::new(&self.configurations.rename)?,
        })
    }
}

/// A specification with all patterns compiled, ready for planning.
#[derive(Debug, Clone)]
pub struct CompiledSpec {
    include: Vec<Regex>,
    pub folder_renames: PathRenamer,
    pub configuration_renames: PathRenamer,
}

impl CompiledSpec {
    /// Whether a template path is selected by the include patterns.
    pub fn matches_template(&self, path: &str) -> bool {
        self.include.iter().any(|pattern| pattern.is_match(path))
    }

    /// Number of include patterns.
    pub fn include_count(&self) -> usize {
        self.include.len()
    }
}

/// Parses a JSON string into a `PushSpec`.
pub fn parse(json_content: &str) -> Result<PushSpec> {
    serde_json::from_str(json_content).map_err(|e| Error::SpecParse {
        message: e.to_string(),
        hint: Some(
            "the specification must be a JSON object with optional templates, \
             folders and configurations sections"
                .to_string(),
        ),
    })
}

/// Parses a YAML string into a `PushSpec`.
pub fn parse_yaml(yaml_content: &str) -> Result<PushSpec> {
    serde_yaml::from_str(yaml_content).map_err(|e| Error::SpecParse {
        message: e.to_string(),
        hint: Some(
            "the specification must be a YAML mapping with optional templates, \
             folders and configurations sections"
                .to_string(),
        ),
    })
}

/// Parse a `PushSpec` from a file path.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PushSpec> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match extension {
        "yaml" | "yml" => parse_yaml(&content),
        _ => parse(&content),
    }
}
