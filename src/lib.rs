//! # Template Push Library
//!
//! This library provides the core functionality for migrating release
//! templates between two release-orchestration server instances. It is
//! designed to be used by the `template-push` command-line tool but can also
//! be embedded in other applications that move templates around.
//!
//! ## Quick Example
//!
//! ```
//! use template_push::config;
//!
//! let spec = config::parse(
//!     r#"{
//!         "templates": {"include": ["Samples/.*"]},
//!         "folders": {"rename": {"Samples/": "Production/"}}
//!     }"#,
//! )
//! .unwrap();
//! let compiled = spec.compile().unwrap();
//!
//! // Include patterns match the whole template path.
//! assert!(compiled.matches_template("Samples/Nightly build"));
//! assert!(!compiled.matches_template("Archive/Old build"));
//!
//! // Rename rules rewrite local paths to their remote counterparts.
//! assert_eq!(
//!     compiled.folder_renames.rename("Samples/Nightly build"),
//!     "Production/Nightly build"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Specification (`config`)**: Defines which templates to push, and how
//!   folders and configurations are renamed on the way over.
//! - **Instances (`local`, `remote`)**: Capability traits for the source and
//!   target instances, with HTTP implementations over their public APIs.
//! - **Records (`model`)**: The planning state of each matched template,
//!   from its discovered local identity to its resolved remote identifiers.
//! - **Resolution (`resolver`)**: Cached lookups of remote folders, templates
//!   and configurations, so each name is resolved at most once per run.
//! - **Phases (`phases`)**: The staged pipeline that plans the push and,
//!   unless running dry, executes the resulting import actions.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::execute_push`, which runs
//! the following stages:
//!
//! 1.  **Discovery**: Page through the local templates and keep the matching
//!     ones, together with their configuration and template references.
//! 2.  **Renaming**: Apply the folder and configuration rename rules.
//! 3.  **Resolution**: Map the renamed names onto remote identifiers.
//! 4.  **Filtering**: Drop what cannot or need not be imported, reporting
//!     missing folders, configurations and referenced templates.
//! 5.  **Ordering**: Sort imports so referenced templates go first.
//! 6.  **Execution**: Import the templates, rewriting identifier references
//!     and feeding freshly created identifiers forward.
//!
//! A dry run stops after stage 5 and reports the plan without touching the
//! target instance.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod local;
pub mod model;
pub mod output;
pub mod path;
pub mod phases;
pub mod remote;
pub mod rename;
pub mod resolver;
pub mod version;

#[cfg(test)]
mod plan_proptest;
