//! Implementation of the stages of the template push pipeline.
//!
//! ## Overview
//!
//! A push runs through a fixed sequence of stages:
//! 1. Discovery - List local templates, build their folder paths, keep the
//!    ones matched by the specification and collect their references
//! 2. Renaming - Apply folder and configuration rename rules to compute the
//!    remote coordinates to look for
//! 3. Resolution - Resolve remote folder, template and configuration
//!    identifiers through per-run caches
//! 4. Filtering - Drop templates without a remote folder, turn already
//!    existing templates into no-op actions, report missing prerequisites
//! 5. Ordering - Sort the import set so dependencies are imported before
//!    the templates referencing them
//! 6. Execution - Import templates one by one, rewriting identifiers inside
//!    each body; skipped entirely on a dry run
//!
//! The orchestrator runs stages 1-5 unconditionally to produce the plan and
//! stage 6 only when execution was requested. Each stage only reads the
//! fields earlier stages have filled in and writes its own.

pub mod discovery;
pub mod execution;
pub mod filtering;
pub mod orchestrator;
pub mod ordering;
pub mod renaming;
pub mod resolution;
