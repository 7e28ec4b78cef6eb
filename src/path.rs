//! Identifier and path manipulation utilities for template-push
//!
//! Template and folder identifiers are slash-separated, for example
//! `Applications/Folder1/Release2`. Human-readable paths use the same shape
//! but carry folder titles instead of internal segments. Both are handled by
//! the helpers in this module.

/// Strip a leading slash from an identifier.
///
/// Some API payloads carry identifiers with a leading `/`; the canonical form
/// used throughout the pipeline has none.
pub fn normalize_id(id: &str) -> &str {
    id.strip_prefix('/').unwrap_or(id)
}

/// Return everything before the last `/`, or `None` for a bare segment.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Return the last segment of a slash-separated path.
pub fn name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}
