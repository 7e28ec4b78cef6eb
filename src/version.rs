//! # Server Version Comparison
//!
//! Before planning starts, both instances are asked for their server version
//! and the pair is compared. Imports across major versions usually work but
//! may hit data-model differences, so a major mismatch is reported as a
//! warning rather than an error and the run continues.
//!
//! Release servers report versions in several shapes: `9.8.1`, `9.8`,
//! `9.8.1-alpha.2` or `v9.8.1`. The lenient parser pads missing components
//! so all of them compare as semantic versions. A version that cannot be
//! parsed at all disables the comparison for that run.

use semver::Version;

use crate::model::ServerInfo;

/// Parse a server version leniently into a semantic version.
///
/// Accepts a `v` prefix and pads missing minor or patch components with
/// zeros. Returns `None` for strings that are not versions at all.
pub fn parse_lenient(version: &str) -> Option<Version> {
    let trimmed = version.trim().trim_start_matches('v');
    if let Ok(parsed) = Version::parse(trimmed) {
        return Some(parsed);
    }

    // Pad incomplete versions such as "9.8" or "9" to full semver.
    let numbers = trimmed.split('.').collect::<Vec<_>>();
    if numbers.is_empty() || numbers.len() > 2 {
        return None;
    }
    let mut padded = numbers.join(".");
    for _ in numbers.len()..3 {
        padded.push_str(".0");
    }
    Version::parse(&padded).ok()
}

/// Compare two server versions and describe a major-version mismatch.
///
/// Returns `None` when the majors agree or when either version cannot be
/// parsed.
pub fn major_mismatch_warning(local: &ServerInfo, remote: &ServerInfo) -> Option<String> {
    let local_version = parse_lenient(&local.version)?;
    let remote_version = parse_lenient(&remote.version)?;

    if local_version.major == remote_version.major {
        return None;
    }

    Some(format!(
        "The local instance runs version {} but the remote instance runs version {}, \
         templates may not import cleanly across major versions",
        local.version, remote.version
    ))
}
