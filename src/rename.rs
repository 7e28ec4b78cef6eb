//! # Path Renaming
//!
//! Rename rules map paths on the local instance to paths on the remote
//! instance. A rule is a regular expression pattern paired with a replacement
//! string; patterns are implicitly anchored at the start of the path, so a
//! rule only fires when the path begins with the pattern.
//!
//! Rules are applied in the order they appear in the specification, and only
//! the first matching rule is applied. The output of a rule is never fed back
//! into the rule list, so renames cannot cascade.
//!
//! Replacement strings may reference capture groups using `$1`, `$2`, etc.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Error, Result};

/// A single compiled rename rule.
#[derive(Debug, Clone)]
struct RenameRule {
    pattern: Regex,
    replacement: String,
}

/// An ordered list of rename rules, applied first-match-wins.
#[derive(Debug, Clone, Default)]
pub struct PathRenamer {
    rules: Vec<RenameRule>,
}

impl PathRenamer {
    /// Compile a renamer from an ordered pattern-to-replacement mapping.
    ///
    /// Returns an error naming the offending pattern when one does not
    /// compile.
    pub fn new(mappings: &IndexMap<String, String>) -> Result<Self> {
        let mut rules = Vec::with_capacity(mappings.len());
        for (pattern, replacement) in mappings {
            let anchored = format!("^{}", pattern);
            let compiled = Regex::new(&anchored).map_err(|e| Error::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            rules.push(RenameRule {
                pattern: compiled,
                replacement: replacement.clone(),
            });
        }
        Ok(Self { rules })
    }

    /// Apply the first matching rule, or return `None` when no rule matches.
    pub fn apply(&self, input: &str) -> Option<String> {
        for rule in &self.rules {
            if rule.pattern.is_match(input) {
                return Some(
                    rule.pattern
                        .replace(input, rule.replacement.as_str())
                        .into_owned(),
                );
            }
        }
        None
    }

    /// Rename a path, returning it unchanged when no rule matches.
    pub fn rename(&self, path: &str) -> String {
        self.apply(path).unwrap_or_else(|| path.to_string())
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the renamer has no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
