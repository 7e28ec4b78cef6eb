//! Stage 5: Ordering
//!
//! Sorts the templates to import so that every create-release target is
//! imported before the templates pointing at it. That way each import can
//! rewrite its references to identifiers that already exist on the target.
//!
//! The sort is an iterative depth-first traversal with a global visited set.
//! References to templates outside the import set are skipped; they were
//! either resolved remotely or already reported as missing. A cyclic
//! reference cannot be satisfied in any order, so the offending edge is
//! dropped with a warning and both templates are still imported. Children
//! are followed in reference order, which keeps the result deterministic.

use std::collections::{HashMap, HashSet};

use crate::model::TemplateRecord;

pub fn execute(records: &mut Vec<TemplateRecord>, warnings: &mut Vec<String>) {
    let order = topological_order(records, warnings);
    let position: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();
    records.sort_by_key(|record| {
        position
            .get(record.id.as_str())
            .copied()
            .unwrap_or(usize::MAX)
    });
}

fn topological_order(records: &[TemplateRecord], warnings: &mut Vec<String>) -> Vec<String> {
    let references: HashMap<&str, Vec<&str>> = records
        .iter()
        .map(|record| {
            let targets = record
                .referenced_templates
                .iter()
                .map(|reference| reference.id.as_str())
                .collect();
            (record.id.as_str(), targets)
        })
        .collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut order = Vec::with_capacity(records.len());
    for record in records {
        if visited.contains(record.id.as_str()) {
            continue;
        }
        let mut stack = vec![record.id.as_str()];
        while let Some(&node) = stack.last() {
            let next_child = references[node]
                .iter()
                .copied()
                .find(|child| !visited.contains(child));
            match next_child {
                Some(child) if stack.contains(&child) => {
                    warnings.push(format!(
                        "There is a cycle in create-release references between templates \
                         [{}] and [{}], so the link must be restored manually after the push",
                        node, child
                    ));
                    visited.insert(child);
                }
                Some(child) if !references.contains_key(child) => {
                    visited.insert(child);
                }
                Some(child) => stack.push(child),
                None => {
                    stack.pop();
                    visited.insert(node);
                    order.push(node.to_string());
                }
            }
        }
    }
    order
}
