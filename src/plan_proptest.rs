//! Property-based tests for the planning building blocks.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::model::{TemplateRecord, TemplateRef};
    use crate::phases::ordering;
    use crate::rename::PathRenamer;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn renamer(rules: &[(String, String)]) -> PathRenamer {
        let mappings: IndexMap<String, String> = rules.iter().cloned().collect();
        PathRenamer::new(&mappings).unwrap()
    }

    fn record_with_references(id: &str, targets: &[String]) -> TemplateRecord {
        let mut record = TemplateRecord::new(id.to_string(), id.to_string());
        for target in targets {
            record.referenced_templates.push(TemplateRef {
                id: target.clone(),
                path: target.clone(),
                remote_path: None,
                remote_folder_id: None,
                remote_template_id: None,
                source_task_id: format!("{}/Phase1/Task1", id),
            });
        }
        record
    }

    // ============================================================================
    // PathRenamer property tests
    // ============================================================================

    proptest! {
        /// Property: renaming is deterministic
        #[test]
        fn rename_is_deterministic(
            prefix in "[a-zA-Z0-9 ]{1,12}",
            replacement in "[a-zA-Z0-9 ]{1,12}",
            path in "[a-zA-Z0-9 /]{1,30}",
        ) {
            let renamer = renamer(&[(regex::escape(&prefix), replacement)]);
            prop_assert_eq!(renamer.rename(&path), renamer.rename(&path));
        }

        /// Property: a renamer without rules returns every path unchanged
        #[test]
        fn rename_without_rules_is_identity(path in "[a-zA-Z0-9 /]{0,30}") {
            let renamer = renamer(&[]);
            prop_assert_eq!(renamer.rename(&path), path);
        }

        /// Property: an escaped literal prefix rule rewrites exactly the prefix
        #[test]
        fn rename_literal_prefix_rewrites_the_prefix(
            old_folder in "[a-zA-Z0-9 ]{1,12}",
            new_folder in "[a-zA-Z0-9 ]{1,12}",
            rest in "[a-zA-Z0-9 /]{1,30}",
        ) {
            let renamer = renamer(&[(
                regex::escape(&format!("{}/", old_folder)),
                format!("{}/", new_folder),
            )]);
            let path = format!("{}/{}", old_folder, rest);
            prop_assert_eq!(renamer.rename(&path), format!("{}/{}", new_folder, rest));
        }

        /// Property: a path that cannot contain the pattern is left alone
        #[test]
        fn rename_without_match_is_identity(path in "[a-zA-Z0-9 ]{0,30}") {
            // The path has no slash, so the folder rule can never fire.
            let renamer = renamer(&[("Never/".to_string(), "Ever/".to_string())]);
            prop_assert_eq!(renamer.apply(&path), None);
            prop_assert_eq!(renamer.rename(&path), path);
        }
    }

    // ============================================================================
    // Ordering property tests
    // ============================================================================

    /// A reference graph where every record only points at records with a
    /// higher index, so it can never contain a cycle.
    fn forward_edges() -> impl Strategy<Value = Vec<Vec<bool>>> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 1..8)
    }

    fn records_from_edges(edges: &[Vec<bool>]) -> Vec<TemplateRecord> {
        let n = edges.len();
        (0..n)
            .map(|i| {
                let targets: Vec<String> = (i + 1..n)
                    .filter(|&j| edges[i][j])
                    .map(|j| format!("Applications/Release{}", j))
                    .collect();
                record_with_references(&format!("Applications/Release{}", i), &targets)
            })
            .collect()
    }

    proptest! {
        /// Property: in an acyclic graph, every referenced template is
        /// ordered before the template pointing at it, without warnings
        #[test]
        fn ordering_puts_references_first_in_acyclic_graphs(edges in forward_edges()) {
            let mut records = records_from_edges(&edges);
            let mut warnings = Vec::new();

            ordering::execute(&mut records, &mut warnings);

            prop_assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
            let position: std::collections::HashMap<&str, usize> = records
                .iter()
                .enumerate()
                .map(|(index, record)| (record.id.as_str(), index))
                .collect();
            for record in &records {
                for reference in &record.referenced_templates {
                    prop_assert!(
                        position[reference.id.as_str()] < position[record.id.as_str()],
                        "reference {} must come before {}",
                        reference.id,
                        record.id
                    );
                }
            }
        }

        /// Property: ordering terminates on a reference ring and keeps every
        /// template, warning at least once about the cycle
        #[test]
        fn ordering_survives_reference_rings(n in 2usize..8) {
            let mut records: Vec<TemplateRecord> = (0..n)
                .map(|i| {
                    record_with_references(
                        &format!("Applications/Release{}", i),
                        &[format!("Applications/Release{}", (i + 1) % n)],
                    )
                })
                .collect();
            let mut warnings = Vec::new();

            ordering::execute(&mut records, &mut warnings);

            prop_assert_eq!(records.len(), n);
            prop_assert!(!warnings.is_empty());
            let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), n, "every template must be kept exactly once");
        }

        /// Property: ordering is deterministic
        #[test]
        fn ordering_is_deterministic(edges in forward_edges()) {
            let mut first = records_from_edges(&edges);
            let mut second = records_from_edges(&edges);
            let mut warnings = Vec::new();

            ordering::execute(&mut first, &mut warnings);
            ordering::execute(&mut second, &mut warnings);

            let first_ids: Vec<&str> = first.iter().map(|r| r.id.as_str()).collect();
            let second_ids: Vec<&str> = second.iter().map(|r| r.id.as_str()).collect();
            prop_assert_eq!(first_ids, second_ids);
        }
    }
}
