//! Benchmarks for the planning hot paths.
//!
//! A push run matches every discovered template path against the include
//! patterns, renames the matching paths, and topologically sorts the import
//! set. These benchmarks exercise those operations on synthetic catalogs
//! sized like a busy instance.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use template_push::config;
use template_push::model::{TemplateRecord, TemplateRef};
use template_push::phases::ordering;
use template_push::rename::PathRenamer;

/// Compiles a specification with the given include patterns.
fn compile_spec(patterns: &[&str]) -> config::CompiledSpec {
    let json = serde_json::json!({"templates": {"include": patterns}}).to_string();
    config::parse(&json).unwrap().compile().unwrap()
}

/// Creates template paths simulating a typical instance layout.
fn create_template_paths() -> Vec<String> {
    let mut paths = Vec::new();

    // Release templates spread over a few team folders
    for team in ["payments", "storefront", "warehouse", "identity"] {
        for i in 0..20 {
            paths.push(format!("Teams/{}/Deploy service {}", team, i));
            paths.push(format!("Teams/{}/Rollback service {}", team, i));
        }
    }

    // Shared samples and root-level templates
    for i in 0..30 {
        paths.push(format!("Samples/Sample release {}", i));
        paths.push(format!("Release {}", i));
    }

    // Archived templates that no pattern should pick up
    for i in 0..20 {
        paths.push(format!("Archive/2019/Old release {}", i));
    }

    paths
}

/// Creates a renamer with typical folder consolidation rules.
fn create_renamer() -> PathRenamer {
    let mut mappings = IndexMap::new();
    mappings.insert("Samples/".to_string(), "Production/".to_string());
    mappings.insert("Staging/".to_string(), "Production/".to_string());
    mappings.insert(r"Teams/(\w+)/".to_string(), "Delivery/$1/".to_string());
    PathRenamer::new(&mappings).unwrap()
}

/// Creates a record whose create-release tasks point at the given targets.
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

/// Benchmarks for matching template paths against include patterns.
///
/// Discovery matches every listed template against every include pattern,
/// so this dominates runs against large instances.
fn bench_include_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("spec_matching");
    let paths = create_template_paths();

    // Single broad pattern
    let single = compile_spec(&["Teams/.*"]);
    group.bench_function("single_pattern", |b| {
        b.iter(|| {
            paths
                .iter()
                .filter(|path| single.matches_template(black_box(path)))
                .count()
        })
    });

    // Several patterns of mixed specificity
    let multiple = compile_spec(&[
        r"Teams/payments/Deploy.*",
        r"Samples/.*",
        r"Release \d+",
        r"Teams/\w+/Rollback.*",
    ]);
    group.bench_function("multiple_patterns", |b| {
        b.iter(|| {
            paths
                .iter()
                .filter(|path| multiple.matches_template(black_box(path)))
                .count()
        })
    });

    // Pattern that never matches, forcing a scan of the whole list
    let none = compile_spec(&["Decommissioned/.*"]);
    group.bench_function("no_match", |b| {
        b.iter(|| {
            paths
                .iter()
                .filter(|path| none.matches_template(black_box(path)))
                .count()
        })
    });

    group.finish();
}

/// Benchmarks for regex-based path renaming.
///
/// Renaming applies the first matching rule to every matched template path
/// and to every configuration reference.
fn bench_path_renaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_renaming");
    let renamer = create_renamer();

    // First rule fires immediately
    group.bench_function("first_rule_matches", |b| {
        b.iter(|| renamer.rename(black_box("Samples/Nightly build")))
    });

    // Capture groups in the replacement
    group.bench_function("capture_groups", |b| {
        b.iter(|| renamer.rename(black_box("Teams/payments/Deploy gateway")))
    });

    // No rule matches, so every pattern is tried
    group.bench_function("no_rule_matches", |b| {
        b.iter(|| renamer.rename(black_box("Infrastructure/Database migration")))
    });

    group.finish();
}

/// Benchmarks for the topological import ordering.
///
/// The sort runs over the whole import set; chains and fan-ins are the two
/// reference shapes that show up in real catalogs.
fn bench_import_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_ordering");

    // Each template references the next, forcing the deepest traversal
    group.bench_function("linear_chain", |b| {
        b.iter_batched(
            || {
                (0..100)
                    .map(|i| {
                        let targets: Vec<String> = if i + 1 < 100 {
                            vec![format!("Applications/Release{}", i + 1)]
                        } else {
                            Vec::new()
                        };
                        record_with_references(&format!("Applications/Release{}", i), &targets)
                    })
                    .collect::<Vec<_>>()
            },
            |mut records| {
                let mut warnings = Vec::new();
                ordering::execute(&mut records, &mut warnings);
                records
            },
            criterion::BatchSize::SmallInput,
        )
    });

    // Every template references one shared base template
    group.bench_function("fan_in", |b| {
        b.iter_batched(
            || {
                let base = vec!["Applications/Base".to_string()];
                let mut records: Vec<_> = (0..100)
                    .map(|i| record_with_references(&format!("Applications/Release{}", i), &base))
                    .collect();
                records.push(record_with_references("Applications/Base", &[]));
                records
            },
            |mut records| {
                let mut warnings = Vec::new();
                ordering::execute(&mut records, &mut warnings);
                records
            },
            criterion::BatchSize::SmallInput,
        )
    });

    // No references at all, the common case
    group.bench_function("no_references", |b| {
        b.iter_batched(
            || {
                (0..100)
                    .map(|i| record_with_references(&format!("Applications/Release{}", i), &[]))
                    .collect::<Vec<_>>()
            },
            |mut records| {
                let mut warnings = Vec::new();
                ordering::execute(&mut records, &mut warnings);
                records
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_include_matching,
    bench_path_renaming,
    bench_import_ordering
);
criterion_main!(benches);
