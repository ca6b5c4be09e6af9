// tests/workflow.rs

//! End-to-end workflow tests: fixture index file -> source -> parse ->
//! resolve -> render.

use apkgraph::{
    ascii_tree, resolve, Error, GraphExport, Index, IndexSource, LocalFileSource, ResolveOptions,
    Truncation,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Write an APKINDEX fixture and return the open handle to keep it alive
fn fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load(file: &NamedTempFile) -> Index {
    let raw = LocalFileSource::new(file.path()).fetch_raw_index().unwrap();
    Index::parse(&raw).unwrap()
}

#[test]
fn test_full_pipeline_ascii_tree() {
    let file = fixture("P:app\nV:1.0-r0\nD:libA libB\n\nP:libA\nV:0.2-r1\nD:libB\n\nP:libB\nV:2.1-r0\n");
    let index = load(&file);

    let result = resolve(&index, "app", &ResolveOptions::default()).unwrap();
    assert!(result.missing.is_empty());

    let lines: Vec<String> = ascii_tree(&result, None).collect();
    assert_eq!(lines, vec!["app", "├── libA", "│   └── libB", "└── libB"]);

    // libB shows up in two distinct branches
    let libb_lines = lines.iter().filter(|l| l.contains("libB")).count();
    assert_eq!(libb_lines, 2);
}

#[test]
fn test_full_pipeline_with_filter_and_export() {
    let file = fixture("P:app\nV:1.0-r0\nD:libA libB\n\nP:libA\nV:0.2-r1\nD:libB\n\nP:libB\nV:2.1-r0\n");
    let index = load(&file);
    let result = resolve(&index, "app", &ResolveOptions::default()).unwrap();

    // Filtering annotates both matches without changing the tree shape
    let plain: Vec<String> = ascii_tree(&result, None).collect();
    let marked: Vec<String> = ascii_tree(&result, Some("libB")).collect();
    assert_eq!(plain.len(), marked.len());
    assert_eq!(marked.iter().filter(|l| l.ends_with(" *")).count(), 2);

    let export = GraphExport::from_result(&result);
    assert_eq!(export.nodes.len(), 4);
    assert_eq!(export.edges.len(), 3);

    let dot = export.to_dot();
    assert!(dot.contains("\"app\" -> \"app/libA\";"));
    assert!(dot.contains("\"app/libA\" -> \"app/libA/libB\";"));
}

#[test]
fn test_cyclic_repository_terminates() {
    let file = fixture("P:A\nV:1.0\nD:B\n\nP:B\nV:1.0\nD:C\n\nP:C\nV:1.0\nD:A\n");
    let index = load(&file);

    let result = resolve(&index, "A", &ResolveOptions::default()).unwrap();
    let lines: Vec<String> = ascii_tree(&result, None).collect();
    assert_eq!(
        lines,
        vec![
            "A",
            "└── B",
            "    └── C",
            "        └── A (cycle)",
        ]
    );

    let deepest = &result.root.children[0].children[0].children[0];
    assert_eq!(deepest.name, "A");
    assert_eq!(deepest.truncated, Some(Truncation::Cycle));
}

#[test]
fn test_missing_packages_reported_not_fatal() {
    let file = fixture("P:app\nV:1.0\nD:real ghost1 ghost2\n\nP:real\nV:1.0\n");
    let index = load(&file);

    let result = resolve(&index, "app", &ResolveOptions::default()).unwrap();
    let missing: Vec<&str> = result.missing.iter().map(String::as_str).collect();
    assert_eq!(missing, vec!["ghost1", "ghost2"]);

    let lines: Vec<String> = ascii_tree(&result, None).collect();
    assert!(lines.iter().any(|l| l.contains("ghost1 (missing)")));
    assert!(lines.iter().any(|l| l.contains("ghost2 (missing)")));
}

#[test]
fn test_depth_limited_run() {
    let file = fixture("P:a\nD:b\n\nP:b\nD:c\n\nP:c\nD:d\n\nP:d\n");
    let index = load(&file);

    let options = ResolveOptions { max_depth: Some(2) };
    let result = resolve(&index, "a", &options).unwrap();

    let lines: Vec<String> = ascii_tree(&result, None).collect();
    assert_eq!(lines, vec!["a", "└── b", "    └── c (depth limit)"]);
}

#[test]
fn test_unreadable_fixture_is_io_error() {
    let source = LocalFileSource::new("/no/such/path/APKINDEX");
    assert!(matches!(source.fetch_raw_index(), Err(Error::IoError(_))));
}

#[test]
fn test_duplicate_records_resolve_against_last() {
    let file = fixture("P:app\nV:1.0\nD:old\n\nP:app\nV:2.0\nD:new\n\nP:new\nV:1.0\n\nP:old\nV:1.0\n");
    let index = load(&file);

    let result = resolve(&index, "app", &ResolveOptions::default()).unwrap();
    assert_eq!(result.root.children.len(), 1);
    assert_eq!(result.root.children[0].name, "new");
}

#[test]
fn test_package_with_no_dependencies() {
    let file = fixture("P:standalone\nV:3.4-r0\nT:No deps at all\n");
    let index = load(&file);

    let record = index.get("standalone").unwrap();
    assert!(record.depends.is_empty());

    let result = resolve(&index, "standalone", &ResolveOptions::default()).unwrap();
    assert!(result.root.children.is_empty());
    assert!(result.root.truncated.is_none());
    assert_eq!(result.visited_count, 1);
}
