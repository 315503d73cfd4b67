use std::fs;
use std::path::Path;

use pathq::{query, Field, SortOrder};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Four files with known sizes, collected in one pass.
fn collect_sized() -> (tempfile::TempDir, pathq::ResultSet) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("b.txt"), vec![0u8; 200]).unwrap();
    fs::write(dir.path().join("c.txt"), vec![0u8; 300]).unwrap();
    fs::write(dir.path().join("d.txt"), vec![0u8; 400]).unwrap();

    let results = query().from_path(dir.path()).collect().unwrap();
    (dir, results)
}

fn names(set: &pathq::ResultSet) -> Vec<String> {
    set.iter().map(|r| r.name().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn aggregates_over_captured_sizes() {
    let (_dir, results) = collect_sized();

    assert_eq!(results.len(), 4);
    assert_eq!(results.min(Field::Size), Some(100.0));
    assert_eq!(results.max(Field::Size), Some(400.0));
    assert_eq!(results.mean(Field::Size), Some(250.0));
    assert_eq!(results.median(Field::Size), Some(250.0));
}

#[test]
fn median_of_odd_sized_column_is_the_middle_value() {
    let dir = tempfile::tempdir().unwrap();
    for (name, size) in [("a", 10), ("b", 20), ("c", 90)] {
        fs::write(dir.path().join(name), vec![0u8; size]).unwrap();
    }
    let results = query().from_path(dir.path()).collect().unwrap();
    assert_eq!(results.median(Field::Size), Some(20.0));
}

#[test]
fn aggregation_on_empty_set_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let results = query().from_path(dir.path()).collect().unwrap();
    assert!(results.is_empty());
    assert_eq!(results.mean(Field::Size), None);
    assert_eq!(results.median(Field::Mtime), None);
}

#[test]
fn sorting_returns_a_new_ordered_view() {
    let (_dir, results) = collect_sized();

    let descending = results.sorted_by(Field::Size, SortOrder::Descending);
    assert_eq!(names(&descending), vec!["d.txt", "c.txt", "b.txt", "a.txt"]);

    // The original set keeps discovery order.
    assert_eq!(names(&results), vec!["a.txt", "b.txt", "c.txt", "d.txt"]);
}

#[test]
fn top_and_bottom_select_by_field() {
    let (_dir, results) = collect_sized();

    assert_eq!(names(&results.top(2, Field::Size)), vec!["d.txt", "c.txt"]);
    assert_eq!(
        names(&results.bottom(2, Field::Size)),
        vec!["a.txt", "b.txt"]
    );
    // Requesting more than the set holds returns everything.
    assert_eq!(results.top(10, Field::Size).len(), 4);
}

#[test]
fn records_capture_derived_fields_at_match_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.tar.gz");
    fs::write(&path, vec![0u8; 1234]).unwrap();

    let results = query().from_path(dir.path()).collect().unwrap();
    let record = &results.records()[0];

    assert_eq!(record.name(), "archive.tar.gz");
    assert_eq!(record.stem(), Some("archive.tar"));
    assert_eq!(record.suffix(), Some("gz"));
    assert_eq!(record.size(), Some(1234));
    assert_eq!(record.path(), path.as_path());
    assert!(record.modified().is_some());
    assert!(record.numeric(Field::Mtime).is_some());
    assert_eq!(
        record.text(Field::Parent).as_deref(),
        Some(dir.path().display().to_string().as_str())
    );
    assert_eq!(record.parents().next(), Some(dir.path()));
}

#[test]
fn into_paths_preserves_discovery_order() {
    let (_dir, results) = collect_sized();
    let paths = results.clone().into_paths();
    let file_names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(file_names, vec!["a.txt", "b.txt", "c.txt", "d.txt"]);
    assert!(paths.iter().all(|p| p.parent() == Some(_dir.path())));
}

#[test]
fn text_sort_orders_by_name() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["zebra.txt", "apple.txt", "mango.txt"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    let results = query().from_path(dir.path()).collect().unwrap();
    let sorted = results.sorted_by(Field::Name, SortOrder::Ascending);
    assert_eq!(names(&sorted), vec!["apple.txt", "mango.txt", "zebra.txt"]);
}

#[test]
fn paths_iterator_matches_records() {
    let (_dir, results) = collect_sized();
    let from_paths: Vec<_> = results.paths().map(Path::to_path_buf).collect();
    let from_records: Vec<_> = results.iter().map(|r| r.path().to_path_buf()).collect();
    assert_eq!(from_paths, from_records);
}
