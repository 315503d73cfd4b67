use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Local, TimeZone};
use filetime::FileTime;

use pathq::filters::{self, between, extract, AgeUnit};
use pathq::{predicate_fn, CompareOp, Entry, EntryKind, Expr, Predicate, QueryError};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// A predicate that counts its evaluations, so tests can observe
/// short-circuiting.
struct Probe {
    hits: Arc<AtomicUsize>,
    result: bool,
}

impl Predicate for Probe {
    fn evaluate(&self, _entry: &Entry, _reference: DateTime<Local>) -> bool {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.result
    }
}

fn probe(result: bool) -> (Expr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let expr = Expr::leaf(Probe {
        hits: Arc::clone(&hits),
        result,
    });
    (expr, hits)
}

fn eval(expr: &Expr, path: &Path) -> bool {
    expr.evaluate(&Entry::new(path), Local::now())
}

fn eval_at(expr: &Expr, path: &Path, reference: DateTime<Local>) -> bool {
    expr.evaluate(&Entry::new(path), reference)
}

fn local(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, mo, d, h, 0, 0)
        .single()
        .expect("unambiguous local time")
}

fn set_mtime(path: &Path, at: DateTime<Local>) {
    filetime::set_file_mtime(path, FileTime::from_system_time(SystemTime::from(at))).unwrap();
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

#[test]
fn and_short_circuits_on_false_left() {
    let (left, _) = probe(false);
    let (right, right_hits) = probe(true);
    let expr = left & right;

    assert!(!eval(&expr, Path::new("anything")));
    assert_eq!(
        right_hits.load(Ordering::Relaxed),
        0,
        "right side must not be evaluated when the left is false"
    );
}

#[test]
fn and_evaluates_right_when_left_true() {
    let (left, _) = probe(true);
    let (right, right_hits) = probe(true);
    let expr = left & right;

    assert!(eval(&expr, Path::new("anything")));
    assert_eq!(right_hits.load(Ordering::Relaxed), 1);
}

#[test]
fn or_short_circuits_on_true_left() {
    let (left, _) = probe(true);
    let (right, right_hits) = probe(false);
    let expr = left | right;

    assert!(eval(&expr, Path::new("anything")));
    assert_eq!(
        right_hits.load(Ordering::Relaxed),
        0,
        "right side must not be evaluated when the left is true"
    );
}

#[test]
fn double_negation_restores_result() {
    for result in [true, false] {
        let (inner, hits) = probe(result);
        let expr = !!inner;
        assert_eq!(eval(&expr, Path::new("anything")), result);
        assert_eq!(hits.load(Ordering::Relaxed), 1, "Not always evaluates");
    }
}

#[test]
fn empty_all_matches_and_empty_any_does_not() {
    assert!(eval(&Expr::always(), Path::new("anything")));
    assert!(!eval(&Expr::never(), Path::new("anything")));
}

#[test]
fn all_stops_at_first_false_child() {
    let (first, first_hits) = probe(true);
    let (second, second_hits) = probe(false);
    let (third, third_hits) = probe(true);
    let expr = Expr::all([first, second, third]);

    assert!(!eval(&expr, Path::new("anything")));
    assert_eq!(first_hits.load(Ordering::Relaxed), 1);
    assert_eq!(second_hits.load(Ordering::Relaxed), 1);
    assert_eq!(third_hits.load(Ordering::Relaxed), 0);
}

#[test]
fn any_stops_at_first_true_child() {
    let (first, _) = probe(false);
    let (second, _) = probe(true);
    let (third, third_hits) = probe(false);
    let expr = Expr::any([first, second, third]);

    assert!(eval(&expr, Path::new("anything")));
    assert_eq!(third_hits.load(Ordering::Relaxed), 0);
}

// ---------------------------------------------------------------------------
// Between
// ---------------------------------------------------------------------------

#[test]
fn between_is_lower_inclusive_upper_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let at_lower = dir.path().join("at_lower");
    let inside = dir.path().join("inside");
    let at_upper = dir.path().join("at_upper");
    fs::write(&at_lower, vec![0u8; 500]).unwrap();
    fs::write(&inside, vec![0u8; 1000]).unwrap();
    fs::write(&at_upper, vec![0u8; 2000]).unwrap();

    let expr = between(extract::size, 500u64, 2000u64);
    assert!(eval(&expr, &at_lower), "value == lower bound must match");
    assert!(eval(&expr, &inside));
    assert!(!eval(&expr, &at_upper), "value == upper bound must not match");
}

#[test]
fn between_missing_metadata_is_non_match() {
    let expr = between(extract::size, 0u64, u64::MAX);
    assert!(!eval(&expr, Path::new("/definitely/not/there")));
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

#[test]
fn age_rejects_equality_at_construction() {
    assert!(matches!(
        filters::age(AgeUnit::Days, CompareOp::Eq, 10.0),
        Err(QueryError::InvalidPredicate(_))
    ));
    assert!(matches!(
        filters::age(AgeUnit::Hours, CompareOp::Ne, 1.0),
        Err(QueryError::InvalidPredicate(_))
    ));
    assert!(matches!(
        filters::name_age(AgeUnit::Days, CompareOp::Eq, 10.0),
        Err(QueryError::InvalidPredicate(_))
    ));
}

#[test]
fn age_lt_is_an_alias_for_le() {
    let dir = tempfile::tempdir().unwrap();
    let reference = local(2024, 6, 15, 12);

    let fresh = dir.path().join("fresh.txt");
    let old = dir.path().join("old.txt");
    fs::write(&fresh, b"x").unwrap();
    fs::write(&old, b"x").unwrap();
    set_mtime(&fresh, local(2024, 6, 13, 12)); // 2 days old
    set_mtime(&old, local(2024, 6, 5, 12)); // 10 days old

    let lt = filters::age(AgeUnit::Days, CompareOp::Lt, 5.0).unwrap();
    let le = filters::age(AgeUnit::Days, CompareOp::Le, 5.0).unwrap();

    for path in [&fresh, &old] {
        assert_eq!(
            eval_at(&lt, path, reference),
            eval_at(&le, path, reference),
            "< and <= must produce identical match sets"
        );
    }
    assert!(eval_at(&le, &fresh, reference));
    assert!(!eval_at(&le, &old, reference));
}

#[test]
fn filename_age_falls_back_to_false_without_a_date() {
    let reference = local(2024, 6, 15, 12);
    let expr = filters::name_age(AgeUnit::Years, CompareOp::Ge, 0.0).unwrap();

    // Dated name: matches regardless of filesystem state (no stat needed).
    assert!(eval_at(&expr, Path::new("2023-05_report.txt"), reference));
    // Undated name: non-match, never an error.
    assert!(!eval_at(&expr, Path::new("report.txt"), reference));
}

// ---------------------------------------------------------------------------
// Suffix
// ---------------------------------------------------------------------------

fn matching_names(expr: &Expr, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter(|n| eval(expr, Path::new(n)))
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn suffix_dot_normalization_is_idempotent() {
    let names = ["x.bmp", "y.BMP", "z.txt", "bmp"];
    let bare = filters::suffix("bmp").unwrap();
    let dotted = filters::suffix(".bmp").unwrap();

    let bare_matches = matching_names(&bare, &names);
    let dotted_matches = matching_names(&dotted, &names);
    assert_eq!(bare_matches, dotted_matches);
    assert_eq!(bare_matches, vec!["x.bmp", "y.BMP"]);
}

#[test]
fn suffix_supports_multi_dot_extensions() {
    let expr = filters::suffix(".tar.gz").unwrap();
    assert!(eval(&expr, Path::new("backup.tar.gz")));
    assert!(eval(&expr, Path::new("BACKUP.TAR.GZ")));
    assert!(!eval(&expr, Path::new("backup.gz")));
}

#[test]
fn suffix_expands_single_level_brace_groups() {
    let expr = filters::suffix("{png,bmp}").unwrap();
    assert!(eval(&expr, Path::new("photo.png")));
    assert!(eval(&expr, Path::new("scan.bmp")));
    assert!(!eval(&expr, Path::new("notes.txt")));
}

// ---------------------------------------------------------------------------
// Name, stem, kind, size
// ---------------------------------------------------------------------------

#[test]
fn name_glob_is_case_insensitive_with_wildcards() {
    let expr = filters::name("invoice_?.txt").unwrap();
    assert!(eval(&expr, Path::new("INVOICE_1.TXT")));
    assert!(eval(&expr, Path::new("invoice_a.txt")));
    assert!(!eval(&expr, Path::new("invoice_10.txt")));

    let classes = filters::name("log[0-9]").unwrap();
    assert!(eval(&classes, Path::new("log5")));
    assert!(!eval(&classes, Path::new("logx")));
}

#[test]
fn stem_matches_name_without_extension() {
    let expr = filters::stem("draft*").unwrap();
    assert!(eval(&expr, Path::new("draft_v2.txt")));
    assert!(!eval(&expr, Path::new("final_draft.txt")));
}

#[test]
fn kind_filter_distinguishes_files_and_directories() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.txt");
    let sub = dir.path().join("sub");
    fs::write(&file, b"x").unwrap();
    fs::create_dir(&sub).unwrap();

    let is_file = filters::kind(EntryKind::File);
    let is_dir = filters::kind(EntryKind::Dir);
    assert!(eval(&is_file, &file));
    assert!(!eval(&is_file, &sub));
    assert!(eval(&is_dir, &sub));
}

#[test]
fn size_accepts_human_readable_magnitudes() {
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small");
    let large = dir.path().join("large");
    fs::write(&small, vec![0u8; 500]).unwrap();
    fs::write(&large, vec![0u8; 2000]).unwrap();

    let expr = filters::size(CompareOp::Le, "1 kb").unwrap();
    assert!(eval(&expr, &small));
    assert!(!eval(&expr, &large));
}

#[test]
fn size_rejects_bad_magnitudes_at_construction() {
    assert!(matches!(
        filters::size(CompareOp::Le, "10 lightyears"),
        Err(QueryError::InvalidSize(_))
    ));
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[test]
fn presets_bucket_by_reference_day() {
    let dir = tempfile::tempdir().unwrap();
    let reference = local(2024, 6, 15, 12);

    let today = dir.path().join("today.txt");
    let yesterday = dir.path().join("yesterday.txt");
    let last_week = dir.path().join("last_week.txt");
    for f in [&today, &yesterday, &last_week] {
        fs::write(f, b"x").unwrap();
    }
    set_mtime(&today, local(2024, 6, 15, 8));
    set_mtime(&yesterday, local(2024, 6, 14, 23));
    set_mtime(&last_week, local(2024, 6, 8, 8));

    let modified_today = filters::presets::modified_today();
    assert!(eval_at(&modified_today, &today, reference));
    assert!(!eval_at(&modified_today, &yesterday, reference));
    assert!(!eval_at(&modified_today, &last_week, reference));

    let modified_yesterday = filters::presets::modified_yesterday();
    assert!(eval_at(&modified_yesterday, &yesterday, reference));
    assert!(!eval_at(&modified_yesterday, &today, reference));
}

// ---------------------------------------------------------------------------
// Custom predicates
// ---------------------------------------------------------------------------

#[test]
fn closure_predicates_compose_with_filters() {
    let expr = filters::suffix(".txt").unwrap()
        & predicate_fn(|entry, _now| entry.name().starts_with("report"));

    assert!(eval(&expr, Path::new("report_q3.txt")));
    assert!(!eval(&expr, Path::new("report_q3.md")));
    assert!(!eval(&expr, Path::new("summary.txt")));
}

#[test]
fn evaluation_does_not_consume_the_expression() {
    let expr = filters::suffix(".txt").unwrap();
    assert!(eval(&expr, Path::new("a.txt")));
    // Same expression, reused; and composition leaves the original usable.
    let both = expr.clone() & filters::name("a*").unwrap();
    assert!(eval(&expr, Path::new("b.txt")));
    assert!(eval(&both, Path::new("a.txt")));
}
