// LogSieve - tests/e2e_session.rs
//
// End-to-end tests for the load and query pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal and
// real chrono timestamp parsing through the public `Session` API: from raw
// log files on disk to ordered, highlight-annotated views.

use logsieve::app::session::Session;
use logsieve::core::export::export_csv;
use logsieve::core::model::{Level, RecordId, SearchMode};
use logsieve::util::error::{FilterError, RangeBound, StoreError};
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Session loaded with both fixture files, service.log first.
fn loaded_session() -> Session {
    let mut session = Session::default();
    let report = session.load_files(&[fixture("service.log"), fixture("worker.log")]);
    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
    session
}

fn texts(view: &logsieve::core::query::View<'_>) -> Vec<String> {
    view.rows.iter().map(|r| r.record.text.clone()).collect()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn e2e_load_fixture_files() {
    let mut session = Session::default();
    let report = session.load_files(&[fixture("service.log"), fixture("worker.log")]);

    assert_eq!(report.record_count, 9);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].records, 6);
    assert_eq!(report.files[1].records, 3);
    assert!(report.files.iter().all(|f| !f.unterminated));
}

#[test]
fn e2e_multiline_block_is_one_record() {
    let session = loaded_session();
    let record = session
        .store()
        .all()
        .iter()
        .find(|r| r.text.contains("payment failed"))
        .expect("payment record present");

    assert_eq!(
        record.text,
        "2024-05-01 08:02:00 ERROR payment failed {\"order\": 991,\"detail\": {\"reason\": \"card declined\"}}"
    );
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.line_number, 7);
    assert!(record.source_file.ends_with("service.log"));
}

#[test]
fn e2e_directory_input_expands_to_log_files() {
    let mut session = Session::default();
    let report = session.load_files(&[fixtures_dir()]);

    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.record_count, 9);
    let names: Vec<_> = report
        .files
        .iter()
        .filter_map(|f| f.path.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["service.log", "worker.log"]);
}

#[test]
fn e2e_unreadable_file_reported_and_others_loaded() {
    let mut session = Session::default();
    let missing = fixture("does_not_exist.log");
    let report = session.load_files(&[missing.clone(), fixture("worker.log")]);

    assert_eq!(report.record_count, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, missing);
    assert_eq!(session.show_all().len(), 3);
}

#[test]
fn e2e_unterminated_tail_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.log");
    fs::write(
        &path,
        "2024-01-01 00:00:00 INFO ok\n2024-01-01 00:00:01 ERROR dump {\n  \"partial\": true\n",
    )
    .unwrap();

    let mut session = Session::default();
    let report = session.load_files(&[path]);
    assert_eq!(report.record_count, 1);
    assert!(report.files[0].unterminated);
    assert_eq!(session.stats().error, 0);
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn e2e_show_all_sorted_and_stable() {
    let session = loaded_session();
    let view = session.show_all();

    assert_eq!(
        texts(&view),
        vec![
            "heartbeat ok",
            "2024-05-01 07:59:00 INFO worker started",
            "2024-05-01 08:00:00 INFO service booting",
            "2024-05-01 08:00:02 DEBUG loaded 12 plugins",
            "2024-05-01 08:01:10 WARN slow response from upstream {\"upstream\": \"billing\",\"latency_ms\": 2300}",
            "2024-05-01 08:01:10 INFO job queued {\"id\": 1}",
            "2024-05-01 08:02:00 ERROR payment failed {\"order\": 991,\"detail\": {\"reason\": \"card declined\"}}",
            "2024-05-01 08:03:00 INFO shutdown requested",
            "2024-05-01 08:05:00 Warning: queue depth 500",
        ]
    );
}

#[test]
fn e2e_stats_cover_whole_store() {
    let session = loaded_session();
    let counts = session.stats();

    assert_eq!(counts.total, 9);
    assert_eq!(counts.info, 5);
    assert_eq!(counts.warn, 2);
    assert_eq!(counts.error, 1);
    assert_eq!(counts.debug, 1);
    assert_eq!(counts.summary_line(), "Total: 9  Info: 5  Warn: 2  Error: 1");

    let _ = session.search("payment", SearchMode::And);
    assert_eq!(session.stats(), counts);
}

#[test]
fn e2e_search_and_or() {
    let session = loaded_session();

    let and = session.search("PAYMENT declined", SearchMode::And);
    assert_eq!(and.len(), 1);
    assert!(and.rows[0].is_matched);

    let or = session.search("billing plugins", SearchMode::Or);
    assert_eq!(or.len(), 2);
    assert_eq!(or.matched_count(), 2);

    let none = session.search("billing plugins", SearchMode::And);
    assert!(none.is_empty());

    let blank = session.search("   ", SearchMode::And);
    assert_eq!(blank.ids(), session.show_all().ids());
    assert_eq!(blank.matched_count(), 0);
}

#[test]
fn e2e_time_range_inclusive() {
    let session = loaded_session();
    let view = session
        .apply_time_filter("2024-05-01 08:01:10", " 2024-05-01 08:03:00 ")
        .unwrap();

    assert_eq!(view.len(), 4);
    assert!(texts(&view)[0].contains("slow response"));
    assert!(texts(&view)[3].contains("shutdown requested"));
}

#[test]
fn e2e_time_range_rejects_bad_bounds() {
    let session = loaded_session();

    let err = session
        .apply_time_filter("yesterday", "2024-05-01 08:03:00")
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidTimestamp {
            bound: RangeBound::From,
            ..
        }
    ));

    let err = session
        .apply_time_filter("2024-05-01 08:00:00", "2024-13-01 00:00:00")
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidTimestamp {
            bound: RangeBound::To,
            ..
        }
    ));
}

#[test]
fn e2e_pins_float_within_every_view() {
    let mut session = loaded_session();
    let all = session.show_all().ids();
    let (boot, shutdown) = (all[2], all[7]);

    assert_eq!(session.toggle_pin(boot), Ok(true));
    assert_eq!(session.toggle_pin(shutdown), Ok(true));

    let pinned = session.show_pinned_only();
    assert_eq!(pinned.ids(), vec![shutdown, boot]);

    let view = session.show_all();
    assert_eq!(&view.ids()[..2], &[shutdown, boot]);
    assert_eq!(view.len(), 9);

    let search = session.search("service shutdown", SearchMode::Or);
    assert_eq!(search.ids(), vec![shutdown, boot]);
    assert_eq!(search.matched_count(), 2);

    // Unpinning restores plain timestamp order.
    assert_eq!(session.toggle_pin(boot), Ok(false));
    assert_eq!(session.toggle_pin(shutdown), Ok(false));
    assert_eq!(session.clear_filter().ids(), all);
}

#[test]
fn e2e_toggle_unknown_record_is_error() {
    let mut session = loaded_session();
    assert_eq!(
        session.toggle_pin(RecordId(999)),
        Err(StoreError::UnknownRecord { id: RecordId(999) })
    );
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_search_view_to_csv() {
    let session = loaded_session();
    let view = session.search("queue", SearchMode::And);

    let mut buf = Vec::new();
    let written = export_csv(&view, &mut buf).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,timestamp,level,pinned,matched"));
    assert!(lines[1].contains("job queued"));
    assert!(lines[2].contains("queue depth"));
}
