// LogSieve - app/session.rs
//
// The caller-owned viewing session: one record store plus the load and
// discovery settings. Every view action selects from the full store and
// returns a freshly ordered view; the session keeps no filter state
// between actions, so filters never compound.

use crate::app::load::{load_records, LoadConfig};
use crate::core::discovery::{expand_paths, DiscoveryConfig};
use crate::core::filter::Filter;
use crate::core::model::{LevelCounts, LoadReport, RecordId, SearchMode};
use crate::core::query::{self, View};
use crate::core::store::RecordStore;
use crate::platform::config::AppConfig;
use crate::util::error::{FilterError, StoreError};
use std::path::PathBuf;

/// Top-level state driven by a presentation layer.
#[derive(Debug, Default)]
pub struct Session {
    store: RecordStore,
    discovery: DiscoveryConfig,
    load: LoadConfig,
}

impl Session {
    pub fn new(discovery: DiscoveryConfig, load: LoadConfig) -> Self {
        Self {
            store: RecordStore::new(),
            discovery,
            load,
        }
    }

    /// Build a session from validated application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DiscoveryConfig {
                max_depth: config.max_depth,
                max_files: config.max_files,
                include_patterns: config.include_patterns.clone(),
            },
            LoadConfig {
                max_total_records: config.max_total_records,
                large_file_threshold: config.large_file_threshold,
            },
        )
    }

    /// Load `paths` (files or directories), replacing the whole store.
    ///
    /// Per-file failures are collected in the report and never abort the
    /// load. The store is swapped only after every file has been processed.
    pub fn load_files(&mut self, paths: &[PathBuf]) -> LoadReport {
        let (files, warnings) = expand_paths(paths, &self.discovery);
        for w in &warnings {
            tracing::warn!(warning = %w, "Discovery warning");
        }

        let (records, mut report) = load_records(&files, &self.load);
        // Discovery warnings come first: they describe the file list itself.
        report.warnings.splice(0..0, warnings);

        self.store.load(records);
        report.record_count = self.store.len();
        report
    }

    /// Records with `from <= timestamp <= to`. Both bounds are validated
    /// before anything is selected.
    pub fn apply_time_filter(&self, from_text: &str, to_text: &str) -> Result<View<'_>, FilterError> {
        let filter = Filter::time_range(from_text, to_text)?;
        Ok(self.query(&filter))
    }

    /// Keyword search. Blank text behaves like `show_all`.
    pub fn search(&self, text: &str, mode: SearchMode) -> View<'_> {
        self.query(&Filter::search(text, mode))
    }

    /// Flip the pin flag on one record; returns the new state.
    pub fn toggle_pin(&mut self, id: RecordId) -> Result<bool, StoreError> {
        self.store.toggle_pin(id)
    }

    pub fn show_pinned_only(&self) -> View<'_> {
        self.query(&Filter::PinnedOnly)
    }

    pub fn show_all(&self) -> View<'_> {
        self.query(&Filter::All)
    }

    /// Drop whatever filter the caller had applied; same view as `show_all`.
    pub fn clear_filter(&self) -> View<'_> {
        self.show_all()
    }

    /// Level counts over the entire store, independent of any view.
    pub fn stats(&self) -> LevelCounts {
        self.store.counts()
    }

    /// Run an arbitrary filter against the full store.
    pub fn query(&self, filter: &Filter) -> View<'_> {
        query::run(&self.store, filter)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn session_with(content: &str) -> (Session, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, content).unwrap();
        let mut session = Session::default();
        let report = session.load_files(&[path]);
        assert!(report.errors.is_empty());
        (session, dir)
    }

    const SAMPLE: &str = "\
2024-01-01 10:00:00 INFO service started
2024-01-01 10:05:00 WARN cache miss rate high
2024-01-01 10:10:00 ERROR request failed {
  \"code\": 500,
  \"path\": \"/api\"
}
2024-01-01 10:15:00 DEBUG gc pause
orphan line without time
";

    #[test]
    fn test_show_all_in_timestamp_order() {
        let (session, _dir) = session_with(SAMPLE);
        let view = session.show_all();
        let texts: Vec<_> = view.rows.iter().map(|r| r.record.text.as_str()).collect();
        assert_eq!(texts[0], "orphan line without time");
        assert_eq!(
            texts[3],
            "2024-01-01 10:10:00 ERROR request failed {\"code\": 500,\"path\": \"/api\"}"
        );
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_stats_independent_of_filters() {
        let (session, _dir) = session_with(SAMPLE);
        let before = session.stats();
        let _ = session.search("request", SearchMode::And);
        let _ = session.apply_time_filter("2024-01-01 10:00:00", "2024-01-01 10:01:00");
        assert_eq!(session.stats(), before);
        assert_eq!(
            (before.total, before.info, before.warn, before.error, before.debug),
            (5, 2, 1, 1, 1)
        );
    }

    #[test]
    fn test_malformed_time_filter_changes_nothing() {
        let (session, _dir) = session_with(SAMPLE);
        let before = session.show_all().ids();
        assert!(session.apply_time_filter("2024-01-01", "2024-01-02").is_err());
        assert_eq!(session.show_all().ids(), before);
    }

    #[test]
    fn test_filters_do_not_stack() {
        let (session, _dir) = session_with(SAMPLE);
        let narrowed = session.search("cache", SearchMode::And);
        assert_eq!(narrowed.len(), 1);
        // A second action selects from the whole store again.
        let range = session
            .apply_time_filter("2024-01-01 10:00:00", "2024-01-01 10:15:00")
            .unwrap();
        assert_eq!(range.len(), 4);
        assert_eq!(range.matched_count(), 0);
    }

    #[test]
    fn test_pin_then_pinned_only_and_float() {
        let (mut session, _dir) = session_with(SAMPLE);
        let ids = session.show_all().ids();
        let (early, late) = (ids[1], ids[3]);
        assert_eq!(session.toggle_pin(early), Ok(true));
        assert_eq!(session.toggle_pin(late), Ok(true));

        let pinned = session.show_pinned_only().ids();
        assert_eq!(pinned, vec![late, early]);

        let all = session.show_all().ids();
        assert_eq!(&all[..2], &[late, early]);

        // Pinned records float even when a search would rank them elsewhere.
        let view = session.search("10:", SearchMode::Or);
        assert_eq!(&view.ids()[..2], &[late, early]);
    }

    #[test]
    fn test_clear_filter_idempotent() {
        let (mut session, _dir) = session_with(SAMPLE);
        let id = session.show_all().ids()[2];
        session.toggle_pin(id).unwrap();
        assert_eq!(session.clear_filter().ids(), session.clear_filter().ids());
    }

    #[test]
    fn test_reload_replaces_store_and_pins() {
        let (mut session, dir) = session_with(SAMPLE);
        let id = session.show_all().ids()[0];
        session.toggle_pin(id).unwrap();

        let other = dir.path().join("other.log");
        fs::write(&other, "single\n").unwrap();
        let report = session.load_files(&[other]);
        assert_eq!(report.record_count, 1);
        assert!(session.show_pinned_only().is_empty());
    }
}
