// LogSieve - core/query.rs
//
// View ordering and highlight annotation.
//
// Every view is built the same way, whatever filter selected its records:
// pinned records first, newest pinned on top, then the unpinned records
// oldest first. Match state is computed here, per query, into `ViewRow`
// and never written back to the records.

use crate::core::filter::{apply_filter, Filter, SearchTerms};
use crate::core::model::{LogRecord, RecordId};
use crate::core::store::RecordStore;
use std::cmp::Reverse;

/// One row of an ordered view.
#[derive(Debug, Clone, Copy)]
pub struct ViewRow<'a> {
    pub record: &'a LogRecord,

    /// True when the record contains any active highlight term.
    pub is_matched: bool,
}

/// An ordered, highlight-annotated view over a store.
#[derive(Debug, Clone, Default)]
pub struct View<'a> {
    pub rows: Vec<ViewRow<'a>>,
}

impl<'a> View<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record identities in view order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|row| row.record.id).collect()
    }

    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_matched).count()
    }
}

/// Order `source` into a view and annotate matches against `highlight`.
///
/// Both sorts are stable, so records with equal timestamps keep their
/// relative order from `source`.
pub fn order_view<'a, I>(source: I, highlight: Option<&SearchTerms>) -> View<'a>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let (mut pinned, mut unpinned): (Vec<&LogRecord>, Vec<&LogRecord>) =
        source.into_iter().partition(|r| r.pinned);

    pinned.sort_by_key(|r| Reverse(r.timestamp));
    unpinned.sort_by_key(|r| r.timestamp);

    let highlight = highlight.filter(|terms| !terms.is_empty());

    let rows = pinned
        .into_iter()
        .chain(unpinned)
        .map(|record| ViewRow {
            record,
            is_matched: highlight.is_some_and(|terms| terms.any_in(&record.text)),
        })
        .collect();

    View { rows }
}

/// Select from the full store with `filter`, then order and annotate.
pub fn run<'a>(store: &'a RecordStore, filter: &Filter) -> View<'a> {
    let records = store.all();
    let selected = apply_filter(records, filter);

    let view = order_view(
        selected.iter().map(|&idx| &records[idx]),
        filter.highlight_terms(),
    );

    tracing::debug!(
        filter = filter_kind(filter),
        selected = view.len(),
        matched = view.matched_count(),
        total = records.len(),
        "Query complete"
    );

    view
}

fn filter_kind(filter: &Filter) -> &'static str {
    match filter {
        Filter::All => "all",
        Filter::TimeRange { .. } => "time_range",
        Filter::Search { .. } => "search",
        Filter::PinnedOnly => "pinned_only",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;
    use crate::core::model::SearchMode;
    use std::path::PathBuf;

    fn make_record(id: u64, text: &str, pinned: bool) -> LogRecord {
        let (timestamp, level) = classify(text);
        LogRecord {
            id: RecordId(id),
            text: text.to_string(),
            timestamp,
            level,
            source_file: PathBuf::from("test.log"),
            line_number: id + 1,
            pinned,
        }
    }

    fn ids(view: &View<'_>) -> Vec<u64> {
        view.rows.iter().map(|r| r.record.id.0).collect()
    }

    #[test]
    fn test_pinned_desc_then_unpinned_asc() {
        let records = vec![
            make_record(0, "2024-01-01 00:00:00 a", false),
            make_record(1, "2024-01-02 00:00:00 b", true),
            make_record(2, "2024-01-03 00:00:00 c", false),
            make_record(3, "2024-01-04 00:00:00 d", true),
            make_record(4, "no time", false),
        ];
        let view = order_view(&records, None);
        assert_eq!(ids(&view), vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn test_ordering_holds_for_unsorted_source() {
        let records = vec![
            make_record(0, "2024-01-05 00:00:00", false),
            make_record(1, "2024-01-01 00:00:00", true),
            make_record(2, "2024-01-02 00:00:00", false),
            make_record(3, "2024-01-09 00:00:00", true),
        ];
        let view = order_view(&records, None);

        let first_unpinned = view
            .rows
            .iter()
            .position(|r| !r.record.pinned)
            .unwrap_or(view.len());
        assert!(view.rows[first_unpinned..].iter().all(|r| !r.record.pinned));
        assert!(view.rows[..first_unpinned]
            .windows(2)
            .all(|w| w[0].record.timestamp >= w[1].record.timestamp));
        assert!(view.rows[first_unpinned..]
            .windows(2)
            .all(|w| w[0].record.timestamp <= w[1].record.timestamp));
    }

    #[test]
    fn test_equal_timestamps_keep_source_order() {
        let records = vec![
            make_record(0, "2024-01-01 00:00:00 first", true),
            make_record(1, "2024-01-01 00:00:00 second", true),
            make_record(2, "2024-01-01 00:00:00 third", false),
            make_record(3, "2024-01-01 00:00:00 fourth", false),
        ];
        assert_eq!(ids(&order_view(&records, None)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_highlight_any_term() {
        let records = vec![
            make_record(0, "alpha", false),
            make_record(1, "BETA", false),
            make_record(2, "gamma", false),
        ];
        let terms = SearchTerms::parse("beta alpha");
        let view = order_view(&records, Some(&terms));
        let matched: Vec<bool> = view.rows.iter().map(|r| r.is_matched).collect();
        assert_eq!(matched, vec![true, true, false]);
    }

    #[test]
    fn test_no_terms_means_no_highlight() {
        let records = vec![make_record(0, "alpha", false)];
        let empty = SearchTerms::parse("");
        assert!(!order_view(&records, Some(&empty)).rows[0].is_matched);
        assert!(!order_view(&records, None).rows[0].is_matched);
    }

    #[test]
    fn test_run_search_highlights_every_row() {
        let mut store = RecordStore::new();
        store.load(vec![
            make_record(0, "foo only", false),
            make_record(1, "bar only", false),
            make_record(2, "foo bar", false),
        ]);
        let view = run(&store, &Filter::search("foo bar", SearchMode::Or));
        assert_eq!(view.len(), 3);
        assert_eq!(view.matched_count(), 3);

        let view = run(&store, &Filter::search("foo bar", SearchMode::And));
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn test_run_pinned_floats_within_search() {
        let mut store = RecordStore::new();
        store.load(vec![
            make_record(0, "2024-01-01 00:00:00 foo", false),
            make_record(1, "2024-01-02 00:00:00 foo", false),
        ]);
        store.toggle_pin(RecordId(1)).unwrap();
        let view = run(&store, &Filter::search("foo", SearchMode::And));
        assert_eq!(ids(&view), vec![1, 0]);
    }

    #[test]
    fn test_run_all_is_repeatable() {
        let mut store = RecordStore::new();
        store.load(vec![
            make_record(0, "2024-01-02 00:00:00 b", false),
            make_record(1, "2024-01-01 00:00:00 a", true),
            make_record(2, "c", false),
        ]);
        let first = run(&store, &Filter::All).ids();
        let second = run(&store, &Filter::All).ids();
        assert_eq!(first, second);
    }
}
