// LogSieve - core/filter.rs
//
// Record selection for each view action. Exactly one filter is active per
// action and it always selects from the full store; filters never stack.
// Core layer: pure logic, no I/O.

use crate::core::classifier::parse_strict;
use crate::core::model::{LogRecord, SearchMode};
use crate::util::error::{FilterError, RangeBound};
use chrono::NaiveDateTime;

/// Whitespace-split, lowercased search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    /// Terms as typed, used for highlighting and display.
    pub terms: Vec<String>,
    lowered: Vec<String>,
}

impl SearchTerms {
    /// Split raw input on whitespace, discarding empty terms.
    pub fn parse(text: &str) -> Self {
        let terms: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let lowered = terms.iter().map(|t| t.to_lowercase()).collect();
        Self { terms, lowered }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `text` contains at least one term (case-insensitive).
    pub fn any_in(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.lowered.iter().any(|t| lower.contains(t.as_str()))
    }

    /// Whether `text` contains every term (case-insensitive).
    pub fn all_in(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.lowered.iter().all(|t| lower.contains(t.as_str()))
    }
}

/// The selection applied for one view action.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// Every record (show all / clear filter).
    #[default]
    All,

    /// Records with `from <= timestamp <= to`.
    TimeRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    /// Keyword search; matching terms are highlighted in the view.
    Search {
        terms: SearchTerms,
        mode: SearchMode,
    },

    /// Only pinned records.
    PinnedOnly,
}

impl Filter {
    /// Build a time-range filter from raw user input. Both bounds are
    /// validated before anything is applied.
    pub fn time_range(from_text: &str, to_text: &str) -> Result<Self, FilterError> {
        let from = parse_strict(from_text, RangeBound::From)?;
        let to = parse_strict(to_text, RangeBound::To)?;
        Ok(Filter::TimeRange { from, to })
    }

    /// Build a search filter. Blank input degrades to `All`.
    pub fn search(text: &str, mode: SearchMode) -> Self {
        let terms = SearchTerms::parse(text);
        if terms.is_empty() {
            Filter::All
        } else {
            Filter::Search { terms, mode }
        }
    }

    /// Terms to highlight in the resulting view (empty for non-search filters).
    pub fn highlight_terms(&self) -> Option<&SearchTerms> {
        match self {
            Filter::Search { terms, .. } => Some(terms),
            _ => None,
        }
    }

    /// Check if a single record is selected by this filter.
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::TimeRange { from, to } => *from <= record.timestamp && record.timestamp <= *to,
            Filter::Search { terms, mode } => match mode {
                SearchMode::And => terms.all_in(&record.text),
                SearchMode::Or => terms.any_in(&record.text),
            },
            Filter::PinnedOnly => record.pinned,
        }
    }
}

/// Apply a filter to a slice of records, returning indices of matching records.
///
/// Returns a Vec of indices into the original slice so the view can borrow
/// records instead of copying them.
pub fn apply_filter(records: &[LogRecord], filter: &Filter) -> Vec<usize> {
    if *filter == Filter::All {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}
