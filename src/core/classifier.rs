// LogSieve - core/classifier.rs
//
// Timestamp and level extraction from a logical record's text.
// Core layer: pure functions over &str.

use crate::core::model::{Level, SENTINEL_TIMESTAMP};
use crate::util::constants::{TIMESTAMP_FORMAT, TIMESTAMP_PATTERN};
use crate::util::error::{FilterError, RangeBound};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

/// Keyword → level table, checked in order. The first keyword found
/// anywhere in the text (case-insensitive) decides the level.
const LEVEL_KEYWORDS: &[(&str, Level)] = &[
    ("error", Level::Error),
    ("warn", Level::Warning),
    ("debug", Level::Debug),
];

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the tests below.
    RE.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("TIMESTAMP_PATTERN is a valid regex"))
}

/// Classify a record: `(timestamp, level)`.
pub fn classify(text: &str) -> (NaiveDateTime, Level) {
    (extract_timestamp(text), detect_level(text))
}

/// First `YYYY-MM-DD HH:MM:SS` substring, parsed exactly.
///
/// Only the first candidate is considered: if it is not a real calendar
/// date/time (e.g. month 13) the record gets the sentinel, even when a
/// later substring would have parsed.
pub fn extract_timestamp(text: &str) -> NaiveDateTime {
    timestamp_regex()
        .find(text)
        .and_then(|m| NaiveDateTime::parse_from_str(m.as_str(), TIMESTAMP_FORMAT).ok())
        .unwrap_or(SENTINEL_TIMESTAMP)
}

/// Level from the first matching keyword in priority order; Info otherwise.
pub fn detect_level(text: &str) -> Level {
    let lower = text.to_lowercase();
    LEVEL_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, level)| *level)
        .unwrap_or_default()
}

/// Parse user-supplied time-range input. The trimmed input must be exactly
/// `YYYY-MM-DD HH:MM:SS`; anything else is a format error for `bound`.
pub fn parse_strict(input: &str, bound: RangeBound) -> Result<NaiveDateTime, FilterError> {
    let trimmed = input.trim();

    // chrono accepts unpadded fields (e.g. "2024-1-2 3:4:5"); the
    // accepted layout is fixed-width, so check the shape first.
    let shape_ok = timestamp_regex()
        .find(trimmed)
        .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len());
    if !shape_ok {
        return Err(FilterError::InvalidTimestamp {
            bound,
            input: input.to_string(),
            source: None,
        });
    }

    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT).map_err(|e| {
        FilterError::InvalidTimestamp {
            bound,
            input: input.to_string(),
            source: Some(e),
        }
    })
}
