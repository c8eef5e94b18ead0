// LogSieve - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// presentation concerns.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Timestamp assigned to records with no recognisable `YYYY-MM-DD HH:MM:SS`
/// substring. Sorts before every real timestamp.
pub const SENTINEL_TIMESTAMP: NaiveDateTime = NaiveDateTime::MIN;

// =============================================================================
// Record identity
// =============================================================================

/// Stable identity of a record within one load.
///
/// Assigned monotonically by the loader in file/line order, before the
/// timestamp sort, so two records with identical text remain distinct.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Log Record
// =============================================================================

/// One logical, brace-balanced log record after classification.
///
/// Everything except `pinned` is immutable after creation. Search match
/// state is deliberately absent: it belongs to a query result
/// (`core::query::ViewRow`), not to the record.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub id: RecordId,

    /// Reconstructed record text (trimmed physical lines concatenated).
    pub text: String,

    /// Extracted timestamp, or `SENTINEL_TIMESTAMP`.
    pub timestamp: NaiveDateTime,

    pub level: Level,

    /// File the record was read from.
    pub source_file: PathBuf,

    /// 1-based line number of the record's first physical line.
    pub line_number: u64,

    /// User-toggled pin flag. Pinned records float to the top of every view.
    pub pinned: bool,
}

impl LogRecord {
    /// Whether a real timestamp was found in the text.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp != SENTINEL_TIMESTAMP
    }
}

// =============================================================================
// Level
// =============================================================================

/// The four fixed record levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Level {
    #[default]
    Info,
    Warning,
    Error,
    Debug,
}

impl Level {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Info => "Info",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Debug => "Debug",
        }
    }

    /// Short label for compact display (e.g. table columns).
    pub fn short_label(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERR",
            Level::Debug => "DBG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Search mode
// =============================================================================

/// How multiple search terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every term must appear in the record.
    #[default]
    And,
    /// At least one term must appear in the record.
    Or,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(SearchMode::And),
            "or" => Ok(SearchMode::Or),
            other => Err(format!("unknown search mode '{other}', expected 'and' or 'or'")),
        }
    }
}

// =============================================================================
// Level counts
// =============================================================================

/// Aggregate record counts over the whole store.
///
/// `debug` is tracked alongside the others but left out of the classic
/// four-field summary line (`summary_line`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub total: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub debug: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: Level) {
        self.total += 1;
        match level {
            Level::Info => self.info += 1,
            Level::Warning => self.warn += 1,
            Level::Error => self.error += 1,
            Level::Debug => self.debug += 1,
        }
    }

    /// `Total: n  Info: n  Warn: n  Error: n`
    pub fn summary_line(&self) -> String {
        format!(
            "Total: {}  Info: {}  Warn: {}  Error: {}",
            self.total, self.info, self.warn, self.error
        )
    }
}

// =============================================================================
// Load report
// =============================================================================

/// A per-file failure surfaced to the caller after a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Per-file load statistics.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,

    /// Number of records assembled from this file.
    pub records: usize,

    /// Earliest real timestamp found (if any).
    pub earliest: Option<DateTime<Utc>>,

    /// Latest real timestamp found (if any).
    pub latest: Option<DateTime<Utc>>,

    /// True when the file ended inside an open brace block and the trailing
    /// buffer was dropped.
    pub unterminated: bool,
}

/// Outcome of a load operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Records now held by the store.
    pub record_count: usize,

    /// Files that failed, in input order.
    pub errors: Vec<FileError>,

    /// Files that were read, in input order.
    pub files: Vec<FileSummary>,

    /// Non-fatal problems not tied to one readable file (directory
    /// traversal, truncated expansion).
    pub warnings: Vec<String>,

    #[serde(skip)]
    pub duration: std::time::Duration,
}
