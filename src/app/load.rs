// LogSieve - app/load.rs
//
// Load pipeline: read each file, assemble logical records, classify them.
//
// Files are processed sequentially and independently: each gets a fresh
// assembler, and a failure on one file is recorded and skipped without
// affecting the rest. Record ids are assigned in file/line order across
// the whole load so identical records from different places stay distinct.

use crate::core::assembler::{assemble, physical_lines};
use crate::core::classifier::classify;
use crate::core::model::{FileError, FileSummary, LoadReport, LogRecord, RecordId};
use crate::platform::fs::read_text;
use crate::util::constants;
use crate::util::error::{LoadError, LogSieveError};
use crate::util::logging::preview;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Limits applied while loading.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Stop ingesting once this many records are held.
    pub max_total_records: usize,

    /// Files at or above this size are memory-mapped.
    pub large_file_threshold: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_total_records: constants::MAX_TOTAL_RECORDS,
            large_file_threshold: constants::DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}

/// Read, assemble and classify every file in `paths`.
///
/// Returns the records in load order (unsorted) and a report whose
/// `record_count` equals the number of records returned.
pub fn load_records(paths: &[PathBuf], config: &LoadConfig) -> (Vec<LogRecord>, LoadReport) {
    let start = Instant::now();
    let mut records: Vec<LogRecord> = Vec::new();
    let mut report = LoadReport::default();

    for (idx, path) in paths.iter().enumerate() {
        let content = match read_text(path, config.large_file_threshold) {
            Ok(c) => c,
            Err(source) => {
                record_error(
                    &mut report,
                    LoadError::Io {
                        path: path.clone(),
                        source,
                    },
                );
                continue;
            }
        };

        let (summary, capped) = load_file(path, &content, config, &mut records);
        report.files.push(summary);

        if capped {
            record_error(
                &mut report,
                LoadError::TooManyRecords {
                    path: path.clone(),
                    max: config.max_total_records,
                },
            );
            let skipped = paths.len() - idx - 1;
            if skipped > 0 {
                tracing::warn!(skipped, "Record limit reached; remaining files not read");
                report.warnings.push(format!(
                    "{skipped} remaining file(s) were not read because the record limit was reached."
                ));
            }
            break;
        }
    }

    report.record_count = records.len();
    report.duration = start.elapsed();

    tracing::info!(
        files = report.files.len(),
        failed = report.errors.len(),
        records = report.record_count,
        elapsed_ms = report.duration.as_millis() as u64,
        "Load complete"
    );

    (records, report)
}

/// Assemble and classify one file's content, appending to `records`.
/// Returns the file summary and whether the record cap was hit.
fn load_file(
    path: &Path,
    content: &str,
    config: &LoadConfig,
    records: &mut Vec<LogRecord>,
) -> (FileSummary, bool) {
    let mut summary = FileSummary {
        path: path.to_path_buf(),
        records: 0,
        earliest: None,
        latest: None,
        unterminated: false,
    };

    let mut assembled = assemble(physical_lines(content));
    let mut capped = false;

    for piece in assembled.by_ref() {
        if records.len() >= config.max_total_records {
            capped = true;
            break;
        }

        let (timestamp, level) = classify(&piece.text);
        tracing::trace!(
            file = %path.display(),
            line = piece.first_line,
            level = %level,
            text = preview(&piece.text),
            "Record assembled"
        );

        let record = LogRecord {
            id: RecordId(records.len() as u64),
            text: piece.text,
            timestamp,
            level,
            source_file: path.to_path_buf(),
            line_number: piece.first_line,
            pinned: false,
        };

        if record.has_timestamp() {
            let ts = record.timestamp.and_utc();
            summary.earliest = Some(summary.earliest.map_or(ts, |e| e.min(ts)));
            summary.latest = Some(summary.latest.map_or(ts, |l| l.max(ts)));
        }

        summary.records += 1;
        records.push(record);
    }

    if !capped {
        if let Some(open) = assembled.unterminated() {
            tracing::debug!(
                file = %path.display(),
                first_line = open.first_line,
                depth = open.depth,
                bytes = open.len,
                "Unbalanced trailing buffer discarded"
            );
            summary.unterminated = true;
        }
    }

    tracing::debug!(
        file = %path.display(),
        records = summary.records,
        lines = assembled.lines_seen(),
        "File loaded"
    );

    (summary, capped)
}

fn record_error(report: &mut LoadReport, err: LoadError) {
    let path = err.path().clone();
    let err = LogSieveError::from(err);
    tracing::warn!(error = %err, "File load failed");
    report.errors.push(FileError {
        path,
        message: err.to_string(),
    });
}
