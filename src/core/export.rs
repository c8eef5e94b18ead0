// LogSieve - core/export.rs
//
// CSV and JSON export of an ordered view.
// Core layer: writes to any Write trait object.

use crate::core::query::View;
use crate::util::constants::TIMESTAMP_FORMAT;
use crate::util::error::ExportError;
use std::io::Write;

/// Export a view to CSV in view order.
///
/// Writes: id, timestamp, level, pinned, matched, source_file, line, text.
/// Records without a timestamp get an empty timestamp cell.
pub fn export_csv<W: Write>(view: &View<'_>, writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "id",
            "timestamp",
            "level",
            "pinned",
            "matched",
            "source_file",
            "line",
            "text",
        ])
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for row in &view.rows {
        let record = row.record;
        let ts = if record.has_timestamp() {
            record.timestamp.format(TIMESTAMP_FORMAT).to_string()
        } else {
            String::new()
        };

        let id = record.id.to_string();
        let source = record.source_file.display().to_string();
        let line = record.line_number.to_string();

        csv_writer
            .write_record([
                id.as_str(),
                ts.as_str(),
                record.level.label(),
                if record.pinned { "true" } else { "false" },
                if row.is_matched { "true" } else { "false" },
                source.as_str(),
                line.as_str(),
                record.text.as_str(),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    Ok(count)
}

/// JSON shape of one exported row.
#[derive(serde::Serialize)]
struct JsonRow<'a> {
    id: u64,
    timestamp: Option<String>,
    level: &'a str,
    pinned: bool,
    matched: bool,
    source_file: String,
    line: u64,
    text: &'a str,
}

/// Export a view to JSON (array of objects) in view order.
/// Records without a timestamp export `"timestamp": null`.
pub fn export_json<W: Write>(view: &View<'_>, writer: W) -> Result<usize, ExportError> {
    let rows: Vec<JsonRow<'_>> = view
        .rows
        .iter()
        .map(|row| {
            let record = row.record;
            JsonRow {
                id: record.id.0,
                timestamp: record
                    .has_timestamp()
                    .then(|| record.timestamp.format(TIMESTAMP_FORMAT).to_string()),
                level: record.level.label(),
                pinned: record.pinned,
                matched: row.is_matched,
                source_file: record.source_file.display().to_string(),
                line: record.line_number,
                text: &record.text,
            }
        })
        .collect();

    serde_json::to_writer_pretty(writer, &rows).map_err(|e| ExportError::Json { source: e })?;
    Ok(rows.len())
}
