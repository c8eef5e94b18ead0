// LogSieve - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Loading the input files into a session
// 4. Running one view command and rendering it

use clap::{Args, Parser, Subcommand, ValueEnum};
use logsieve::app::session::Session;
use logsieve::core::export::{export_csv, export_json};
use logsieve::core::model::{LevelCounts, RecordId, SearchMode};
use logsieve::core::query::View;
use logsieve::platform::config::{load_config, PlatformPaths};
use logsieve::util;
use logsieve::util::error::LogSieveError;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for rejected user input (e.g. a malformed time range).
const EXIT_USAGE: u8 = 2;

/// LogSieve - reconstruct multi-line log records and query them.
///
/// Brace-balanced blocks spanning several lines are joined into one record,
/// classified by timestamp and level, and presented in timestamp order with
/// pinned records on top.
#[derive(Parser, Debug)]
#[command(name = "logsieve", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Toggle the pin on a record id before the command runs. Repeatable.
    #[arg(long = "pin", value_name = "ID", global = true)]
    pins: Vec<u64>,

    /// Output format for the view.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Log files or directories to load.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every record.
    Show(Inputs),

    /// Show records containing the search terms.
    Search {
        /// Whitespace-separated search terms.
        text: String,

        /// How terms combine (defaults to [search] default_mode).
        #[arg(long)]
        mode: Option<SearchMode>,

        #[command(flatten)]
        inputs: Inputs,
    },

    /// Show records with from <= timestamp <= to (YYYY-MM-DD HH:MM:SS).
    Range {
        from: String,
        to: String,

        #[command(flatten)]
        inputs: Inputs,
    },

    /// Show only pinned records.
    Pinned(Inputs),

    /// Print level counts for everything loaded.
    Stats(Inputs),
}

impl Command {
    fn inputs(&self) -> &Inputs {
        match self {
            Command::Show(inputs) | Command::Pinned(inputs) | Command::Stats(inputs) => inputs,
            Command::Search { inputs, .. } | Command::Range { inputs, .. } => inputs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config first: its [logging] level feeds logging init.
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_dir);
    let (config, config_warnings) = load_config(&config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogSieve starting"
    );

    for warning in &config_warnings {
        eprintln!("warning: {warning}");
    }

    let mut session = Session::from_config(&config);
    let report = session.load_files(&cli.command.inputs().paths);

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for err in &report.errors {
        eprintln!("warning: {}", err.message);
    }

    for &raw in &cli.pins {
        match session.toggle_pin(RecordId(raw)) {
            Ok(pinned) => tracing::debug!(id = raw, pinned, "Pin toggled"),
            Err(e) => eprintln!("warning: {}", LogSieveError::from(e)),
        }
    }

    let view = match &cli.command {
        Command::Show(_) => session.show_all(),
        Command::Pinned(_) => session.show_pinned_only(),
        Command::Search { text, mode, .. } => {
            session.search(text, mode.unwrap_or(config.default_search_mode))
        }
        Command::Range { from, to, .. } => match session.apply_time_filter(from, to) {
            Ok(view) => view,
            Err(e) => {
                let err = LogSieveError::from(e);
                tracing::warn!(error = %err, "Time range rejected");
                eprintln!("error: {err}");
                return ExitCode::from(EXIT_USAGE);
            }
        },
        Command::Stats(_) => {
            return finish(print_stats(&session.stats(), cli.format));
        }
    };

    finish(print_view(&view, &session.stats(), cli.format))
}

fn finish(result: util::error::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Output failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_view(view: &View<'_>, counts: &LevelCounts, format: Format) -> util::error::Result<()> {
    let stdout = std::io::stdout();
    let out = stdout.lock();

    match format {
        Format::Csv => {
            export_csv(view, out)?;
        }
        Format::Json => {
            export_json(view, out)?;
        }
        Format::Text => write_text(view, counts, out).map_err(stdout_error)?,
    }
    Ok(())
}

/// One line per record: pin and match markers, id, timestamp, level, text.
/// The summary line always covers the whole store.
fn write_text<W: Write>(view: &View<'_>, counts: &LevelCounts, mut out: W) -> std::io::Result<()> {
    for row in &view.rows {
        let record = row.record;
        let timestamp = if record.has_timestamp() {
            record.timestamp.format(util::constants::TIMESTAMP_FORMAT).to_string()
        } else {
            "-".to_string()
        };
        writeln!(
            out,
            "{}{} [{}] {} {:<4} {}",
            if record.pinned { '*' } else { ' ' },
            if row.is_matched { '>' } else { ' ' },
            record.id,
            timestamp,
            record.level.short_label(),
            record.text
        )?;
    }
    writeln!(out, "{}", counts.summary_line())?;
    out.flush()
}

fn print_stats(counts: &LevelCounts, format: Format) -> util::error::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, counts)
                .map_err(|e| stdout_error(e.into()))?;
            writeln!(out).map_err(stdout_error)?;
        }
        Format::Csv => {
            write_stats_csv(counts, &mut out).map_err(|e| stdout_error(e.into()))?;
        }
        Format::Text => {
            writeln!(out, "{}", counts.summary_line()).map_err(stdout_error)?;
            writeln!(out, "Debug: {}", counts.debug).map_err(stdout_error)?;
        }
    }
    Ok(())
}

fn write_stats_csv<W: Write>(counts: &LevelCounts, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["total", "info", "warn", "error", "debug"])?;
    writer.write_record([
        counts.total.to_string(),
        counts.info.to_string(),
        counts.warn.to_string(),
        counts.error.to_string(),
        counts.debug.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

fn stdout_error(source: std::io::Error) -> LogSieveError {
    LogSieveError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "write",
        source,
    }
}
