// LogSieve - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogSieve";

/// Application identifier used for config directories.
pub const APP_ID: &str = "LogSieve";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Record classification
// =============================================================================

/// The single timestamp layout recognised inside record text and accepted
/// by the time-range filter (chrono format string).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Regex locating a `YYYY-MM-DD HH:MM:SS` substring anywhere in a record.
pub const TIMESTAMP_PATTERN: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}";

/// Human-readable form of `TIMESTAMP_FORMAT`, used in error messages.
pub const TIMESTAMP_FORMAT_HINT: &str = "YYYY-MM-DD HH:MM:SS";

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth when a directory is given as input.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of files expanded from directory inputs in one load.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Default include glob patterns applied to files found inside directories.
/// Explicitly named files are always accepted.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.txt"];

// =============================================================================
// Loading limits
// =============================================================================

/// File size threshold in bytes above which the file is memory-mapped
/// instead of read into a heap buffer.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

/// Minimum user-configurable large-file threshold.
pub const MIN_LARGE_FILE_THRESHOLD: u64 = 1024 * 1024; // 1 MB

/// Hard upper bound on the number of records held in memory at once.
/// At roughly 1 KB per record this caps record memory near 1 GB.
pub const MAX_TOTAL_RECORDS: usize = 1_000_000;

/// Minimum user-configurable record cap.
pub const MIN_MAX_TOTAL_RECORDS: usize = 1_000;

/// Retry limits for transient I/O errors while reading a file.
pub const MAX_READ_RETRIES: u32 = 3;

/// Backoff between read retries (ms), indexed by attempt.
pub const READ_RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum characters of record text included in debug output.
/// Prevents accidental exposure of sensitive data in long records.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
