// LogSieve - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::SearchMode;
use crate::util::constants;
use crate::util::error::{ConfigError, LogSieveError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogSieve configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logsieve/ or %APPDATA%\LogSieve\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[loading]` section.
    pub loading: LoadingSection,
    /// `[search]` section.
    pub search: SearchSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum files taken from directory inputs.
    pub max_files: Option<usize>,
    /// Include glob patterns for files inside directories.
    pub include_patterns: Option<Vec<String>>,
}

/// `[loading]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoadingSection {
    /// Cap on records held in memory.
    pub max_total_records: Option<usize>,
    /// Files at or above this size are memory-mapped.
    pub large_file_threshold_bytes: Option<u64>,
}

/// `[search]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// "and" or "or".
    pub default_mode: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    pub max_depth: usize,
    pub max_files: usize,
    pub include_patterns: Vec<String>,

    // -- Loading --
    pub max_total_records: usize,
    pub large_file_threshold: u64,

    // -- Search --
    pub default_search_mode: SearchMode,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_total_records: constants::MAX_TOTAL_RECORDS,
            large_file_threshold: constants::DEFAULT_LARGE_FILE_THRESHOLD,
            default_search_mode: SearchMode::And,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw(&config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let err = LogSieveError::from(e);
            tracing::warn!(error = %err, "Config file rejected");
            let msg = format!("{err}. Using defaults.");
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, warnings) = validate(raw);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn out_of_range(field: &str, value: String, expected: String, default: String) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value,
        expected,
    };
    format!("{err}. Using default ({default}).")
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(out_of_range(
                "[discovery] max_depth",
                depth.to_string(),
                format!("1-{}", constants::ABSOLUTE_MAX_DEPTH),
                constants::DEFAULT_MAX_DEPTH.to_string(),
            ));
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            warnings.push(out_of_range(
                "[discovery] max_files",
                files.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_FILES,
                    constants::ABSOLUTE_MAX_FILES
                ),
                constants::DEFAULT_MAX_FILES.to_string(),
            ));
        }
    }

    // -- Discovery: include_patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        let (valid, invalid): (Vec<String>, Vec<String>) = patterns
            .into_iter()
            .partition(|p| glob::Pattern::new(p).is_ok());
        for p in &invalid {
            warnings.push(format!(
                "[discovery] include_patterns entry \"{p}\" is not a valid glob and was ignored."
            ));
        }
        config.include_patterns = valid;
    }

    // -- Loading: max_total_records --
    if let Some(max) = raw.loading.max_total_records {
        if (constants::MIN_MAX_TOTAL_RECORDS..=constants::MAX_TOTAL_RECORDS).contains(&max) {
            config.max_total_records = max;
        } else {
            warnings.push(out_of_range(
                "[loading] max_total_records",
                max.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_TOTAL_RECORDS,
                    constants::MAX_TOTAL_RECORDS
                ),
                constants::MAX_TOTAL_RECORDS.to_string(),
            ));
        }
    }

    // -- Loading: large_file_threshold_bytes --
    if let Some(bytes) = raw.loading.large_file_threshold_bytes {
        if bytes >= constants::MIN_LARGE_FILE_THRESHOLD {
            config.large_file_threshold = bytes;
        } else {
            warnings.push(out_of_range(
                "[loading] large_file_threshold_bytes",
                bytes.to_string(),
                format!(">= {}", constants::MIN_LARGE_FILE_THRESHOLD),
                constants::DEFAULT_LARGE_FILE_THRESHOLD.to_string(),
            ));
        }
    }

    // -- Search: default_mode --
    if let Some(ref mode) = raw.search.default_mode {
        match mode.parse::<SearchMode>() {
            Ok(m) => config.default_search_mode = m,
            Err(_) => warnings.push(format!(
                "[search] default_mode = \"{mode}\" is not recognised. \
                 Expected \"and\" or \"or\". Using default (and).",
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}
