// LogSieve - core/discovery.rs
//
// Expansion of user-supplied input paths into the list of files to load.
//
// Explicitly named files are taken as-is, whatever their extension, and
// paths that cannot be inspected are passed through so the loader reports
// them as per-file errors. Directories are walked with `walkdir` and only
// files matching the include globs are kept.
//
// Traversal problems (unreadable subdirectories, non-UTF-8 names, the file
// cap) are non-fatal and returned as warnings.

use std::collections::HashSet;
use std::path::PathBuf;

/// Configuration for expanding directory inputs.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of files taken from directory walks, across all inputs.
    pub max_files: usize,

    /// Filename globs a file inside a directory must match to be included.
    pub include_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Expand `inputs` into an ordered, de-duplicated file list.
///
/// Returns the files and a list of human-readable warnings.
pub fn expand_paths(inputs: &[PathBuf], config: &DiscoveryConfig) -> (Vec<PathBuf>, Vec<String>) {
    use crate::util::constants;

    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let include_pats = compile_patterns(&config.include_patterns);

    let mut files: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut walked = 0usize;
    let mut capped = false;

    for input in inputs {
        let is_dir = std::fs::metadata(input).map(|m| m.is_dir()).unwrap_or(false);

        if !is_dir {
            if seen.insert(input.clone()) {
                files.push(input.clone());
            }
            continue;
        }

        if capped {
            tracing::debug!(root = %input.display(), "File cap reached, directory skipped");
            continue;
        }

        tracing::debug!(root = %input.display(), max_depth, "Expanding directory");

        let walker = walkdir::WalkDir::new(input)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    let path_str = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    let msg = format!("Cannot access '{path_str}': {e}");
                    tracing::debug!(warning = %msg, "Discovery warning");
                    warnings.push(msg);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            };

            if !is_included(file_name, &include_pats) {
                tracing::trace!(file = file_name, "Not matched by include patterns");
                continue;
            }

            if walked >= max_files {
                warnings.push(format!(
                    "Directory inputs contain more than {max_files} log files; \
                     only the first {max_files} were taken from directories. Raise \
                     [discovery] max_files or name the files explicitly."
                ));
                tracing::info!(limit = max_files, "Directory expansion truncated");
                capped = true;
                break;
            }

            if seen.insert(path.to_path_buf()) {
                files.push(path.to_path_buf());
                walked += 1;
            }
        }
    }

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Path expansion complete"
    );

    (files, warnings)
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile glob strings; invalid patterns are logged and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// An empty pattern list includes everything.
fn is_included(file_name: &str, patterns: &[glob::Pattern]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_explicit_file_taken_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("service.out");
        fs::write(&file, "x").unwrap();

        let (files, warnings) = expand_paths(&[file.clone()], &DiscoveryConfig::default());
        assert_eq!(files, vec![file]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_path_passed_through() {
        let missing = PathBuf::from("/nonexistent/logsieve/missing.log");
        let (files, _) = expand_paths(&[missing.clone()], &DiscoveryConfig::default());
        assert_eq!(files, vec![missing]);
    }

    #[test]
    fn test_directory_filtered_by_include_patterns_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.log"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("image.png"), "p").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("c.log"), "c").unwrap();

        let (files, warnings) =
            expand_paths(&[root.to_path_buf()], &DiscoveryConfig::default());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.log", "c.log"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_max_files_truncates_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.log", "2.log", "3.log"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let config = DiscoveryConfig {
            max_files: 2,
            ..Default::default()
        };
        let (files, warnings) = expand_paths(&[dir.path().to_path_buf()], &config);
        assert_eq!(files.len(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_max_files_keeps_later_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("1.log"), "x").unwrap();
        fs::write(logs.join("2.log"), "x").unwrap();
        let more = dir.path().join("more");
        fs::create_dir(&more).unwrap();
        fs::write(more.join("3.log"), "x").unwrap();
        let explicit = dir.path().join("explicit.out");
        fs::write(&explicit, "x").unwrap();

        let config = DiscoveryConfig {
            max_files: 1,
            ..Default::default()
        };
        let inputs = vec![logs.clone(), more, explicit.clone()];
        let (files, warnings) = expand_paths(&inputs, &config);
        assert_eq!(files, vec![logs.join("1.log"), explicit]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_duplicates_removed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.log");
        fs::write(&file, "x").unwrap();
        let inputs = vec![file.clone(), dir.path().to_path_buf(), file.clone()];
        let (files, _) = expand_paths(&inputs, &DiscoveryConfig::default());
        assert_eq!(files, vec![file]);
    }
}
