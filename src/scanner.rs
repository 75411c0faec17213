use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// File scanner for discovering TypeScript source files matched by glob
/// patterns.
///
/// The `FileScanner` walks the project root, skipping hidden directories and
/// `node_modules`, and keeps files whose root-relative path (with `/`
/// separators) matches any of the patterns. Patterns use `globset` syntax
/// with `*` stopping at `/`. A pattern starting with `!` excludes the files
/// it matches.
pub struct FileScanner {
    root_path: PathBuf,
    patterns: Vec<String>,
}

/// Result of a file scan operation.
pub struct ScanResult {
    /// Matched files, sorted by path
    pub ts_files: Vec<PathBuf>,
    /// Warnings about inaccessible paths
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf, patterns: Vec<String>) -> Self {
        Self { root_path, patterns }
    }

    /// Scans the root directory.
    ///
    /// Inaccessible paths are reported as warnings rather than failing the
    /// scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a pattern is not a valid glob.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tsdoc_meta::scanner::FileScanner;
    /// use std::path::PathBuf;
    ///
    /// let scanner = FileScanner::new(PathBuf::from("./app"), vec!["src/**/*.ts".to_string()]);
    /// let result = scanner.scan().unwrap();
    /// println!("Found {} TypeScript files", result.ts_files.len());
    /// ```
    pub fn scan(&self) -> Result<ScanResult> {
        let (excludes, includes): (Vec<&String>, Vec<&String>) =
            self.patterns.iter().partition(|pattern| pattern.starts_with('!'));
        let include_set = build_globset(includes.iter().map(|p| p.as_str()))?;
        let exclude_set = build_globset(excludes.iter().map(|p| &p[1..]))?;

        let mut ts_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).into_iter().filter_entry(|e| {
            if e.path() == self.root_path {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            let is_hidden = file_name.starts_with('.');
            let is_dependency = file_name == "node_modules";
            !is_hidden && !is_dependency
        }) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let Ok(relative) = entry.path().strip_prefix(&self.root_path) else {
                        continue;
                    };
                    let relative = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    if include_set.is_match(&relative) && !exclude_set.is_match(&relative) {
                        ts_files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        ts_files.sort();
        debug!("Matched {} files under {}", ts_files.len(), self.root_path.display());
        Ok(ScanResult { ts_files, warnings })
    }
}

/// Compiles root-relative globs into one matcher.
fn build_globset<'p>(patterns: impl Iterator<Item = &'p str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = pattern.trim().trim_start_matches("./");
        if normalized.is_empty() {
            continue;
        }
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::Config(format!("invalid scan pattern `{}`: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::Config(format!("failed to build scan matcher: {}", e)))
}
