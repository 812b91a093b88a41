//! Formatting runs over many files
//!
//! A [Runner] owns the loaded configuration, picks the options for each input from its
//! extension, and formats in one of three modes: print the result, rewrite files in place,
//! or only report which files would change.

use crate::config::FmtConfig;
use crate::dialect::Dialect;
use crate::formatter::{unified_diff, FormatOptions, Formatter};
use crate::processor::{read_source, ProcessingError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Formatter execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Stdout,
    Write,
    Check,
}

/// Aggregate run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub files_seen: usize,
    pub files_changed: usize,
    pub files_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    /// Formatted text, kept in [FormatMode::Stdout] only.
    pub formatted: Option<String>,
    /// Unified diff, kept in [FormatMode::Check] for changed files.
    pub diff: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn has_changes(&self) -> bool {
        self.summary.files_changed > 0
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    config: FmtConfig,
    dialect: Option<Dialect>,
}

impl Runner {
    pub fn new(config: FmtConfig) -> Self {
        Self {
            config,
            dialect: None,
        }
    }

    /// Force one dialect for every input instead of choosing by extension.
    pub fn with_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Options for an input; `None` is stdin.
    pub fn options_for(&self, path: Option<&Path>) -> FormatOptions {
        let mut options = self.config.options_for(path);
        if let Some(dialect) = self.dialect {
            options.dialect = dialect;
        }
        options
    }

    pub fn formatter_for(&self, path: Option<&Path>) -> Formatter {
        Formatter::new(self.options_for(path))
    }

    pub fn format_source(&self, source: &str, path: Option<&Path>) -> String {
        self.formatter_for(path).format(source)
    }

    /// Format every path. Unreadable inputs are counted as failures and skipped; a failed
    /// write aborts the run.
    pub fn run_paths(&self, paths: &[PathBuf], mode: FormatMode) -> Result<RunReport, ProcessingError> {
        let mut report = RunReport {
            summary: RunSummary::default(),
            files: Vec::with_capacity(paths.len()),
        };
        for path in paths {
            report.summary.files_seen += 1;
            let input = match read_source(path) {
                Ok(input) => input,
                Err(err) => {
                    warn!(%err, "skipping input");
                    report.summary.files_failed += 1;
                    continue;
                }
            };
            let options = self.options_for(Some(path));
            debug!(path = %path.display(), dialect = %options.dialect, "formatting file");
            let formatted = Formatter::new(options).format(&input);
            let changed = formatted != input;

            let mut file = FileReport {
                path: path.clone(),
                changed,
                formatted: None,
                diff: None,
            };
            if changed {
                report.summary.files_changed += 1;
            }
            match mode {
                FormatMode::Stdout => file.formatted = Some(formatted),
                FormatMode::Write if changed => {
                    fs::write(path, &formatted).map_err(|source| ProcessingError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    info!(path = %path.display(), "formatted");
                }
                FormatMode::Check if changed => {
                    let name = path.display().to_string();
                    file.diff = Some(unified_diff(&input, &formatted, &name));
                }
                FormatMode::Write | FormatMode::Check => {}
            }
            report.files.push(file);
        }
        Ok(report)
    }
}
