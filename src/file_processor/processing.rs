//! Formatting files on disk.

use crate::beautifier::Beautifier;
use crate::config::OnError;
use crate::formatter::{FormatError, format_alpine};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Rewrite files whose formatting changed
    Write,
    /// Only report files that would change
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Formatted,
    WouldReformat,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("{path}: {source}")]
    Format { path: String, source: FormatError },
}

/// Format one file.
///
/// The file is only written in [`FormatMode::Write`] and only when its content changed.
pub fn process_file(path: &Path, beautifier: &dyn Beautifier, mode: FormatMode) -> Result<FileOutcome, ProcessError> {
    let display_path = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|source| ProcessError::Read {
        path: display_path.clone(),
        source,
    })?;

    let formatted = format_alpine(&content, beautifier).map_err(|source| ProcessError::Format {
        path: display_path.clone(),
        source,
    })?;

    if formatted == content {
        return Ok(FileOutcome::Unchanged);
    }

    match mode {
        FormatMode::Check => Ok(FileOutcome::WouldReformat),
        FormatMode::Write => {
            fs::write(path, formatted).map_err(|source| ProcessError::Write {
                path: display_path,
                source,
            })?;
            Ok(FileOutcome::Formatted)
        }
    }
}

/// Results of formatting a batch of files.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub formatted: Vec<PathBuf>,
    pub would_reformat: Vec<PathBuf>,
    /// Files left untouched because of an error, under `on-error = "skip"` or `"warn"`
    pub skipped: Vec<(PathBuf, ProcessError)>,
}

impl BatchSummary {
    pub fn changed(&self) -> usize {
        self.formatted.len() + self.would_reformat.len()
    }
}

enum Processed {
    Done(PathBuf, FileOutcome),
    Skipped(PathBuf, ProcessError),
}

/// Format a batch of files, in parallel when the `parallel` feature is enabled.
///
/// With [`OnError::Fail`] the first error stops the batch and is returned.
/// Files finished before that point keep their new content.
pub fn process_files(
    files: &[PathBuf],
    beautifier: &dyn Beautifier,
    mode: FormatMode,
    on_error: OnError,
) -> Result<BatchSummary, ProcessError> {
    let run = |path: &PathBuf| -> Result<Processed, ProcessError> {
        match process_file(path, beautifier, mode) {
            Ok(outcome) => {
                log::debug!("[alpinefmt] {}: {outcome:?}", path.display());
                Ok(Processed::Done(path.clone(), outcome))
            }
            Err(e) if on_error == OnError::Fail => Err(e),
            Err(e) => {
                log::debug!("[alpinefmt] Skipping {}: {e}", path.display());
                Ok(Processed::Skipped(path.clone(), e))
            }
        }
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Processed> = files.par_iter().map(run).collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Processed> = files.iter().map(run).collect::<Result<_, _>>()?;

    let mut summary = BatchSummary::default();
    for result in results {
        summary.processed += 1;
        match result {
            Processed::Done(_, FileOutcome::Unchanged) => {}
            Processed::Done(path, FileOutcome::Formatted) => summary.formatted.push(path),
            Processed::Done(path, FileOutcome::WouldReformat) => summary.would_reformat.push(path),
            Processed::Skipped(path, e) => summary.skipped.push((path, e)),
        }
    }

    Ok(summary)
}
