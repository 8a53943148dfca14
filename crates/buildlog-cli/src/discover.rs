// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Log file discovery

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of analyzable log files
pub const LOG_EXTENSION: &str = "log";

/// Discovery errors
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// Input path not found
    #[error("Input path not found: {0}")]
    NotFound(PathBuf),
}

/// Collect the logs to analyze
///
/// A file input is returned as is, whatever its extension. A directory input
/// yields its `.log` files sorted by path; subdirectories are only entered
/// when `recursive` is set. Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns `DiscoverError::NotFound` if `input` does not exist.
pub fn discover_logs(input: &Path, recursive: bool) -> Result<Vec<PathBuf>, DiscoverError> {
    if !input.exists() {
        return Err(DiscoverError::NotFound(input.to_path_buf()));
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let logs: Vec<PathBuf> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
        .collect();

    debug!(input = %input.display(), recursive, found = logs.len(), "Discovered logs");
    Ok(logs)
}
