// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build identity parsed from a log file name

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Identity of the CI job that produced a log
///
/// Purely descriptive; copied unchanged into the output record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIdentity {
    /// Build number within the repository
    pub build_number: String,
    /// Globally unique build ID
    pub build_id: String,
    /// Job ID within the build
    pub job_id: String,
    /// Commit SHA the build ran against
    pub commit_sha: String,
}

impl LogIdentity {
    /// Parse a log file name
    ///
    /// Accepts `<build_number>_<build_id>_<commit_sha>_<job_id>.log` and the
    /// older `<build_number>_<commit_sha>_<build_id>.log`. Any directory part
    /// of `filename` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::MalformedIdentity` when the name has neither shape.
    pub fn parse(filename: &str) -> Result<Self, AnalysisError> {
        let path = Path::new(filename);
        let stem = match path.extension().and_then(|e| e.to_str()) {
            Some("log") => path.file_stem(),
            _ => path.file_name(),
        }
        .and_then(|s| s.to_str())
        .unwrap_or_default();

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(AnalysisError::MalformedIdentity {
                filename: filename.to_string(),
            });
        }

        match parts.as_slice() {
            [build_number, build_id, commit_sha, job_id] => Ok(Self {
                build_number: (*build_number).to_string(),
                build_id: (*build_id).to_string(),
                job_id: (*job_id).to_string(),
                commit_sha: (*commit_sha).to_string(),
            }),
            [build_number, commit_sha, build_id] => Ok(Self {
                build_number: (*build_number).to_string(),
                build_id: (*build_id).to_string(),
                job_id: String::new(),
                commit_sha: (*commit_sha).to_string(),
            }),
            _ => Err(AnalysisError::MalformedIdentity {
                filename: filename.to_string(),
            }),
        }
    }
}
