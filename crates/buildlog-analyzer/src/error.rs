// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for buildlog-analyzer

use thiserror::Error;

/// Errors and degradations that can occur while analyzing one build log
///
/// Only [`AnalysisError::EmptyLog`] aborts an analysis. Every other kind is
/// attached to the finished [`crate::AnalysisResult`] as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The log contained no text at all
    #[error("Log is empty: {filename}")]
    EmptyLog {
        /// File name of the empty log
        filename: String,
    },

    /// The file name does not follow a known `<build>_<id>_<sha>_<job>.log` shape
    #[error("Malformed log identity: {filename}")]
    MalformedIdentity {
        /// The file name that could not be parsed
        filename: String,
    },

    /// No fold markers were found, so detection fell back to heuristics
    #[error("No folds detected, analyzing whole log content")]
    NoFoldsDetected,

    /// No extractor exists for the detected (or undetected) language
    #[error("Unrecognized ecosystem: {language}")]
    UnrecognizedEcosystem {
        /// Declared language, or `<none>` when nothing was detected
        language: String,
    },

    /// An extractor failed part-way; results hold whatever was accumulated
    #[error("Extractor {analyzer} failed: {message}")]
    ExtractorInternalError {
        /// Analyzer tag of the failing extractor
        analyzer: String,
        /// Description of the fault
        message: String,
    },
}

impl AnalysisError {
    /// Whether this error prevents a result from being produced
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EmptyLog { .. })
    }
}

/// Faults raised inside a test-statistics extractor
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// A captured count did not fit the counter type
    #[error("Invalid count {value:?} in line {line:?}")]
    InvalidCount {
        /// The captured digits
        value: String,
        /// The offending log line
        line: String,
    },

    /// A captured duration could not be parsed
    #[error("Invalid duration {value:?} in line {line:?}")]
    InvalidDuration {
        /// The captured text
        value: String,
        /// The offending log line
        line: String,
    },
}
