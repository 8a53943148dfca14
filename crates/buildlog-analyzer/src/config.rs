// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Tunable thresholds for detection and status analysis
//!
//! The defaults were found empirically on Travis CI logs. They are heuristics,
//! not invariants, and callers analyzing a different corpus may adjust them.

use serde::{Deserialize, Serialize};

/// Default minimum token count for the frequency-based language fallback
pub const DEFAULT_LANGUAGE_THRESHOLD: usize = 3;

/// Default minimum token count for the Java build-tool sniff
pub const DEFAULT_TOOL_SNIFF_THRESHOLD: usize = 2;

/// Default number of trailing non-blank lines inspected for the build status
pub const DEFAULT_STATUS_TAIL_LINES: usize = 5;

/// Thresholds used by a [`crate::LogAnalyzer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Occurrences of a language token needed when no metadata fold exists
    pub language_threshold: usize,
    /// Occurrences of a build-tool token needed to pick that Java tool
    pub tool_sniff_threshold: usize,
    /// Trailing non-blank out-of-fold lines searched for status markers
    pub status_tail_lines: usize,
}

impl AnalyzerConfig {
    /// Override the language fallback threshold
    #[must_use]
    pub fn with_language_threshold(mut self, threshold: usize) -> Self {
        self.language_threshold = threshold;
        self
    }

    /// Override the Java tool sniff threshold
    #[must_use]
    pub fn with_tool_sniff_threshold(mut self, threshold: usize) -> Self {
        self.tool_sniff_threshold = threshold;
        self
    }

    /// Override the status tail window
    #[must_use]
    pub fn with_status_tail_lines(mut self, lines: usize) -> Self {
        self.status_tail_lines = lines;
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            language_threshold: DEFAULT_LANGUAGE_THRESHOLD,
            tool_sniff_threshold: DEFAULT_TOOL_SNIFF_THRESHOLD,
            status_tail_lines: DEFAULT_STATUS_TAIL_LINES,
        }
    }
}
