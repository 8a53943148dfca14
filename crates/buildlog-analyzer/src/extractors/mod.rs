// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test-statistics extractors
//!
//! One extractor exists per build tool or language. Each one scans the
//! out-of-fold content of a split log, accumulates into a [`TestStats`], and
//! reports whether the tests failed. Line recognition is expressed as ordered
//! [`Rule`] lists: the first rule whose pattern matches a line handles it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

pub mod ant;
pub mod go;
pub mod gradle;
pub mod maven;
pub mod python;
pub mod ruby;
pub mod time;

pub use ant::AntExtractor;
pub use go::GoExtractor;
pub use gradle::GradleExtractor;
pub use maven::MavenExtractor;
pub use python::PythonExtractor;
pub use ruby::RubyExtractor;

/// A test-statistics extractor for one build tool or language
pub trait Extractor: Send {
    /// Analyzer tag recorded in the output, e.g. `java-maven`
    fn analyzer(&self) -> &'static str;

    /// Scan the log and accumulate statistics
    ///
    /// # Errors
    ///
    /// Returns an `ExtractorError` when a recognized line carries a value
    /// that cannot be converted. Statistics accumulated before the fault are
    /// kept.
    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError>;

    /// Whether the tests failed, by this tool's own definition
    fn reports_test_failure(&self) -> bool {
        let stats = self.stats();
        stats.failed > 0 || !stats.failing_tests().is_empty()
    }

    /// Statistics accumulated so far
    fn stats(&self) -> &TestStats;

    /// Consume the extractor, yielding its statistics
    fn into_stats(self: Box<Self>) -> TestStats;
}

// ============================================================================
// Rule lists
// ============================================================================

/// Line handler invoked with the captures of a matching rule
pub(crate) type Handler<S> = fn(&mut S, &Captures<'_>) -> Result<(), ExtractorError>;

/// A pattern paired with the handler that consumes its matches
pub(crate) struct Rule<S: 'static> {
    pub(crate) pattern: &'static LazyLock<Regex>,
    pub(crate) handler: Handler<S>,
}

/// Apply the first matching rule to `line`
///
/// Returns `Ok(true)` if some rule matched.
pub(crate) fn apply_rules<S>(
    rules: &[Rule<S>],
    state: &mut S,
    line: &str,
) -> Result<bool, ExtractorError> {
    for rule in rules {
        if let Some(caps) = rule.pattern.captures(line) {
            (rule.handler)(state, &caps)?;
            return Ok(true);
        }
    }
    Ok(false)
}

// ============================================================================
// Capture helpers
// ============================================================================

/// Parse capture group `group` as a count; a missing group counts as zero
pub(crate) fn count(caps: &Captures<'_>, group: usize) -> Result<u64, ExtractorError> {
    match caps.get(group) {
        None => Ok(0),
        Some(m) => m.as_str().parse().map_err(|_| ExtractorError::InvalidCount {
            value: m.as_str().to_string(),
            line: caps[0].to_string(),
        }),
    }
}

/// Add `n` to a running count, failing on overflow instead of wrapping
pub(crate) fn add_count(total: &mut u64, n: u64, line: &str) -> Result<(), ExtractorError> {
    *total = total
        .checked_add(n)
        .ok_or_else(|| ExtractorError::InvalidCount {
            value: n.to_string(),
            line: line.to_string(),
        })?;
    Ok(())
}

/// Sum of the counts in `groups`
pub(crate) fn count_sum(caps: &Captures<'_>, groups: &[usize]) -> Result<u64, ExtractorError> {
    let mut total = 0;
    for &group in groups {
        add_count(&mut total, count(caps, group)?, &caps[0])?;
    }
    Ok(total)
}

/// Parse capture group `group` as seconds; a missing group counts as zero
pub(crate) fn seconds(caps: &Captures<'_>, group: usize) -> Result<f64, ExtractorError> {
    match caps.get(group) {
        None => Ok(0.0),
        Some(m) => m
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| ExtractorError::InvalidDuration {
                value: m.as_str().to_string(),
                line: caps[0].to_string(),
            }),
    }
}

/// Capture group `group` as a trimmed string, empty when missing
pub(crate) fn text<'h>(caps: &Captures<'h>, group: usize) -> &'h str {
    caps.get(group).map_or("", |m| m.as_str().trim())
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
