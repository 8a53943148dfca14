// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Analysis results and their flat output projection

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::identity::LogIdentity;
use crate::stats::SuiteCounts;
use crate::status::BuildStatus;

/// Separator used when a list is flattened into one output column
pub const LIST_SEPARATOR: &str = "#";

/// Output column names, in output order
pub const COLUMNS: [&str; 21] = [
    "tr_build_id",
    "tr_job_id",
    "tr_build_number",
    "tr_original_commit",
    "tr_log_lan",
    "tr_log_status",
    "tr_log_setup_time",
    "tr_log_analyzer",
    "tr_log_frameworks",
    "tr_log_bool_tests_ran",
    "tr_log_bool_tests_failed",
    "tr_log_num_tests_ok",
    "tr_log_num_tests_failed",
    "tr_log_num_tests_run",
    "tr_log_num_tests_skipped",
    "tr_log_num_test_suites_run",
    "tr_log_num_test_suites_ok",
    "tr_log_num_test_suites_failed",
    "tr_log_tests_failed",
    "tr_log_testduration",
    "tr_log_buildduration",
];

/// Everything learned from one build log
///
/// Counts are `None` when the extractor never saw test activity; an
/// initialized zero means tests ran and none matched that count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Identity parsed from the file name
    pub identity: LogIdentity,
    /// Declared or guessed build language
    pub primary_language: Option<String>,
    /// Overall job outcome
    pub status: BuildStatus,
    /// Seconds spent in setup folds
    pub setup_time: Option<u64>,
    /// Tag of the extractor that ran, e.g. `java-maven`
    pub analyzer: Option<String>,
    /// Test frameworks observed, in discovery order
    pub frameworks: Vec<String>,
    /// Whether any test activity was seen
    pub tests_ran: bool,
    /// Whether the extractor judged the tests failed
    pub tests_failed: bool,
    /// Passed test cases
    pub num_tests_ok: Option<u64>,
    /// Failed test cases
    pub num_tests_failed: Option<u64>,
    /// Run test cases
    pub num_tests_run: Option<u64>,
    /// Skipped test cases
    pub num_tests_skipped: Option<u64>,
    /// Suite-level counts, for tools that report them
    pub suites: Option<SuiteCounts>,
    /// Failing test names, in discovery order
    pub failing_tests: Vec<String>,
    /// Test duration in seconds, rounded to 2 decimal places
    pub test_duration: Option<f64>,
    /// Pure build duration in seconds, rounded to 2 decimal places
    pub build_duration: Option<f64>,
    /// Non-fatal problems met during analysis
    #[serde(skip)]
    pub warnings: Vec<AnalysisError>,
}

impl AnalysisResult {
    /// Check if analysis finished without warnings
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Flatten into an output record
    #[must_use]
    pub fn to_record(&self) -> OutputRecord {
        OutputRecord::from(self)
    }
}

/// Flat, stable-column projection of an [`AnalysisResult`]
///
/// Field order is the column order in [`COLUMNS`]. Lists are joined with
/// [`LIST_SEPARATOR`]; absent values serialize as empty CSV cells or JSON
/// nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Build ID
    pub tr_build_id: String,
    /// Job ID
    pub tr_job_id: String,
    /// Build number
    pub tr_build_number: String,
    /// Commit SHA
    pub tr_original_commit: String,
    /// Primary language
    pub tr_log_lan: String,
    /// Job outcome
    pub tr_log_status: BuildStatus,
    /// Setup time in seconds
    pub tr_log_setup_time: Option<u64>,
    /// Analyzer tag
    pub tr_log_analyzer: String,
    /// Frameworks, `#`-joined
    pub tr_log_frameworks: String,
    /// Whether tests ran
    pub tr_log_bool_tests_ran: bool,
    /// Whether tests failed
    pub tr_log_bool_tests_failed: bool,
    /// Passed tests
    pub tr_log_num_tests_ok: Option<u64>,
    /// Failed tests
    pub tr_log_num_tests_failed: Option<u64>,
    /// Run tests
    pub tr_log_num_tests_run: Option<u64>,
    /// Skipped tests
    pub tr_log_num_tests_skipped: Option<u64>,
    /// Run suites
    pub tr_log_num_test_suites_run: Option<u64>,
    /// Passed suites
    pub tr_log_num_test_suites_ok: Option<u64>,
    /// Failed suites
    pub tr_log_num_test_suites_failed: Option<u64>,
    /// Failing test names, `#`-joined
    pub tr_log_tests_failed: String,
    /// Test duration in seconds
    pub tr_log_testduration: Option<f64>,
    /// Pure build duration in seconds
    pub tr_log_buildduration: Option<f64>,
}

impl From<&AnalysisResult> for OutputRecord {
    fn from(result: &AnalysisResult) -> Self {
        let identity = &result.identity;
        Self {
            tr_build_id: identity.build_id.clone(),
            tr_job_id: identity.job_id.clone(),
            tr_build_number: identity.build_number.clone(),
            tr_original_commit: identity.commit_sha.clone(),
            tr_log_lan: result.primary_language.clone().unwrap_or_default(),
            tr_log_status: result.status,
            tr_log_setup_time: result.setup_time,
            tr_log_analyzer: result.analyzer.clone().unwrap_or_default(),
            tr_log_frameworks: result.frameworks.join(LIST_SEPARATOR),
            tr_log_bool_tests_ran: result.tests_ran,
            tr_log_bool_tests_failed: result.tests_failed,
            tr_log_num_tests_ok: result.num_tests_ok,
            tr_log_num_tests_failed: result.num_tests_failed,
            tr_log_num_tests_run: result.num_tests_run,
            tr_log_num_tests_skipped: result.num_tests_skipped,
            tr_log_num_test_suites_run: result.suites.map(|s| s.run),
            tr_log_num_test_suites_ok: result.suites.map(|s| s.ok),
            tr_log_num_test_suites_failed: result.suites.map(|s| s.failed),
            tr_log_tests_failed: result.failing_tests.join(LIST_SEPARATOR),
            tr_log_testduration: result.test_duration,
            tr_log_buildduration: result.build_duration,
        }
    }
}
