// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Analysis pipeline for one log
//!
//! The sequence is fixed: identity, normalization, fold splitting, language
//! detection, status, setup time, extraction, finalize. Only an empty log
//! aborts it; every other problem becomes a warning on the result.

use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::detect::detect_language;
use crate::dispatch::select_extractor;
use crate::error::AnalysisError;
use crate::extractors::round2;
use crate::identity::LogIdentity;
use crate::result::AnalysisResult;
use crate::splitter::{normalize, split};
use crate::stats::TestStats;
use crate::status::{analyze_status, setup_time};

/// Analyzer with configurable thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogAnalyzer {
    config: AnalyzerConfig,
}

impl LogAnalyzer {
    /// Create an analyzer with the given thresholds
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one raw log
    ///
    /// `filename` is only used for the build identity and in messages.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyLog` if the log holds no text after
    /// decoding. All other problems are attached to the result as warnings.
    pub fn analyze(&self, raw: &[u8], filename: &str) -> Result<AnalysisResult, AnalysisError> {
        let mut warnings = Vec::new();

        let identity = LogIdentity::parse(filename).unwrap_or_else(|e| {
            warn!(filename, error = %e, "Unparseable log file name");
            warnings.push(e);
            LogIdentity::default()
        });

        let text = normalize(raw);
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyLog {
                filename: filename.to_string(),
            });
        }

        let folds = split(&text);
        if folds.named_count() == 0 {
            debug!(filename, "No fold markers, scanning whole log");
            warnings.push(AnalysisError::NoFoldsDetected);
        }

        let detection = detect_language(&folds, &text, self.config.language_threshold);
        let status = analyze_status(&folds, self.config.status_tail_lines);
        let setup_time = setup_time(&folds);
        debug!(
            filename,
            language = ?detection.language,
            method = ?detection.method,
            %status,
            ?setup_time,
            "Analyzed log structure"
        );

        let mut analyzer = None;
        let mut tests_failed = false;
        let mut stats = TestStats::new();
        match select_extractor(detection.ecosystem, &text, &self.config) {
            Some(mut extractor) => {
                let tag = extractor.analyzer();
                if let Err(e) = extractor.extract(&folds) {
                    warn!(filename, analyzer = tag, error = %e, "Extractor failed, keeping partial results");
                    warnings.push(AnalysisError::ExtractorInternalError {
                        analyzer: tag.to_string(),
                        message: e.to_string(),
                    });
                }
                tests_failed = extractor.reports_test_failure();
                stats = extractor.into_stats();
                analyzer = Some(tag.to_string());
            }
            None => {
                let language = detection
                    .language
                    .clone()
                    .unwrap_or_else(|| "<none>".to_string());
                warn!(filename, %language, "No extractor for language");
                warnings.push(AnalysisError::UnrecognizedEcosystem { language });
            }
        }
        stats.finalize();

        Ok(assemble(
            identity,
            detection.language,
            status,
            setup_time,
            analyzer,
            tests_failed,
            &stats,
            warnings,
        ))
    }
}

/// Analyze one raw log with default thresholds
///
/// # Errors
///
/// Returns `AnalysisError::EmptyLog` if the log holds no text after decoding.
pub fn analyze(raw: &[u8], filename: &str) -> Result<AnalysisResult, AnalysisError> {
    LogAnalyzer::default().analyze(raw, filename)
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    identity: LogIdentity,
    primary_language: Option<String>,
    status: crate::status::BuildStatus,
    setup_time: Option<u64>,
    analyzer: Option<String>,
    tests_failed: bool,
    stats: &TestStats,
    warnings: Vec<AnalysisError>,
) -> AnalysisResult {
    let tests_ran = stats.tests_ran() || tests_failed;
    let counted = |n: u64| stats.is_initialized().then_some(n);

    AnalysisResult {
        identity,
        primary_language,
        status,
        setup_time,
        analyzer,
        frameworks: stats.frameworks().to_vec(),
        tests_ran,
        tests_failed,
        num_tests_ok: counted(stats.ok),
        num_tests_failed: counted(stats.failed),
        num_tests_run: counted(stats.run),
        num_tests_skipped: counted(stats.skipped),
        suites: stats.suites,
        failing_tests: stats.failing_tests().to_vec(),
        test_duration: tests_ran.then(|| round2(stats.duration)),
        build_duration: stats.build_duration.map(round2),
        warnings,
    }
}
