// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ant extractor
//!
//! The test section opens at the first `[junit]`, `[testng]` or `[test...]`
//! task tag and runs to the end of the log.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Extractor, Rule, add_count, apply_rules, count, count_sum, text, time};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "java-ant";

static TASK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(junit|testng|test\w*)\] ").expect("valid ant tag regex"));

static JUNIT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Tests run: (\d+), Failures: (\d+), Errors: (\d+), (?:Skipped: (\d+), )?Time elapsed: (.+)$",
    )
    .expect("valid junit regex")
});

static TESTNG_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total tests run: ?(\d+), Failures: (\d+), Skips: (\d+)")
        .expect("valid testng regex")
});

static FAILED_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Failed tests:").expect("valid banner regex"));

static TEST_FAILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Test (\S+) (?:failed|FAILED)").expect("valid test failed regex")
});

static TOTAL_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Total time: (.+)$").expect("valid total regex"));

static RULES: &[Rule<AntExtractor>] = &[
    Rule {
        pattern: &JUNIT_LINE,
        handler: AntExtractor::on_junit_line,
    },
    Rule {
        pattern: &TESTNG_TOTAL,
        handler: AntExtractor::on_testng_total,
    },
    Rule {
        pattern: &FAILED_BANNER,
        handler: AntExtractor::on_failed_banner,
    },
    Rule {
        pattern: &TEST_FAILED,
        handler: AntExtractor::on_test_failed,
    },
];

/// Extractor for Ant builds
#[derive(Debug, Default)]
pub struct AntExtractor {
    stats: TestStats,
    names_open: bool,
}

impl AntExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn on_junit_line(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("junit");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        add_count(&mut self.stats.failed, count_sum(caps, &[2, 3])?, &caps[0])?;
        add_count(&mut self.stats.skipped, count(caps, 4)?, &caps[0])?;
        self.stats.duration += time::maven(text(caps, 5)).unwrap_or(0.0);
        Ok(())
    }

    fn on_testng_total(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("testng");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        add_count(&mut self.stats.failed, count(caps, 2)?, &caps[0])?;
        add_count(&mut self.stats.skipped, count(caps, 3)?, &caps[0])?;
        Ok(())
    }

    fn on_failed_banner(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.names_open = true;
        Ok(())
    }

    fn on_test_failed(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if self.names_open {
            self.stats.add_failing_test(text(caps, 1));
        }
        Ok(())
    }
}

impl Extractor for AntExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        let mut in_section = false;
        for line in &folds.out_of_fold().content {
            if let Some(total) = TOTAL_TIME
                .captures(line)
                .and_then(|caps| time::ant(&caps[1]))
            {
                self.stats.build_duration = Some(total);
            }
            if !in_section && TASK_TAG.is_match(line) {
                in_section = true;
            }
            if in_section {
                apply_rules(RULES, self, line)?;
            }
        }
        Ok(())
    }

    fn stats(&self) -> &TestStats {
        &self.stats
    }

    fn into_stats(self: Box<Self>) -> TestStats {
        self.stats
    }
}
