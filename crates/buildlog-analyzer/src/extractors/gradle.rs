// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Gradle extractor
//!
//! Test output is read from the `:test` and `:integrationTest` task sections
//! (any project path, with or without the `> Task` prefix). A section ends at
//! the next task line.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{Extractor, Rule, add_count, apply_rules, count, text, time};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "java-gradle";

static TEST_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:> Task )?:(?:[\w\-]+:)*(?:test|integrationTest)\b")
        .expect("valid test task regex")
});

static ANY_TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:> Task )?:[\w\-]+").expect("valid task regex"));

static FAILED_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+) > (.+?) FAILED\s*$").expect("valid failed regex"));

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) tests? completed, (\d+) failed(?:, (\d+) skipped)?")
        .expect("valid summary regex")
});

static BUILD_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Total time: |BUILD (?:SUCCESSFUL|FAILED) in )(.+)$")
        .expect("valid build time regex")
});

static RULES: &[Rule<GradleExtractor>] = &[
    Rule {
        pattern: &FAILED_CASE,
        handler: GradleExtractor::on_failed_case,
    },
    Rule {
        pattern: &SUMMARY,
        handler: GradleExtractor::on_summary,
    },
];

/// Extractor for Gradle builds
#[derive(Debug, Default)]
pub struct GradleExtractor {
    stats: TestStats,
    test_failed: bool,
}

impl GradleExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn on_failed_case(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.test_failed = true;
        self.stats.mark_ran();
        self.stats
            .add_failing_test(format!("{}.{}", text(caps, 1), text(caps, 2)));
        Ok(())
    }

    fn on_summary(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("junit");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        add_count(&mut self.stats.failed, count(caps, 2)?, &caps[0])?;
        add_count(&mut self.stats.skipped, count(caps, 3)?, &caps[0])?;
        Ok(())
    }
}

impl Extractor for GradleExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        let lines = &folds.out_of_fold().content;
        let mut in_section = false;
        let mut sections = 0usize;

        for line in lines {
            if TEST_TASK.is_match(line) {
                in_section = true;
                sections += 1;
                self.stats.mark_ran();
                continue;
            }
            if ANY_TASK.is_match(line) {
                in_section = false;
                continue;
            }
            if in_section {
                apply_rules(RULES, self, line)?;
            }
        }
        debug!(sections, "Scanned gradle test tasks");

        if let Some(total) = lines
            .iter()
            .rev()
            .find_map(|line| BUILD_TIME.captures(line))
            .and_then(|caps| time::gradle(&caps[1]))
        {
            self.stats.build_duration = Some(total);
        }
        Ok(())
    }

    fn reports_test_failure(&self) -> bool {
        self.test_failed || self.stats.failed > 0 || !self.stats.failing_tests().is_empty()
    }

    fn stats(&self) -> &TestStats {
        &self.stats
    }

    fn into_stats(self: Box<Self>) -> TestStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split;
    use similar_asserts::assert_eq;

    const LEGACY: &str = "\
:compileJava
:compileTestJava
:testClasses
:test

com.example.FooTest > testBar FAILED
    java.lang.AssertionError at FooTest.java:12

3 tests completed, 1 failed, 1 skipped
:test FAILED

FAILURE: Build failed with an exception.

BUILD FAILED

Total time: 1 mins 5.2 secs
";

    #[test]
    fn test_legacy_test_task() {
        let mut extractor = Box::new(GradleExtractor::new());
        extractor.extract(&split(LEGACY)).expect("Should extract");
        assert!(extractor.reports_test_failure());
        let stats = extractor.into_stats();
        assert_eq!(stats.run, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failing_tests(), ["com.example.FooTest.testBar"]);
        assert_eq!(stats.build_duration, Some(65.2));
    }

    #[test]
    fn test_multi_project_tasks_accumulate() {
        let log = "\
> Task :core:test
5 tests completed, 0 failed
> Task :core:jar
4 tests completed, 2 failed
> Task :api:integrationTest
2 tests completed, 0 failed
BUILD SUCCESSFUL in 1m 2s
";
        let mut extractor = Box::new(GradleExtractor::new());
        extractor.extract(&split(log)).expect("Should extract");
        assert!(!extractor.reports_test_failure());
        let stats = extractor.into_stats();
        // the summary under :core:jar is outside any test task
        assert_eq!(stats.run, 7);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.build_duration, Some(62.0));
    }

    #[test]
    fn test_test_classes_task_is_not_a_test_section() {
        let log = ":testClasses\n3 tests completed, 1 failed\n";
        let mut extractor = Box::new(GradleExtractor::new());
        extractor.extract(&split(log)).expect("Should extract");
        assert!(!extractor.stats().tests_ran());
    }
}
