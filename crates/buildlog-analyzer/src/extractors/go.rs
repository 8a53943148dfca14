// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Go extractor (`go test`, Ginkgo)
//!
//! `go test -v` prints one `--- PASS/FAIL/SKIP` line per test case; plain
//! `go test` only prints one `ok`/`FAIL` line per package. The first style is
//! chosen when any `--- PASS` line exists, and then only top-level cases are
//! counted (subtest lines are indented). Package lines always feed the
//! suite-level counters. Ginkgo summaries add to whatever `go test` reported.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{Extractor, Rule, add_count, apply_rules, count, seconds, text};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "go";

static VERBOSE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--- PASS").expect("valid verbose regex"));

static GINKGO_RAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Ran (\d+) of (\d+) Specs? in (\d+(?:\.\d+)?) seconds")
        .expect("valid ginkgo ran regex")
});

static GINKGO_OUTCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:SUCCESS|FAIL)! -- (\d+) Passed \| (\d+) Failed").expect("valid outcome regex")
});

static GINKGO_FAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[Fail\] (.+?)\s*$").expect("valid ginkgo fail regex"));

static CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--- (PASS|FAIL|SKIP): (\S+) \((\d+(?:\.\d+)?) ?s(?:econds)?\)")
        .expect("valid case regex")
});

static CASE_FAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*--- FAIL: (\S+)").expect("valid case fail regex"));

static PACKAGE_OK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ok\s+(\S+)\s+(?:(\d+(?:\.\d+)?)s|\(cached\))").expect("valid ok regex")
});

static PACKAGE_FAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^FAIL\s+(\S+)\s+(?:(\d+(?:\.\d+)?)s|\[.+\])").expect("valid fail regex")
});

static GINKGO_RULES: &[Rule<GoExtractor>] = &[
    Rule {
        pattern: &GINKGO_RAN,
        handler: GoExtractor::on_ginkgo_ran,
    },
    Rule {
        pattern: &GINKGO_OUTCOME,
        handler: GoExtractor::on_ginkgo_outcome,
    },
    Rule {
        pattern: &GINKGO_FAIL,
        handler: GoExtractor::on_ginkgo_fail,
    },
];

static VERBOSE_RULES: &[Rule<GoExtractor>] = &[
    Rule {
        pattern: &CASE,
        handler: GoExtractor::on_case,
    },
    Rule {
        pattern: &PACKAGE_OK,
        handler: GoExtractor::on_package_ok,
    },
    Rule {
        pattern: &PACKAGE_FAIL,
        handler: GoExtractor::on_package_fail,
    },
];

static TERSE_RULES: &[Rule<GoExtractor>] = &[
    Rule {
        pattern: &PACKAGE_OK,
        handler: GoExtractor::on_package_ok,
    },
    Rule {
        pattern: &PACKAGE_FAIL,
        handler: GoExtractor::on_package_fail,
    },
    Rule {
        pattern: &CASE_FAIL,
        handler: GoExtractor::on_case_fail,
    },
];

/// Extractor for Go builds
#[derive(Debug, Default)]
pub struct GoExtractor {
    stats: TestStats,
    verbose: bool,
}

impl GoExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn on_ginkgo_ran(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("ginkgo");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        self.stats.duration += seconds(caps, 3)?;
        Ok(())
    }

    fn on_ginkgo_outcome(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        add_count(&mut self.stats.failed, count(caps, 2)?, &caps[0])?;
        Ok(())
    }

    fn on_ginkgo_fail(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.add_failing_test(text(caps, 1));
        Ok(())
    }

    fn on_case(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("gotest");
        add_count(&mut self.stats.run, 1, &caps[0])?;
        self.stats.duration += seconds(caps, 3)?;
        match &caps[1] {
            "FAIL" => {
                add_count(&mut self.stats.failed, 1, &caps[0])?;
                self.stats.add_failing_test(text(caps, 2));
            }
            "SKIP" => add_count(&mut self.stats.skipped, 1, &caps[0])?,
            _ => {}
        }
        Ok(())
    }

    fn on_case_fail(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.add_failing_test(text(caps, 1));
        Ok(())
    }

    fn on_package_ok(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.add_framework("gotest");
        self.stats.suites_mut().run += 1;
        if !self.verbose {
            self.stats.duration += seconds(caps, 2)?;
        }
        Ok(())
    }

    fn on_package_fail(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.add_framework("gotest");
        let suites = self.stats.suites_mut();
        suites.run += 1;
        suites.failed += 1;
        if !self.verbose {
            self.stats.duration += seconds(caps, 2)?;
        }
        Ok(())
    }
}

impl Extractor for GoExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        let lines = &folds.out_of_fold().content;
        self.verbose = lines.iter().any(|line| VERBOSE_MARKER.is_match(line));
        debug!(verbose = self.verbose, "Selected go test output style");

        let rules = if self.verbose {
            VERBOSE_RULES
        } else {
            TERSE_RULES
        };
        for line in lines {
            if !apply_rules(GINKGO_RULES, self, line)? {
                apply_rules(rules, self, line)?;
            }
        }
        Ok(())
    }

    fn reports_test_failure(&self) -> bool {
        self.stats.failed > 0
            || self.stats.suites.is_some_and(|s| s.failed > 0)
            || !self.stats.failing_tests().is_empty()
    }

    fn stats(&self) -> &TestStats {
        &self.stats
    }

    fn into_stats(self: Box<Self>) -> TestStats {
        self.stats
    }
}
