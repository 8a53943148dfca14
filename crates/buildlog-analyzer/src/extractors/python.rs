// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Python extractor (unittest, pytest, doctest; also under tox)
//!
//! Counts from every summary add up, but the pass/fail verdict is taken from
//! the first summary only, and failing test names are only collected before
//! it. A log that runs the suite twice (for instance under two interpreters)
//! is judged by its first run.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Extractor, Rule, add_count, apply_rules, count, seconds, text};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "python";

static UNITTEST_RAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Ran (\d+) tests? in (\d+(?:\.\d+)?)s").expect("valid ran regex")
});

static UNITTEST_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(OK|FAILED)(?: \((.+)\))?\s*$").expect("valid status regex"));

static STATUS_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z ]+)=(\d+)").expect("valid status count regex"));

static PYTEST_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=+ (.+?) in (\d+(?:\.\d+)?) ?s(?:econds)?(?: \([^)]*\))? =+$")
        .expect("valid pytest banner regex")
});

static PYTEST_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) (\w+)$").expect("valid pytest count regex"));

static DOCTEST_ITEMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) tests? in (\d+) items?\.").expect("valid doctest items regex")
});

static DOCTEST_TOTALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) passed and (\d+) failed\.").expect("valid doctest totals regex")
});

static DOCTEST_FAILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*\*Test Failed\*\*\* (\d+) failures?\.").expect("valid doctest failed regex")
});

static DOCTEST_PASSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Test passed\.").expect("valid doctest passed regex"));

static DOCTEST_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^File "(.+)", line (\d+), in (\S+)"#).expect("valid doctest location regex")
});

static DOCTEST_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Failed example:").expect("valid doctest example regex"));

static UNITTEST_FAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:FAIL|ERROR): (\S+)(?: \(([^)]+)\))?").expect("valid unittest fail regex")
});

static PYTEST_FAILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:FAILED|ERROR) (\S+::\S+)").expect("valid pytest failed regex")
});

static RULES: &[Rule<PythonExtractor>] = &[
    Rule {
        pattern: &UNITTEST_RAN,
        handler: PythonExtractor::on_unittest_ran,
    },
    Rule {
        pattern: &UNITTEST_STATUS,
        handler: PythonExtractor::on_unittest_status,
    },
    Rule {
        pattern: &PYTEST_BANNER,
        handler: PythonExtractor::on_pytest_banner,
    },
    Rule {
        pattern: &DOCTEST_ITEMS,
        handler: PythonExtractor::on_doctest_items,
    },
    Rule {
        pattern: &DOCTEST_TOTALS,
        handler: PythonExtractor::on_doctest_totals,
    },
    Rule {
        pattern: &DOCTEST_FAILED,
        handler: PythonExtractor::on_doctest_failed,
    },
    Rule {
        pattern: &DOCTEST_PASSED,
        handler: PythonExtractor::on_doctest_passed,
    },
    Rule {
        pattern: &DOCTEST_LOCATION,
        handler: PythonExtractor::on_doctest_location,
    },
    Rule {
        pattern: &DOCTEST_EXAMPLE,
        handler: PythonExtractor::on_doctest_example,
    },
    Rule {
        pattern: &UNITTEST_FAIL,
        handler: PythonExtractor::on_unittest_fail,
    },
    Rule {
        pattern: &PYTEST_FAILED,
        handler: PythonExtractor::on_pytest_failed,
    },
];

/// Extractor for Python builds
#[derive(Debug, Default)]
pub struct PythonExtractor {
    stats: TestStats,
    awaiting_status: bool,
    summary_seen: bool,
    verdict: Option<bool>,
    doctest_seen: bool,
    doctest_totals: bool,
    doctest_location: Option<String>,
}

impl PythonExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn settle_verdict(&mut self, failed: bool) {
        self.summary_seen = true;
        self.verdict.get_or_insert(failed);
    }

    fn on_unittest_ran(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("unittest");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        self.stats.duration += seconds(caps, 2)?;
        self.awaiting_status = true;
        self.summary_seen = true;
        Ok(())
    }

    fn on_unittest_status(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.awaiting_status {
            return Ok(());
        }
        self.awaiting_status = false;
        for pair in STATUS_COUNT.captures_iter(text(caps, 2)) {
            let n = count(&pair, 2)?;
            match pair[1].trim() {
                "failures" | "errors" => add_count(&mut self.stats.failed, n, &caps[0])?,
                "skipped" => add_count(&mut self.stats.skipped, n, &caps[0])?,
                _ => {}
            }
        }
        self.settle_verdict(&caps[1] == "FAILED");
        Ok(())
    }

    fn on_pytest_banner(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        let (mut run, mut failed, mut skipped) = (0, 0, 0);
        let mut recognized = false;
        for part in text(caps, 1).split(',') {
            let Some(item) = PYTEST_COUNT.captures(part.trim()) else {
                continue;
            };
            let n = count(&item, 1)?;
            match &item[2] {
                "passed" | "xpassed" => add_count(&mut run, n, &caps[0])?,
                "failed" | "error" | "errors" => {
                    add_count(&mut run, n, &caps[0])?;
                    add_count(&mut failed, n, &caps[0])?;
                }
                "skipped" | "xfailed" => add_count(&mut skipped, n, &caps[0])?,
                _ => continue,
            }
            recognized = true;
        }
        if !recognized {
            return Ok(());
        }

        self.stats.init();
        self.stats.add_framework("pytest");
        add_count(&mut self.stats.run, run, &caps[0])?;
        add_count(&mut self.stats.failed, failed, &caps[0])?;
        add_count(&mut self.stats.skipped, skipped, &caps[0])?;
        self.stats.duration += seconds(caps, 2)?;
        self.settle_verdict(failed > 0);
        Ok(())
    }

    fn on_doctest_items(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("doctest");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        self.doctest_seen = true;
        self.summary_seen = true;
        Ok(())
    }

    fn on_doctest_totals(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if self.doctest_seen {
            add_count(&mut self.stats.failed, count(caps, 2)?, &caps[0])?;
            self.doctest_totals = true;
        }
        Ok(())
    }

    fn on_doctest_failed(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("doctest");
        if !self.doctest_totals {
            add_count(&mut self.stats.failed, count(caps, 1)?, &caps[0])?;
        }
        self.doctest_totals = false;
        self.settle_verdict(true);
        Ok(())
    }

    fn on_doctest_passed(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if self.doctest_seen {
            self.doctest_totals = false;
            self.settle_verdict(false);
        }
        Ok(())
    }

    fn on_doctest_location(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.summary_seen {
            self.doctest_location = Some(text(caps, 3).to_string());
        }
        Ok(())
    }

    fn on_doctest_example(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.summary_seen
            && let Some(location) = self.doctest_location.take()
        {
            self.stats.init();
            self.stats.add_failing_test(location);
        }
        Ok(())
    }

    fn on_unittest_fail(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if self.summary_seen {
            return Ok(());
        }
        self.stats.init();
        let method = text(caps, 1);
        let name = match caps.get(2).map(|m| m.as_str().trim()) {
            // newer interpreters print the fully qualified test id in parentheses
            Some(class) if class.ends_with(&format!(".{method}")) => class.to_string(),
            Some(class) => format!("{class}.{method}"),
            None => method.to_string(),
        };
        self.stats.add_failing_test(name);
        Ok(())
    }

    fn on_pytest_failed(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.summary_seen {
            self.stats.init();
            self.stats.add_failing_test(text(caps, 1));
        }
        Ok(())
    }
}

impl Extractor for PythonExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        for line in &folds.out_of_fold().content {
            apply_rules(RULES, self, line)?;
        }
        Ok(())
    }

    fn reports_test_failure(&self) -> bool {
        self.verdict.unwrap_or_else(|| {
            self.stats.failed > 0 || !self.stats.failing_tests().is_empty()
        })
    }

    fn stats(&self) -> &TestStats {
        &self.stats
    }

    fn into_stats(self: Box<Self>) -> TestStats {
        self.stats
    }
}
