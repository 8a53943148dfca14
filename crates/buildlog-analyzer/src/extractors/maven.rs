// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Maven (Surefire/Failsafe) extractor
//!
//! Maven output is routed into two buckets first: the test section that
//! starts after a ` T E S T S` banner framed by separator lines, and the
//! reactor section that starts at `Reactor Summary` and lasts while lines
//! carry a `[LEVEL]` prefix.
//!
//! Within the test section, each ` T E S T S` banner opens a module. Per-class
//! `Tests run: ... Time elapsed` lines are tallied while the module runs; if
//! the module prints a summary `Tests run:` line, the summary replaces the
//! tally so classes are never counted twice. Failing test names come from the
//! per-case lines that follow a failing class line; modules without such lines
//! fall back to the `Failed tests:` / `Tests in error:` enumerations.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{Extractor, Rule, add_count, apply_rules, count, count_sum, text, time};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "java-maven";

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{40,}").expect("valid separator regex"));

static TESTS_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[INFO\])?\s*T E S T S\s*$").expect("valid banner regex")
});

static REACTOR_SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Reactor Summary").expect("valid reactor regex"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\w+\]").expect("valid level regex"));

static BUILDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[INFO\] Building ").expect("valid building regex"));

static CLASS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Tests run: (\d+), Failures: (\d+), Errors: (\d+)(?:, Skipped: (\d+))?(?:, Flakes: \d+)?, Time elapsed: (.+)$",
    )
    .expect("valid class line regex")
});

static TESTNG_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total tests run: ?(\d+), Failures: (\d+), Skips: (\d+)")
        .expect("valid testng regex")
});

static MODULE_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Tests run: (\d+), Failures: (\d+), Errors: (\d+)(?:, Skipped: (\d+))?")
        .expect("valid summary regex")
});

static FAILED_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[ERROR\] )?\s*(?:Failed tests:|Tests in error:|Failures:|Errors:).*$")
        .expect("valid failed banner regex")
});

static CASE_METHOD_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w.]+)\(([^)]+)\)\s+Time elapsed").expect("valid case regex")
});

static CASE_PARAMETERIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w.]+)\[.+\(([^)]+)\)\s+Time elapsed").expect("valid case regex")
});

static CASE_INDEXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+)\] ([\w.]+) \(([\w.]+)\)\(([^)]+)\)\s+Time elapsed")
        .expect("valid case regex")
});

static CASE_ON_INSTANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+) on ([\w.]+)\(([^)]+)\)\(([^)]+)\)\s+Time elapsed").expect("valid case regex")
});

static CASE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w.]+)\s+Time elapsed").expect("valid case regex"));

static LIST_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Failed tests:|Tests in error:|Failures:|Errors:|Run \d+:)(.*)$")
        .expect("valid list header regex")
});

static REACTOR_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[INFO\] .*test.*? (\w+) \[\s*(.+?)\s*\]").expect("valid reactor regex")
});

static TOTAL_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[INFO\] Total time:\s*(.+)$").expect("valid total regex"));

/// Blank lines that end a failed-test enumeration
const ENUMERATION_BLANK_LIMIT: usize = 4;

static RULES: &[Rule<MavenExtractor>] = &[
    Rule {
        pattern: &CLASS_LINE,
        handler: MavenExtractor::on_class_line,
    },
    Rule {
        pattern: &TESTNG_TOTAL,
        handler: MavenExtractor::on_testng_total,
    },
    Rule {
        pattern: &MODULE_SUMMARY,
        handler: MavenExtractor::on_module_summary,
    },
    Rule {
        pattern: &FAILED_BANNER,
        handler: MavenExtractor::on_failed_banner,
    },
    Rule {
        pattern: &CASE_METHOD_CLASS,
        handler: MavenExtractor::on_case_method_class,
    },
    Rule {
        pattern: &CASE_PARAMETERIZED,
        handler: MavenExtractor::on_case_method_class,
    },
    Rule {
        pattern: &CASE_INDEXED,
        handler: MavenExtractor::on_case_indexed,
    },
    Rule {
        pattern: &CASE_ON_INSTANCE,
        handler: MavenExtractor::on_case_on_instance,
    },
    Rule {
        pattern: &CASE_BARE,
        handler: MavenExtractor::on_case_bare,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    run: u64,
    failed: u64,
    skipped: u64,
}

impl Tally {
    fn add(&mut self, other: Tally, line: &str) -> Result<(), ExtractorError> {
        add_count(&mut self.run, other.run, line)?;
        add_count(&mut self.failed, other.failed, line)?;
        add_count(&mut self.skipped, other.skipped, line)
    }
}

/// Per-module state, reset at each ` T E S T S` banner
#[derive(Debug, Default)]
struct Module {
    pending: Tally,
    summary: Option<Tally>,
    summary_from_testng: bool,
    outstanding_failures: u64,
    /// Last line that fed a tally of this module
    source: String,
    case_names: bool,
    enumerating: bool,
    blank_run: usize,
    listed: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Idle,
    Separator,
    Banner,
    Header,
}

/// Extractor for Maven builds
#[derive(Debug, Default)]
pub struct MavenExtractor {
    stats: TestStats,
    module: Module,
    listed: Vec<String>,
}

impl MavenExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn analyze_tests(&mut self, lines: &[&str]) -> Result<(), ExtractorError> {
        for &line in lines {
            if TESTS_BANNER.is_match(line) {
                self.commit_module()?;
                continue;
            }
            if self.module.enumerating {
                self.track_enumeration(line);
            }
            apply_rules(RULES, self, line)?;
        }
        Ok(())
    }

    fn track_enumeration(&mut self, line: &str) {
        if line.starts_with("[INFO]") || BUILDING.is_match(line) {
            self.module.enumerating = false;
            return;
        }
        let content = line.strip_prefix("[ERROR]").unwrap_or(line);
        if content.trim().is_empty() {
            self.module.blank_run += 1;
            if self.module.blank_run >= ENUMERATION_BLANK_LIMIT {
                self.module.enumerating = false;
            }
            return;
        }
        self.module.blank_run = 0;
        self.module.listed.push(line.to_string());
    }

    fn commit_module(&mut self) -> Result<(), ExtractorError> {
        let module = std::mem::take(&mut self.module);
        if !module.case_names {
            self.listed.extend(module.listed);
        }
        let tally = module.summary.unwrap_or(module.pending);
        add_count(&mut self.stats.run, tally.run, &module.source)?;
        add_count(&mut self.stats.failed, tally.failed, &module.source)?;
        add_count(&mut self.stats.skipped, tally.skipped, &module.source)
    }

    /// Recover names from enumerations, at most as many as failures remain unnamed
    fn harvest_listed_names(&mut self) {
        let named = self.stats.failing_tests().len() as u64;
        let mut budget = self.stats.failed.saturating_sub(named);
        for line in std::mem::take(&mut self.listed) {
            if budget == 0 {
                break;
            }
            if let Some(name) = enumerated_test_name(&line)
                && !self.stats.failing_tests().contains(&name)
            {
                self.stats.add_failing_test(name);
                budget -= 1;
            }
        }
    }

    fn analyze_reactor(&mut self, reactor: &[&str], all: &[String]) {
        let reactor_time: f64 = reactor
            .iter()
            .filter_map(|line| REACTOR_MODULE.captures(line))
            .filter_map(|caps| time::maven(&caps[2]))
            .sum();
        if reactor_time > self.stats.duration {
            self.stats.duration = reactor_time;
        }

        if let Some(total) = all
            .iter()
            .rev()
            .find_map(|line| TOTAL_TIME.captures(line))
            .and_then(|caps| time::maven(&caps[1]))
        {
            self.stats.build_duration = Some(total);
        }
    }

    fn on_class_line(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("junit");
        let failed = count_sum(caps, &[2, 3])?;
        let tally = Tally {
            run: count(caps, 1)?,
            failed,
            skipped: count(caps, 4)?,
        };
        self.module.source = caps[0].to_string();
        self.module.pending.add(tally, &caps[0])?;
        add_count(&mut self.module.outstanding_failures, failed, &caps[0])?;
        self.stats.duration += time::maven(text(caps, 5)).unwrap_or(0.0);
        Ok(())
    }

    fn on_testng_total(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("testng");
        if self.module.summary.is_none() {
            self.module.summary = Some(Tally {
                run: count(caps, 1)?,
                failed: count(caps, 2)?,
                skipped: count(caps, 3)?,
            });
            self.module.summary_from_testng = true;
            self.module.source = caps[0].to_string();
        }
        Ok(())
    }

    fn on_module_summary(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("junit");
        let tally = Tally {
            run: count(caps, 1)?,
            failed: count_sum(caps, &[2, 3])?,
            skipped: count(caps, 4)?,
        };
        match self.module.summary.as_mut() {
            Some(summary) if !self.module.summary_from_testng => summary.add(tally, &caps[0])?,
            _ => self.module.summary = Some(tally),
        }
        self.module.summary_from_testng = false;
        self.module.source = caps[0].to_string();
        Ok(())
    }

    fn on_failed_banner(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.module.enumerating {
            self.module.listed.push(caps[0].to_string());
        }
        self.module.enumerating = true;
        self.module.blank_run = 0;
        Ok(())
    }

    fn record_case(&mut self, class: &str, method: &str) {
        if self.module.outstanding_failures == 0 {
            return;
        }
        let name = if class.is_empty() {
            method.to_string()
        } else {
            format!("{class}.{method}")
        };
        self.stats.add_failing_test(name);
        self.module.outstanding_failures -= 1;
        self.module.case_names = true;
        self.module.enumerating = false;
    }

    fn on_case_method_class(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.record_case(text(caps, 2), text(caps, 1));
        Ok(())
    }

    fn on_case_indexed(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.record_case(text(caps, 4), text(caps, 3));
        Ok(())
    }

    fn on_case_on_instance(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.record_case(text(caps, 3), text(caps, 2));
        Ok(())
    }

    fn on_case_bare(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.record_case("", text(caps, 1));
        Ok(())
    }
}

impl Extractor for MavenExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        let all = &folds.out_of_fold().content;
        let (tests, reactor) = route(all);
        debug!(
            test_lines = tests.len(),
            reactor_lines = reactor.len(),
            "Routed maven output"
        );

        let analyzed = self.analyze_tests(&tests);
        let committed = self.commit_module();
        self.harvest_listed_names();
        self.analyze_reactor(&reactor, all);
        analyzed.and(committed)
    }

    fn stats(&self) -> &TestStats {
        &self.stats
    }

    fn into_stats(self: Box<Self>) -> TestStats {
        self.stats
    }
}

/// Split out-of-fold lines into test-section and reactor-section lines
fn route(lines: &[String]) -> (Vec<&str>, Vec<&str>) {
    let mut tests = Vec::new();
    let mut reactor = Vec::new();
    let mut marker = Marker::Idle;
    let mut in_tests = false;
    let mut in_reactor = false;

    for line in lines {
        let line = line.as_str();
        let separator = SEPARATOR.is_match(line);

        if REACTOR_SUMMARY.is_match(line) {
            in_reactor = true;
            in_tests = false;
        } else if in_reactor && !BRACKETED.is_match(line) {
            in_reactor = false;
        }

        marker = match marker {
            Marker::Idle if separator => Marker::Separator,
            Marker::Separator if TESTS_BANNER.is_match(line) => Marker::Banner,
            Marker::Banner if separator => {
                in_tests = true;
                Marker::Header
            }
            Marker::Header if separator => {
                in_tests = false;
                Marker::Idle
            }
            _ => Marker::Idle,
        };

        if marker == Marker::Banner || in_tests {
            tests.push(line);
        } else if in_reactor {
            reactor.push(line);
        }
    }

    (tests, reactor)
}

/// Extract a test name from one line of a failed-test enumeration
///
/// Entries must be indented; `method(Class)` entries become `Class.method`
/// unless the method already carries the class prefix. Parameter suffixes in
/// brackets and trailing messages are dropped.
fn enumerated_test_name(line: &str) -> Option<String> {
    let line = line.strip_prefix("[ERROR]").unwrap_or(line);

    let entry = match LIST_HEADER.captures(line.trim_start()) {
        Some(caps) => {
            let segment = caps[1].split(':').next().unwrap_or_default().trim();
            if segment.is_empty() {
                return None;
            }
            format!("  {segment}")
        }
        None => line.split(':').next().unwrap_or_default().to_string(),
    };

    if !entry.starts_with(char::is_whitespace) {
        return None;
    }
    let body = entry.trim();
    if body.is_empty() || body.starts_with("Could not initialize class") {
        return None;
    }
    if !body.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '.') {
        return None;
    }

    let name = match body.split_once('(') {
        Some((method, rest)) => {
            let method = method.trim();
            let class = rest.split(')').next().unwrap_or_default().trim();
            if class.is_empty() || method.starts_with(class) {
                method.to_string()
            } else {
                format!("{class}.{method}")
            }
        }
        None => body.to_string(),
    };

    name.split(['[', ' '])
        .next()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split;
    use similar_asserts::assert_eq;

    fn run(log: &str) -> TestStats {
        let mut extractor = Box::new(MavenExtractor::new());
        extractor.extract(&split(log)).expect("Should extract");
        let mut stats = extractor.into_stats();
        stats.finalize();
        stats
    }

    const SUREFIRE_LEGACY: &str = "\
[INFO] Building core 1.0
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Running com.example.FooTest
Tests run: 3, Failures: 1, Errors: 0, Skipped: 1, Time elapsed: 0.5 sec <<< FAILURE!
testBar(com.example.FooTest)  Time elapsed: 0.01 sec  <<< FAILURE!
java.lang.AssertionError: expected
Running com.example.BazTest
Tests run: 2, Failures: 0, Errors: 0, Skipped: 0, Time elapsed: 0.25 sec

Results :

Failed tests:   testBar(com.example.FooTest): expected

Tests run: 5, Failures: 1, Errors: 0, Skipped: 1

[INFO] BUILD FAILURE
";

    #[test]
    fn test_legacy_surefire_single_module() {
        let stats = run(SUREFIRE_LEGACY);
        assert_eq!(stats.run, 5);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.ok, 4);
        assert_eq!(stats.duration, 0.75);
        assert_eq!(stats.failing_tests(), ["com.example.FooTest.testBar"]);
        assert_eq!(stats.frameworks(), ["junit"]);
    }

    #[test]
    fn test_class_tally_used_without_summary() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Running com.example.FooTest
Tests run: 4, Failures: 0, Errors: 1, Skipped: 0, Time elapsed: 1.5 sec <<< FAILURE!
Running com.example.BarTest
Tests run: 2, Failures: 0, Errors: 0, Skipped: 0, Time elapsed: 0.5 sec
";
        let stats = run(log);
        assert_eq!(stats.run, 6);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.duration, 2.0);
    }

    #[test]
    fn test_class_tally_overflow_is_an_error() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Running com.example.FooTest
Tests run: 18446744073709551615, Failures: 0, Errors: 0, Skipped: 0, Time elapsed: 1.5 sec
Running com.example.BarTest
Tests run: 1, Failures: 0, Errors: 0, Skipped: 0, Time elapsed: 0.5 sec
";
        let mut extractor = Box::new(MavenExtractor::new());
        let err = extractor
            .extract(&split(log))
            .expect_err("Should reject overflowing total");
        assert!(matches!(
            err,
            ExtractorError::InvalidCount { ref line, .. } if line.starts_with("Tests run: 1,")
        ));
        // the first class still reaches the totals
        assert_eq!(extractor.stats().run, u64::MAX);
    }

    #[test]
    fn test_failures_plus_errors_overflow_is_an_error() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Tests run: 2, Failures: 18446744073709551615, Errors: 1, Skipped: 0, Time elapsed: 1.5 sec
";
        let mut extractor = Box::new(MavenExtractor::new());
        let result = extractor.extract(&split(log));
        assert!(matches!(result, Err(ExtractorError::InvalidCount { .. })));
    }

    #[test]
    fn test_name_pattern_tie_break() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Tests run: 4, Failures: 4, Errors: 0, Skipped: 0, Time elapsed: 1 sec <<< FAILURE!
testFoo(com.x.FooTest)  Time elapsed: 0.1 sec  <<< FAILURE!
testParam[1](com.x.ParamTest)  Time elapsed: 0.1 sec  <<< FAILURE!
[2] first (checksOrder)(com.x.OrderTest)  Time elapsed: 0.1 sec  <<< FAILURE!
com.x.NewStyleTest.testBare  Time elapsed: 0.1 s  <<< FAILURE!
";
        let stats = run(log);
        assert_eq!(
            stats.failing_tests(),
            [
                "com.x.FooTest.testFoo",
                "com.x.ParamTest.testParam",
                "com.x.OrderTest.checksOrder",
                "com.x.NewStyleTest.testBare",
            ]
        );
    }

    #[test]
    fn test_case_names_capped_by_class_failures() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Tests run: 2, Failures: 1, Errors: 0, Skipped: 0, Time elapsed: 1 sec <<< FAILURE!
testOne(com.x.FooTest)  Time elapsed: 0.1 sec  <<< FAILURE!
testTwo(com.x.FooTest)  Time elapsed: 0.1 sec
";
        let stats = run(log);
        assert_eq!(stats.failing_tests(), ["com.x.FooTest.testOne"]);
    }

    #[test]
    fn test_testng_total_is_replaced_by_surefire_summary() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Running TestSuite
Total tests run: 5, Failures: 1, Skips: 1
Tests run: 5, Failures: 1, Errors: 0, Skipped: 1
";
        let stats = run(log);
        assert_eq!(stats.run, 5);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.frameworks(), ["testng", "junit"]);
    }

    #[test]
    fn test_enumerated_name_shapes() {
        assert_eq!(
            enumerated_test_name("Failed tests:   testBar(com.example.FooTest): expected"),
            Some("com.example.FooTest.testBar".to_string())
        );
        assert_eq!(
            enumerated_test_name("  testQux(com.example.BarTest): boom"),
            Some("com.example.BarTest.testQux".to_string())
        );
        assert_eq!(
            enumerated_test_name("[ERROR]   BetaTest.handlesEmpty:42 expected:<1> but was:<2>"),
            Some("BetaTest.handlesEmpty".to_string())
        );
        assert_eq!(
            enumerated_test_name("  Run 1: FooTest.flaky:12 boom"),
            Some("FooTest.flaky".to_string())
        );
        assert_eq!(
            enumerated_test_name("  com.x.FooTest.testA(com.x.FooTest)"),
            Some("com.x.FooTest.testA".to_string())
        );
        assert_eq!(
            enumerated_test_name("  testP[3](com.x.ParamTest)"),
            Some("com.x.ParamTest.testP".to_string())
        );
    }

    #[test]
    fn test_enumerated_name_rejections() {
        assert_eq!(enumerated_test_name("[ERROR] Failures: "), None);
        assert_eq!(enumerated_test_name("Tests run: 6, Failures: 1"), None);
        assert_eq!(enumerated_test_name("  Could not initialize class com.x.Foo"), None);
        assert_eq!(enumerated_test_name("   "), None);
    }

    #[test]
    fn test_reactor_time_and_total_time() {
        let log = "\
-------------------------------------------------------
 T E S T S
-------------------------------------------------------
Tests run: 1, Failures: 0, Errors: 0, Skipped: 0, Time elapsed: 0.2 sec
[INFO] ------------------------------------------------------------------------
[INFO] Reactor Summary:
[INFO]
[INFO] example-core ....................................... SUCCESS [  2.500 s]
[INFO] example-integration-tests .......................... SUCCESS [01:05 min]
[INFO] ------------------------------------------------------------------------
[INFO] BUILD SUCCESS
[INFO] Total time: 01:10 min
";
        let stats = run(log);
        assert_eq!(stats.duration, 65.0);
        assert_eq!(stats.build_duration, Some(70.0));
    }

    #[test]
    fn test_no_test_section() {
        let stats = run("[INFO] Building core 1.0\n[INFO] BUILD SUCCESS\n");
        assert!(!stats.is_initialized());
        assert_eq!(stats.build_duration, None);
    }
}
