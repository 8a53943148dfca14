// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for buildlog-analyzer
//!
//! These tests run whole CI logs from `tests/fixtures` through the public
//! analysis entry point and check the resulting records.

use std::path::{Path, PathBuf};

use buildlog_analyzer::prelude::*;
use buildlog_analyzer::{DetectionMethod, SuiteCounts, detect_language, normalize, split};
use similar_asserts::assert_eq;

const FILENAME: &str = "1021_88712_3f2a9c1_88713.log";

/// Get the fixtures directory for test data
fn fixtures_dir() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir).join("tests/fixtures")
}

fn read_fixture(name: &str) -> Vec<u8> {
    let path = fixtures_dir().join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

fn analyze_fixture(name: &str) -> AnalysisResult {
    analyze(&read_fixture(name), FILENAME).expect("Should analyze fixture")
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// Java
// ============================================================================

#[test]
fn test_maven_multimodule() {
    let result = analyze_fixture("maven_multimodule.log");

    assert_eq!(result.identity.build_number, "1021");
    assert_eq!(result.identity.build_id, "88712");
    assert_eq!(result.identity.commit_sha, "3f2a9c1");
    assert_eq!(result.identity.job_id, "88713");
    assert_eq!(result.primary_language.as_deref(), Some("java"));
    assert_eq!(result.analyzer.as_deref(), Some("java-maven"));
    assert_eq!(result.status, BuildStatus::Broken);
    assert_eq!(result.setup_time, Some(3));
    assert!(result.tests_ran);
    assert!(result.tests_failed);
    assert_eq!(result.num_tests_run, Some(6));
    assert_eq!(result.num_tests_failed, Some(2));
    assert_eq!(result.num_tests_ok, Some(4));
    assert_eq!(result.num_tests_skipped, Some(0));
    assert_eq!(result.frameworks, names(&["junit"]));
    assert_eq!(
        result.failing_tests,
        names(&[
            "com.acme.core.ParserTest.parsesEmpty",
            "com.acme.web.RouterTest.routesHome",
        ])
    );
    assert_eq!(result.test_duration, Some(2.25));
    assert_eq!(result.build_duration, Some(6.12));
    assert!(result.is_clean());
}

#[test]
fn test_gradle_check() {
    let result = analyze_fixture("gradle_check.log");

    assert_eq!(result.analyzer.as_deref(), Some("java-gradle"));
    assert_eq!(result.status, BuildStatus::Broken);
    assert_eq!(result.setup_time, None);
    assert!(result.tests_failed);
    assert_eq!(result.num_tests_run, Some(12));
    assert_eq!(result.num_tests_failed, Some(1));
    assert_eq!(result.num_tests_ok, Some(11));
    assert_eq!(result.num_tests_skipped, Some(2));
    assert_eq!(result.failing_tests, names(&["com.acme.StackTest.popsInOrder"]));
    // gradle prints no test duration
    assert_eq!(result.test_duration, Some(0.0));
    assert_eq!(result.build_duration, Some(63.5));
}

#[test]
fn test_ant_junit() {
    let result = analyze_fixture("ant_junit.log");

    assert_eq!(result.analyzer.as_deref(), Some("java-ant"));
    assert_eq!(result.status, BuildStatus::Broken);
    assert!(result.tests_failed);
    assert_eq!(result.num_tests_run, Some(8));
    assert_eq!(result.num_tests_failed, Some(1));
    assert_eq!(result.num_tests_ok, Some(7));
    assert!(result.failing_tests.is_empty());
    assert_eq!(result.test_duration, Some(1.25));
    assert_eq!(result.build_duration, Some(4.0));
}

// ============================================================================
// Ruby
// ============================================================================

#[test]
fn test_ruby_minitest() {
    let result = analyze_fixture("ruby_minitest.log");

    assert_eq!(result.analyzer.as_deref(), Some("ruby"));
    assert_eq!(result.frameworks, names(&["testunit"]));
    assert_eq!(result.num_tests_run, Some(5));
    assert_eq!(result.num_tests_failed, Some(2));
    assert_eq!(result.num_tests_ok, Some(3));
    assert_eq!(
        result.failing_tests,
        names(&["CalculatorTest#test_divide", "CalculatorTest#test_sqrt"])
    );
    assert_eq!(result.test_duration, Some(0.01));
}

#[test]
fn test_ruby_rspec_and_cucumber_add_up() {
    let result = analyze_fixture("ruby_rspec_cucumber.log");

    assert_eq!(result.setup_time, Some(2));
    assert_eq!(result.frameworks, names(&["rspec", "cucumber"]));
    assert_eq!(result.num_tests_run, Some(11));
    assert_eq!(result.num_tests_failed, Some(2));
    assert_eq!(result.num_tests_skipped, Some(1));
    assert_eq!(result.num_tests_ok, Some(9));
    assert_eq!(
        result.failing_tests,
        names(&["./spec/models/order_spec.rb:14", "features/checkout.feature:9"])
    );
    assert_eq!(result.test_duration, Some(0.75));
    assert!(result.tests_failed);
}

// ============================================================================
// Go
// ============================================================================

#[test]
fn test_go_verbose() {
    let result = analyze_fixture("go_verbose.log");

    assert_eq!(result.analyzer.as_deref(), Some("go"));
    assert_eq!(result.num_tests_run, Some(3));
    assert_eq!(result.num_tests_failed, Some(1));
    assert_eq!(result.num_tests_ok, Some(2));
    assert_eq!(result.failing_tests, names(&["TestFormat"]));
    assert_eq!(
        result.suites,
        Some(SuiteCounts {
            run: 2,
            ok: 1,
            failed: 1
        })
    );
    assert_eq!(result.test_duration, Some(0.75));
    assert!(result.tests_failed);
}

#[test]
fn test_go_terse_has_suite_counts_only() {
    let result = analyze_fixture("go_terse.log");

    assert_eq!(result.status, BuildStatus::Ok);
    assert!(result.tests_ran);
    assert!(!result.tests_failed);
    assert_eq!(result.num_tests_run, None);
    assert_eq!(
        result.suites,
        Some(SuiteCounts {
            run: 2,
            ok: 2,
            failed: 0
        })
    );
    assert_eq!(result.test_duration, Some(0.25));

    let record = result.to_record();
    assert_eq!(record.tr_log_num_test_suites_ok, Some(2));
    assert_eq!(record.tr_log_num_tests_run, None);
}

// ============================================================================
// Python
// ============================================================================

#[test]
fn test_python_pytest() {
    let result = analyze_fixture("python_pytest.log");

    assert_eq!(result.frameworks, names(&["pytest"]));
    assert_eq!(result.num_tests_run, Some(4));
    assert_eq!(result.num_tests_failed, Some(1));
    assert_eq!(result.num_tests_ok, Some(3));
    assert_eq!(result.failing_tests, names(&["tests/test_geo.py::test_distance"]));
    assert_eq!(result.test_duration, Some(0.5));
    assert!(result.tests_failed);
}

#[test]
fn test_python_unittest() {
    let result = analyze_fixture("python_unittest.log");

    assert_eq!(result.frameworks, names(&["unittest"]));
    assert_eq!(result.num_tests_run, Some(4));
    assert_eq!(result.num_tests_failed, Some(1));
    assert_eq!(result.num_tests_skipped, Some(1));
    assert_eq!(result.num_tests_ok, Some(3));
    assert_eq!(result.failing_tests, names(&["tests.test_calc.CalcTest.test_div"]));
    assert_eq!(result.test_duration, Some(0.0));
    assert!(result.tests_failed);
}

// ============================================================================
// Status and degraded input
// ============================================================================

#[test]
fn test_cancelled_job() {
    let result = analyze_fixture("cancelled.log");

    assert_eq!(result.status, BuildStatus::Cancelled);
    assert!(!result.tests_ran);
    assert_eq!(result.num_tests_run, None);
    assert_eq!(result.test_duration, None);
}

#[test]
fn test_timed_out_job() {
    let result = analyze_fixture("timeout.log");

    assert_eq!(result.status, BuildStatus::Timeout);
    assert_eq!(result.analyzer.as_deref(), Some("go"));
    assert!(!result.tests_ran);
}

#[test]
fn test_log_without_folds_uses_heuristic() {
    let raw = read_fixture("no_folds.log");
    let text = normalize(&raw);
    let detection = detect_language(&split(&text), &text, 3);
    assert_eq!(detection.method, DetectionMethod::Heuristic);

    let result = analyze(&raw, FILENAME).expect("Should analyze");
    assert_eq!(result.primary_language.as_deref(), Some("java"));
    assert_eq!(result.analyzer.as_deref(), Some("java-ant"));
    assert_eq!(result.status, BuildStatus::Ok);
    assert!(!result.tests_ran);
    assert_eq!(result.warnings, vec![AnalysisError::NoFoldsDetected]);
}

#[test]
fn test_crlf_and_ansi_do_not_change_results() {
    let raw = read_fixture("python_pytest.log");
    let text = String::from_utf8(raw.clone()).expect("Fixture is UTF-8");
    let noisy = text
        .lines()
        .map(|l| format!("\x1b[0K{l}\r\n"))
        .collect::<String>();

    let clean = analyze(&raw, FILENAME).expect("Should analyze");
    let dirty = analyze(noisy.as_bytes(), FILENAME).expect("Should analyze");
    assert_eq!(clean, dirty);
}

#[test]
fn test_every_fixture_projects_to_a_record() {
    let mut entries: Vec<_> = std::fs::read_dir(fixtures_dir())
        .expect("Fixtures directory exists")
        .map(|e| e.expect("Readable entry").path())
        .filter(|p| p.extension().is_some_and(|e| e == "log"))
        .collect();
    entries.sort();
    assert!(entries.len() >= 12);

    for path in entries {
        let raw = std::fs::read(&path).expect("Readable fixture");
        let result = analyze(&raw, FILENAME).expect("Should analyze");
        let record = result.to_record();
        assert_eq!(record.tr_build_id, "88712");
        if let Some(run) = result.num_tests_run {
            let ok = result.num_tests_ok.expect("ok is set with run");
            let failed = result.num_tests_failed.expect("failed is set with run");
            assert_eq!(ok + failed, run, "{}", path.display());
        }
    }
}

#[test]
fn test_custom_analyzer_config() {
    let analyzer = LogAnalyzer::new(AnalyzerConfig::default().with_status_tail_lines(1));
    let log = b"Done. Your build exited with 0.\nlate trailing output\n";
    let result = analyzer.analyze(log, FILENAME).expect("Should analyze");
    assert_eq!(result.status, BuildStatus::Unknown);
}
