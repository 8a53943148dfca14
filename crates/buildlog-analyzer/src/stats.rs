// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test statistics accumulator shared by all extractors

use serde::{Deserialize, Serialize};

/// Suite-level counts, for tools that report per package or suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteCounts {
    /// Suites run
    pub run: u64,
    /// Suites passed (derived at finalize)
    pub ok: u64,
    /// Suites failed
    pub failed: u64,
}

/// Mutable accumulator owned by one extractor for one log
///
/// Counters are initialized at most once, on the first evidence of test
/// activity, so several report blocks in one log add up instead of resetting
/// each other. `ok` is never accumulated: [`TestStats::finalize`] derives it
/// from `run` and `failed` after extraction is complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestStats {
    initialized: bool,
    tests_ran: bool,
    /// Test cases run
    pub run: u64,
    /// Test cases failed (failures and errors)
    pub failed: u64,
    /// Test cases skipped; never subtracted from `run`
    pub skipped: u64,
    /// Test cases passed; only meaningful after finalize
    pub ok: u64,
    /// Accumulated test duration in seconds
    pub duration: f64,
    /// Suite-level counts, if the tool reported them
    pub suites: Option<SuiteCounts>,
    /// Pure build duration in seconds, if the tool printed one
    pub build_duration: Option<f64>,
    failing_tests: Vec<String>,
    frameworks: Vec<String>,
}

impl TestStats {
    /// Create an empty, uninitialized accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize case counters on first evidence of tests; later calls do nothing
    pub fn init(&mut self) {
        if !self.initialized {
            self.run = 0;
            self.failed = 0;
            self.skipped = 0;
            self.ok = 0;
            self.duration = 0.0;
            self.initialized = true;
        }
        self.tests_ran = true;
    }

    /// Record that tests ran without initializing case counters
    pub fn mark_ran(&mut self) {
        self.tests_ran = true;
    }

    /// Whether case counters were initialized
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether any test activity was seen
    #[must_use]
    pub fn tests_ran(&self) -> bool {
        self.tests_ran
    }

    /// Suite counters, created on first use
    pub fn suites_mut(&mut self) -> &mut SuiteCounts {
        self.tests_ran = true;
        self.suites.get_or_insert_with(SuiteCounts::default)
    }

    /// Record a test framework, once
    pub fn add_framework(&mut self, framework: &str) {
        if !self.frameworks.iter().any(|f| f == framework) {
            self.frameworks.push(framework.to_string());
        }
    }

    /// Record a failing test name, once, keeping discovery order
    pub fn add_failing_test(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.is_empty() && !self.failing_tests.contains(&name) {
            self.failing_tests.push(name);
        }
    }

    /// Frameworks observed, in discovery order
    #[must_use]
    pub fn frameworks(&self) -> &[String] {
        &self.frameworks
    }

    /// Failing test names, in discovery order
    #[must_use]
    pub fn failing_tests(&self) -> &[String] {
        &self.failing_tests
    }

    /// Derive `ok` counts once all accumulation is done
    ///
    /// A tool may report more failures than runs (for instance errors in
    /// class setup); `run` is raised to `failed` so that `ok + failed == run`.
    pub fn finalize(&mut self) {
        self.run = self.run.max(self.failed);
        self.ok = self.run - self.failed;
        if let Some(suites) = self.suites.as_mut() {
            suites.run = suites.run.max(suites.failed);
            suites.ok = suites.run - suites.failed;
        }
    }
}
