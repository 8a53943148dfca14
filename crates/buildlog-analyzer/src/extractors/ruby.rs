// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ruby extractor (TestUnit/minitest, RSpec, Cucumber)
//!
//! TestUnit summaries are only trusted inside a test section opened by a
//! `# Running` or `Loaded suite` banner. RSpec summaries are only trusted when
//! the log mentions rspec at all. Cucumber summaries are distinctive enough to
//! be read anywhere. Counts from all three frameworks add up.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Extractor, Rule, add_count, apply_rules, count, count_sum, text, time};
use crate::error::ExtractorError;
use crate::fold::Folds;
use crate::stats::TestStats;

/// Analyzer tag
pub const ANALYZER: &str = "ruby";

static RSPEC_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rspec").expect("valid rspec regex"));

static RUNNING_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:# Running|Loaded suite )").expect("valid running regex")
});

static TESTUNIT_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+) (?:runs?|tests?), (\d+) assertions?, (\d+) failures?, (\d+) errors?(?:, (\d+) (?:skips?|pendings?))?",
    )
    .expect("valid testunit regex")
});

static RSPEC_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) examples?, (\d+) failures?(?:, (\d+) pending)?").expect("valid rspec regex")
});

static CUCUMBER_SCENARIOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) scenarios? ?(?:\((.*)\))?").expect("valid scenarios regex")
});

static CUCUMBER_STEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) steps?\b").expect("valid steps regex"));

static SCENARIO_OUTCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) (failed|skipped|pending|undefined|passed)").expect("valid outcome regex")
});

static FINISHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Finished in (.+)").expect("valid finished regex"));

static FAILURE_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+\) )?(?:Failure|Error):\s*(.*)$").expect("valid failure regex")
});

static FAILED_EXAMPLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Failed examples:").expect("valid failed examples regex"));

static FAILING_SCENARIOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Failing Scenarios:").expect("valid failing scenarios regex")
});

static RSPEC_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rspec (\S+:\d+)").expect("valid rspec entry regex"));

static CUCUMBER_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cucumber (?:-p \S+ )?(\S+\.feature:\d+)").expect("valid cucumber entry regex")
});

static METHOD_OF_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+[?!]?)\(([\w:]+)\)$").expect("valid declaration regex")
});

static RULES: &[Rule<RubyExtractor>] = &[
    Rule {
        pattern: &TESTUNIT_SUMMARY,
        handler: RubyExtractor::on_testunit_summary,
    },
    Rule {
        pattern: &RSPEC_SUMMARY,
        handler: RubyExtractor::on_rspec_summary,
    },
    Rule {
        pattern: &CUCUMBER_SCENARIOS,
        handler: RubyExtractor::on_cucumber_scenarios,
    },
    Rule {
        pattern: &CUCUMBER_STEPS,
        handler: RubyExtractor::on_cucumber_steps,
    },
    Rule {
        pattern: &FINISHED,
        handler: RubyExtractor::on_finished,
    },
    Rule {
        pattern: &FAILURE_BANNER,
        handler: RubyExtractor::on_failure_banner,
    },
    Rule {
        pattern: &FAILED_EXAMPLES,
        handler: RubyExtractor::on_failed_examples,
    },
    Rule {
        pattern: &FAILING_SCENARIOS,
        handler: RubyExtractor::on_failing_scenarios,
    },
];

/// State of a name list following a banner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum List {
    #[default]
    Off,
    Waiting,
    Reading,
}

/// Extractor for Ruby builds
#[derive(Debug, Default)]
pub struct RubyExtractor {
    stats: TestStats,
    rspec: bool,
    in_running: bool,
    await_declaration: bool,
    await_cucumber_duration: bool,
    failed_examples: List,
    failing_scenarios: List,
}

impl RubyExtractor {
    /// Create an extractor with empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn process(&mut self, line: &str) -> Result<(), ExtractorError> {
        if self.await_declaration {
            self.await_declaration = false;
            if let Some(token) = line.split_whitespace().next() {
                self.stats.add_failing_test(declaration_name(token));
            }
            return Ok(());
        }

        if self.await_cucumber_duration {
            self.await_cucumber_duration = false;
            if let Some(duration) = time::cucumber(line) {
                self.stats.duration += duration;
                return Ok(());
            }
        }

        if read_list(&mut self.failed_examples, &RSPEC_ENTRY, line, &mut self.stats)
            || read_list(&mut self.failing_scenarios, &CUCUMBER_ENTRY, line, &mut self.stats)
        {
            return Ok(());
        }

        if RUNNING_BANNER.is_match(line) {
            self.in_running = true;
            return Ok(());
        }

        apply_rules(RULES, self, line)?;
        Ok(())
    }

    fn on_testunit_summary(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.in_running {
            return Ok(());
        }
        self.stats.init();
        self.stats.add_framework("testunit");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        add_count(&mut self.stats.failed, count_sum(caps, &[3, 4])?, &caps[0])?;
        add_count(&mut self.stats.skipped, count(caps, 5)?, &caps[0])?;
        Ok(())
    }

    fn on_rspec_summary(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.rspec {
            return Ok(());
        }
        self.stats.init();
        self.stats.add_framework("rspec");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        add_count(&mut self.stats.failed, count(caps, 2)?, &caps[0])?;
        add_count(&mut self.stats.skipped, count(caps, 3)?, &caps[0])?;
        Ok(())
    }

    fn on_cucumber_scenarios(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.add_framework("cucumber");
        add_count(&mut self.stats.run, count(caps, 1)?, &caps[0])?;
        for outcome in SCENARIO_OUTCOME.captures_iter(text(caps, 2)) {
            let n = count(&outcome, 1)?;
            match &outcome[2] {
                "failed" => add_count(&mut self.stats.failed, n, &caps[0])?,
                "skipped" | "pending" | "undefined" => {
                    add_count(&mut self.stats.skipped, n, &caps[0])?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn on_cucumber_steps(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.await_cucumber_duration = true;
        Ok(())
    }

    fn on_finished(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.stats.init();
        self.stats.duration += time::testunit(text(caps, 1)).unwrap_or(0.0);
        Ok(())
    }

    fn on_failure_banner(&mut self, caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if !self.in_running {
            return Ok(());
        }
        match text(caps, 1).split_whitespace().next() {
            Some(token) => self.stats.add_failing_test(declaration_name(token)),
            None => self.await_declaration = true,
        }
        Ok(())
    }

    fn on_failed_examples(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        if self.rspec {
            self.failed_examples = List::Waiting;
        }
        Ok(())
    }

    fn on_failing_scenarios(&mut self, _caps: &Captures<'_>) -> Result<(), ExtractorError> {
        self.failing_scenarios = List::Waiting;
        Ok(())
    }
}

/// Consume `line` as a list entry if a list is open
///
/// Blank lines are tolerated before the first entry; any other non-matching
/// line closes the list and is left for the regular rules.
fn read_list(state: &mut List, entry: &Regex, line: &str, stats: &mut TestStats) -> bool {
    if *state == List::Off {
        return false;
    }
    if let Some(caps) = entry.captures(line) {
        stats.add_failing_test(&caps[1]);
        *state = List::Reading;
        return true;
    }
    if *state == List::Waiting && line.trim().is_empty() {
        return true;
    }
    *state = List::Off;
    false
}

/// `test_foo(FooTest)` becomes `FooTest#test_foo`; other shapes lose a trailing colon
fn declaration_name(token: &str) -> String {
    let token = token.trim_end_matches(':');
    match METHOD_OF_CLASS.captures(token) {
        Some(caps) => format!("{}#{}", &caps[2], &caps[1]),
        None => token.to_string(),
    }
}

impl Extractor for RubyExtractor {
    fn analyzer(&self) -> &'static str {
        ANALYZER
    }

    fn extract(&mut self, folds: &Folds) -> Result<(), ExtractorError> {
        let lines = &folds.out_of_fold().content;
        self.rspec = lines.iter().any(|line| RSPEC_MENTION.is_match(line));
        for line in lines {
            self.process(line)?;
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
