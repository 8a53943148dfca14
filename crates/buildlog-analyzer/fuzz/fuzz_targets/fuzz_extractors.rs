// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the per-language extractors
//!
//! Each structured input forces one ecosystem so every extractor sees
//! arbitrary text, not just the one language detection would pick.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use buildlog_analyzer::{AnalyzerConfig, Ecosystem, select_extractor, split};

#[derive(Debug, Arbitrary)]
enum Target {
    Java,
    Ruby,
    Python,
    Go,
}

#[derive(Debug, Arbitrary)]
struct Input {
    target: Target,
    text: String,
}

fuzz_target!(|input: Input| {
    let ecosystem = match input.target {
        Target::Java => Ecosystem::Java,
        Target::Ruby => Ecosystem::Ruby,
        Target::Python => Ecosystem::Python,
        Target::Go => Ecosystem::Go,
    };
    let folds = split(&input.text);
    if let Some(mut extractor) =
        select_extractor(Some(ecosystem), &input.text, &AnalyzerConfig::default())
    {
        let _ = extractor.extract(&folds);
        let _ = extractor.reports_test_failure();
        let mut stats = extractor.into_stats();
        stats.finalize();
        assert_eq!(stats.ok + stats.failed, stats.run);
    }
});
