// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build language detection
//!
//! The CI runner declares the build language in its `system_info` fold. When
//! that fold is missing (typically because folding broke), a token-frequency
//! heuristic guesses the ecosystem instead. The heuristic can be wrong; the
//! [`DetectionMethod`] tells callers which path produced the answer.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fold::Folds;

/// Name of the fold carrying runner metadata
pub const SYSTEM_INFO_FOLD: &str = "system_info";

static BUILD_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Build language: (.*)").expect("valid language regex"));

/// Tokens counted by the fallback heuristic, in priority order
static LANGUAGE_TOKENS: LazyLock<Vec<(Ecosystem, Regex)>> = LazyLock::new(|| {
    [
        (Ecosystem::Java, r"(?i)java"),
        (Ecosystem::Ruby, r"(?i)ruby"),
        (Ecosystem::Python, r"(?i)python"),
        (Ecosystem::Go, r"(?i)(golang|go test|go get)"),
    ]
    .into_iter()
    .map(|(eco, pattern)| (eco, Regex::new(pattern).expect("valid token regex")))
    .collect()
});

/// Language ecosystems with a test-statistics extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Java and Android builds (Maven, Gradle, Ant)
    Java,
    /// Ruby builds (TestUnit, RSpec, Cucumber)
    Ruby,
    /// Python builds (unittest, pytest, doctest)
    Python,
    /// Go builds (go test, Ginkgo)
    Go,
}

impl Ecosystem {
    /// Map a declared build language to an ecosystem
    #[must_use]
    pub fn from_language(language: &str) -> Option<Self> {
        match language.trim().to_ascii_lowercase().as_str() {
            "java" | "android" => Some(Self::Java),
            "ruby" => Some(Self::Ruby),
            "python" => Some(Self::Python),
            "go" => Some(Self::Go),
            _ => None,
        }
    }

    /// Canonical lowercase language name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Ruby => "ruby",
            Self::Python => "python",
            Self::Go => "go",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the language was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Declared by the runner in the metadata fold
    Declared,
    /// Guessed from token frequencies; may be wrong
    Heuristic,
    /// Nothing matched
    Undetected,
}

/// Outcome of language detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Language as declared, or the canonical name of a guessed ecosystem
    pub language: Option<String>,
    /// Ecosystem with an extractor, if the language maps to one
    pub ecosystem: Option<Ecosystem>,
    /// Which path produced the answer
    pub method: DetectionMethod,
}

/// Detect the primary build language of a log
///
/// `text` is the whole normalized log, used only by the fallback heuristic.
#[must_use]
pub fn detect_language(folds: &Folds, text: &str, threshold: usize) -> Detection {
    if let Some(language) = declared_language(folds) {
        return Detection {
            ecosystem: Ecosystem::from_language(&language),
            language: Some(language),
            method: DetectionMethod::Declared,
        };
    }

    match guess_ecosystem(text, threshold) {
        Some(eco) => Detection {
            language: Some(eco.as_str().to_string()),
            ecosystem: Some(eco),
            method: DetectionMethod::Heuristic,
        },
        None => Detection {
            language: None,
            ecosystem: None,
            method: DetectionMethod::Undetected,
        },
    }
}

/// Read `Build language: <lang>` from the metadata fold
fn declared_language(folds: &Folds) -> Option<String> {
    folds
        .get(SYSTEM_INFO_FOLD)?
        .content
        .iter()
        .find_map(|line| BUILD_LANGUAGE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|lang| !lang.is_empty())
}

/// First ecosystem, in fixed priority order, whose token count reaches `threshold`
fn guess_ecosystem(text: &str, threshold: usize) -> Option<Ecosystem> {
    LANGUAGE_TOKENS
        .iter()
        .find(|(_, re)| re.find_iter(text).take(threshold).count() >= threshold)
        .map(|(eco, _)| *eco)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split;
    use similar_asserts::assert_eq;

    #[test]
    fn test_declared_language() {
        let text = "travis_fold:start:system_info\nBuild system information\nBuild language: java\ntravis_fold:end:system_info\n";
        let detection = detect_language(&split(text), text, 3);
        assert_eq!(detection.language.as_deref(), Some("java"));
        assert_eq!(detection.ecosystem, Some(Ecosystem::Java));
        assert_eq!(detection.method, DetectionMethod::Declared);
    }

    #[test]
    fn test_declared_unsupported_language() {
        let text = "travis_fold:start:system_info\nBuild language: node_js\ntravis_fold:end:system_info\n";
        let detection = detect_language(&split(text), text, 3);
        assert_eq!(detection.language.as_deref(), Some("node_js"));
        assert_eq!(detection.ecosystem, None);
    }

    #[test]
    fn test_android_maps_to_java() {
        assert_eq!(Ecosystem::from_language("Android"), Some(Ecosystem::Java));
    }

    #[test]
    fn test_heuristic_fallback() {
        let text = "$ ruby -v\nruby 2.2\nUsing Ruby gems\n";
        let detection = detect_language(&split(text), text, 3);
        assert_eq!(detection.ecosystem, Some(Ecosystem::Ruby));
        assert_eq!(detection.method, DetectionMethod::Heuristic);
    }

    #[test]
    fn test_heuristic_priority_order() {
        // both cross the threshold; java is tested first
        let text = "python python python java java java";
        let detection = detect_language(&split(text), text, 3);
        assert_eq!(detection.ecosystem, Some(Ecosystem::Java));
    }

    #[test]
    fn test_heuristic_below_threshold() {
        let text = "java ruby python";
        let detection = detect_language(&split(text), text, 3);
        assert_eq!(detection.ecosystem, None);
        assert_eq!(detection.method, DetectionMethod::Undetected);
    }
}
