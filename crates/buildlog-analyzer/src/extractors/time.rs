// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Duration formats printed by build tools, converted to seconds
//!
//! Every converter returns `None` when the text carries no recognizable
//! duration. Results are rounded to two decimal places.

use std::sync::LazyLock;

use regex::Regex;

use super::round2;

static MINUTES_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+(?:\.\d+)?) min").expect("valid min regex"));

static PLAIN_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d*)?) ?s").expect("valid sec regex"));

static GRADLE_SECS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+) hrs? )?(?:(\d+) mins? )?(\d+(?:\.\d+)?) secs?")
        .expect("valid gradle secs regex")
});

static GRADLE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+)h )?(?:(\d+)m )?(\d+(?:\.\d+)?)s\b").expect("valid gradle short regex")
});

static ANT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+) minutes? )?(\d+) seconds?").expect("valid ant regex")
});

static CUCUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)m(\d+(?:\.\d+)?)s").expect("valid cucumber regex"));

fn num(caps: &regex::Captures<'_>, group: usize) -> f64 {
    caps.get(group)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Maven durations: `12.5 s`, `12.5 sec`, `0.04s`, or `1:05 min`
#[must_use]
pub fn maven(text: &str) -> Option<f64> {
    if let Some(caps) = MINUTES_SECONDS.captures(text) {
        return Some(round2(num(&caps, 1) * 60.0 + num(&caps, 2)));
    }
    PLAIN_SECONDS
        .captures(text)
        .map(|caps| round2(num(&caps, 1)))
}

/// Gradle durations: `1 mins 5.2 secs`, or `BUILD SUCCESSFUL in 1m 5s`
#[must_use]
pub fn gradle(text: &str) -> Option<f64> {
    GRADLE_SECS
        .captures(text)
        .or_else(|| GRADLE_SHORT.captures(text))
        .map(|caps| round2(num(&caps, 1) * 3600.0 + num(&caps, 2) * 60.0 + num(&caps, 3)))
}

/// Ant durations: `1 minute 23 seconds`, falling back to the Maven forms
#[must_use]
pub fn ant(text: &str) -> Option<f64> {
    match ANT_WORDS.captures(text) {
        Some(caps) => Some(round2(num(&caps, 1) * 60.0 + num(&caps, 2))),
        None => maven(text),
    }
}

/// TestUnit and RSpec durations: `0.0123s`, `1.5 seconds`
#[must_use]
pub fn testunit(text: &str) -> Option<f64> {
    maven(text)
}

/// Cucumber durations: `0m1.234s`
#[must_use]
pub fn cucumber(text: &str) -> Option<f64> {
    CUCUMBER
        .captures(text.trim())
        .map(|caps| round2(num(&caps, 1) * 60.0 + num(&caps, 2)))
}
