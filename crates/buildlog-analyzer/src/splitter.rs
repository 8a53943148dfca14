// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Log normalization and fold splitting
//!
//! Raw log bytes are decoded permissively, stripped of ANSI escape sequences
//! and normalized to `\n` line endings before being split into [`Folds`] in a
//! single linear pass.
//!
//! # Example
//!
//! ```
//! use buildlog_analyzer::splitter::{normalize, split};
//!
//! let text = normalize(b"travis_fold:start:install\r\n$ bundle\r\ntravis_fold:end:install\r\nDone.\n");
//! let folds = split(&text);
//! assert_eq!(folds.get("install").unwrap().content, vec!["$ bundle"]);
//! assert_eq!(folds.out_of_fold().content, vec!["Done."]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::fold::{Folds, OUT_OF_FOLD};

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\x1b\][^\x07]*\x07").expect("valid ANSI regex")
});

static FOLD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fold:start:([\w.\-]+)").expect("valid fold start regex"));

static FOLD_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fold:end:([\w.\-]+)").expect("valid fold end regex"));

static FOLD_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"travis_time:\S*?duration=(\d+)").expect("valid duration regex")
});

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Decode raw log bytes into analyzable text
///
/// Invalid UTF-8 is replaced rather than rejected, ANSI color and cursor
/// sequences are removed, and `\r\n` as well as lone `\r` become `\n`.
#[must_use]
pub fn normalize(raw: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(raw);
    let stripped = ANSI_ESCAPE.replace_all(&decoded, "");
    stripped.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split normalized log text into folds
///
/// Start, end and timing markers are consumed and never stored as content.
/// An end marker without a matching start simply returns to the out-of-fold
/// bucket.
#[must_use]
pub fn split(text: &str) -> Folds {
    let mut folds = Folds::new();
    let mut current = OUT_OF_FOLD.to_string();

    for line in text.lines() {
        if let Some(caps) = FOLD_START.captures(line) {
            current = caps[1].to_string();
            folds.entry(&current);
            continue;
        }

        if FOLD_END.is_match(line) {
            current = OUT_OF_FOLD.to_string();
            continue;
        }

        if let Some(nanos) = FOLD_DURATION
            .captures(line)
            .and_then(|caps| caps[1].parse::<u64>().ok())
        {
            folds.entry(&current).duration = Some(nanos_to_secs(nanos));
            continue;
        }

        folds.entry(&current).content.push(line.to_string());
    }

    folds
}

/// Convert a nanosecond duration to whole seconds, rounding half up
fn nanos_to_secs(nanos: u64) -> u64 {
    nanos / NANOS_PER_SEC + u64::from(nanos % NANOS_PER_SEC >= NANOS_PER_SEC / 2)
}
