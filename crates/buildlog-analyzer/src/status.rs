// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build status and setup-time analysis
//!
//! Both are derived without knowing the build language: the status from the
//! runner's closing lines, the setup time from the timing of setup folds.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fold::Folds;

static CANCELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Done: Job Cancelled").expect("valid cancel regex"));

static TIMED_OUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(The job exceeded the maximum time limit for jobs, and has been terminated|No output has been received in the last \S+)",
    )
    .expect("valid timeout regex")
});

static EXITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Done\. Your build exited with (\d+)\.").expect("valid exit regex")
});

static SETUP_FOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(system_info|git.checkout|services|before.install)").expect("valid setup regex")
});

/// Overall outcome of a CI job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    /// The job exited with code 0
    Ok,
    /// The job exited with a non-zero code
    Broken,
    /// The job was cancelled
    Cancelled,
    /// The job hit the runner's time or inactivity limit
    Timeout,
    /// No status marker was found
    #[default]
    Unknown,
}

impl BuildStatus {
    /// Lowercase name used in output records
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Broken => "broken",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the build status from the last `tail_lines` non-blank out-of-fold lines
///
/// Cancellation beats timeout, and both beat an exit-code line, since the
/// runner can print a late exit code after killing a job.
#[must_use]
pub fn analyze_status(folds: &Folds, tail_lines: usize) -> BuildStatus {
    let tail: Vec<&str> = folds
        .out_of_fold()
        .content
        .iter()
        .rev()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .take(tail_lines)
        .collect();

    if tail.iter().any(|l| CANCELLED.is_match(l)) {
        return BuildStatus::Cancelled;
    }
    if tail.iter().any(|l| TIMED_OUT.is_match(l)) {
        return BuildStatus::Timeout;
    }

    // tail is reversed, so the first hit is the last exit line of the log
    tail.iter()
        .find_map(|l| EXITED.captures(l))
        .map(|caps| match caps[1].trim_start_matches('0') {
            "" => BuildStatus::Ok,
            _ => BuildStatus::Broken,
        })
        .unwrap_or_default()
}

/// Sum the durations of setup folds (system info, checkout, services, before_install)
///
/// Setup folds without a timing marker are skipped. Returns `None` when no
/// setup fold carried a duration.
#[must_use]
pub fn setup_time(folds: &Folds) -> Option<u64> {
    folds
        .iter()
        .filter(|f| SETUP_FOLD.is_match(&f.name))
        .filter_map(|f| f.duration)
        .fold(None, |acc, d| Some(acc.unwrap_or(0_u64).saturating_add(d)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split;
    use similar_asserts::assert_eq;

    fn status_of(text: &str) -> BuildStatus {
        analyze_status(&split(text), 5)
    }

    #[test]
    fn test_exit_zero_is_ok() {
        assert_eq!(status_of("build\n\nDone. Your build exited with 0.\n"), BuildStatus::Ok);
    }

    #[test]
    fn test_exit_nonzero_is_broken() {
        assert_eq!(status_of("Done. Your build exited with 1."), BuildStatus::Broken);
        assert_eq!(status_of("Done. Your build exited with 10."), BuildStatus::Broken);
    }

    #[test]
    fn test_cancel_beats_exit_code() {
        let text = "Done: Job Cancelled\nDone. Your build exited with 0.";
        assert_eq!(status_of(text), BuildStatus::Cancelled);
    }

    #[test]
    fn test_timeout_beats_exit_code() {
        let text = "\
The job exceeded the maximum time limit for jobs, and has been terminated.
Done. Your build exited with 0.";
        assert_eq!(status_of(text), BuildStatus::Timeout);

        let stalled = "No output has been received in the last 10m0s, this potentially indicates a stalled build";
        assert_eq!(status_of(stalled), BuildStatus::Timeout);
    }

    #[test]
    fn test_marker_outside_tail_is_ignored() {
        let mut text = String::from("Done. Your build exited with 0.\n");
        for i in 0..10 {
            text.push_str(&format!("trailing line {i}\n"));
        }
        assert_eq!(status_of(&text), BuildStatus::Unknown);
    }

    #[test]
    fn test_marker_inside_fold_is_ignored() {
        let text = "travis_fold:start:x\nDone. Your build exited with 0.\ntravis_fold:end:x";
        assert_eq!(status_of(text), BuildStatus::Unknown);
    }

    #[test]
    fn test_setup_time_sums_timed_setup_folds() {
        let text = "\
travis_fold:start:system_info
travis_time:end:a:start=0,finish=1,duration=2000000000
travis_fold:end:system_info
travis_fold:start:git.checkout
travis_time:end:b:start=0,finish=1,duration=3000000000
travis_fold:end:git.checkout
travis_fold:start:services
travis_fold:end:services
travis_fold:start:install
travis_time:end:c:start=0,finish=1,duration=9000000000
travis_fold:end:install";
        assert_eq!(setup_time(&split(text)), Some(5));
    }

    #[test]
    fn test_setup_time_none_without_durations() {
        let text = "travis_fold:start:system_info\nBuild language: ruby\ntravis_fold:end:system_info";
        assert_eq!(setup_time(&split(text)), None);
        assert_eq!(setup_time(&split("no folds at all")), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BuildStatus::Cancelled).expect("serializes");
        assert_eq!(json, "\"cancelled\"");
        assert_eq!(BuildStatus::Timeout.to_string(), "timeout");
    }
}
