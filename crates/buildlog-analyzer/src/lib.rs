// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlog-analyzer: Test statistics from CI build logs
//!
//! This library crate splits Travis-style CI logs into folds, determines the
//! build status, setup time and primary language, then hands the log to a
//! build-tool specific extractor (Maven, Gradle, Ant, Ruby, Go, Python) that
//! recovers test counts, failing test names and durations.
//!
//! # Example
//!
//! ```
//! use buildlog_analyzer::{BuildStatus, analyze};
//!
//! let log = b"\
//! travis_fold:start:system_info\n\
//! Build language: go\n\
//! travis_fold:end:system_info\n\
//! ok  \tgithub.com/acme/nums\t0.50s\n\
//! Done. Your build exited with 0.\n";
//!
//! let result = analyze(log, "12_345_abc123_678.log").unwrap();
//! assert_eq!(result.status, BuildStatus::Ok);
//! assert_eq!(result.analyzer.as_deref(), Some("go"));
//! assert!(result.tests_ran);
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod extractors;
pub mod fold;
pub mod identity;
pub mod result;
pub mod splitter;
pub mod stats;
pub mod status;

pub use analyzer::{LogAnalyzer, analyze};
pub use config::AnalyzerConfig;
pub use detect::{Detection, DetectionMethod, Ecosystem, detect_language};
pub use dispatch::{JavaTool, detect_java_tool, select_extractor, sniff_java_tool};
pub use error::{AnalysisError, ExtractorError};
pub use extractors::Extractor;
pub use fold::{Fold, Folds};
pub use identity::LogIdentity;
pub use result::{AnalysisResult, COLUMNS, OutputRecord};
pub use splitter::{normalize, split};
pub use stats::{SuiteCounts, TestStats};
pub use status::{BuildStatus, analyze_status, setup_time};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analyzer::{LogAnalyzer, analyze};
    pub use crate::config::AnalyzerConfig;
    pub use crate::error::AnalysisError;
    pub use crate::result::{AnalysisResult, OutputRecord};
    pub use crate::status::BuildStatus;
}
