// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the buildlog-analysis command
//!
//! This module provides the command-line configuration, including input and
//! output locations, output format, worker count, analysis thresholds, and
//! logging options. Every option can also be set through a `BUILDLOG_*`
//! environment variable.

use std::path::PathBuf;
use std::thread;

use buildlog_analyzer::AnalyzerConfig;
use buildlog_analyzer::config::{
    DEFAULT_LANGUAGE_THRESHOLD, DEFAULT_STATUS_TAIL_LINES, DEFAULT_TOOL_SNIFF_THRESHOLD,
};
use clap::{Parser, ValueEnum};

/// Output record format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with one header row
    #[default]
    Csv,
    /// A JSON array of objects
    Json,
}

/// Extract test statistics from CI build logs
#[derive(Parser, Debug, Clone)]
#[command(name = "buildlog-analysis")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Log file, or directory of `.log` files
    #[arg(env = "BUILDLOG_INPUT")]
    pub input: PathBuf,

    /// Write records to this file instead of stdout
    ///
    /// Missing parent directories are created.
    #[arg(short, long, env = "BUILDLOG_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv, env = "BUILDLOG_FORMAT")]
    pub format: OutputFormat,

    /// Walk input directories recursively
    #[arg(short, long, default_value = "false")]
    pub recursive: bool,

    /// Number of logs analyzed in parallel
    ///
    /// Defaults to the number of available CPUs.
    #[arg(short, long, env = "BUILDLOG_JOBS")]
    pub jobs: Option<usize>,

    /// Stop at the first log that cannot be analyzed
    #[arg(long, default_value = "false")]
    pub fail_fast: bool,

    /// Language token occurrences needed when no metadata fold exists
    #[arg(long, default_value_t = DEFAULT_LANGUAGE_THRESHOLD, env = "BUILDLOG_LANGUAGE_THRESHOLD")]
    pub language_threshold: usize,

    /// Build tool token occurrences needed to pick a Java build tool
    #[arg(long = "tool-threshold", default_value_t = DEFAULT_TOOL_SNIFF_THRESHOLD, env = "BUILDLOG_TOOL_THRESHOLD")]
    pub tool_threshold: usize,

    /// Trailing non-blank lines searched for the build status
    #[arg(long, default_value_t = DEFAULT_STATUS_TAIL_LINES, env = "BUILDLOG_STATUS_TAIL")]
    pub status_tail: usize,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with records on stdout.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: None,
            format: OutputFormat::default(),
            recursive: false,
            jobs: None,
            fail_fast: false,
            language_threshold: DEFAULT_LANGUAGE_THRESHOLD,
            tool_threshold: DEFAULT_TOOL_SNIFF_THRESHOLD,
            status_tail: DEFAULT_STATUS_TAIL_LINES,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Number of parallel workers, defaulting to the available CPUs
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1)
        })
    }

    /// Analysis thresholds taken from the command line
    #[must_use]
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_language_threshold(self.language_threshold)
            .with_tool_sniff_threshold(self.tool_threshold)
            .with_status_tail_lines(self.status_tail)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path doesn't exist
    /// - The job count or a threshold is zero
    /// - The output parent directory cannot be created
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input.exists() {
            return Err(ConfigError::InputNotFound(self.input.clone()));
        }

        if self.jobs == Some(0) {
            return Err(ConfigError::InvalidJobs);
        }

        for (name, value) in [
            ("language-threshold", self.language_threshold),
            ("tool-threshold", self.tool_threshold),
            ("status-tail", self.status_tail),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidThreshold(name));
            }
        }

        if let Some(parent) = self.output.as_deref().and_then(|p| p.parent())
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::OutputDirectoryCreateFailed(parent.to_path_buf(), e))?;
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input path not found
    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    /// Zero workers requested
    #[error("Job count must be at least 1")]
    InvalidJobs,

    /// A threshold was set to zero
    #[error("--{0} must be at least 1")]
    InvalidThreshold(&'static str),

    /// Failed to create output directory
    #[error("Failed to create output directory {0}: {1}")]
    OutputDirectoryCreateFailed(PathBuf, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.output.is_none());
        assert_eq!(config.format, OutputFormat::Csv);
        assert!(!config.recursive);
        assert!(!config.fail_fast);
        assert!(!config.verbose);
        assert!(!config.quiet);
        assert_eq!(config.analyzer_config(), AnalyzerConfig::default());
    }

    #[test]
    fn test_jobs_default_is_positive() {
        assert!(Config::default().jobs() >= 1);
    }

    #[test]
    fn test_jobs_custom() {
        let config = Config {
            jobs: Some(3),
            ..Default::default()
        };
        assert_eq!(config.jobs(), 3);
    }

    #[test]
    fn test_analyzer_config_overrides() {
        let config = Config {
            language_threshold: 5,
            tool_threshold: 1,
            status_tail: 8,
            ..Default::default()
        };
        let analyzer = config.analyzer_config();
        assert_eq!(analyzer.language_threshold, 5);
        assert_eq!(analyzer.tool_sniff_threshold, 1);
        assert_eq!(analyzer.status_tail_lines, 8);
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(Config::default().log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_input() {
        let config = Config {
            input: PathBuf::from("/nonexistent/path/12345"),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InputNotFound(_))));
    }

    #[test]
    fn test_validate_zero_jobs() {
        let config = Config {
            jobs: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidJobs)));
    }

    #[test]
    fn test_validate_zero_threshold() {
        let config = Config {
            status_tail: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold("status-tail"))
        ));
    }

    #[test]
    fn test_validate_creates_output_directory() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let output = dir.path().join("nested/out/records.csv");
        let config = Config {
            input: dir.path().to_path_buf(),
            output: Some(output.clone()),
            ..Default::default()
        };
        config.validate().expect("Should validate");
        assert!(output.parent().is_some_and(std::path::Path::is_dir));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
