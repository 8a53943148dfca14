// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Batch analysis on a bounded worker pool
//!
//! Each log is analyzed on the blocking pool while a semaphore caps the
//! number of logs in flight. Results are collected by a single consumer that
//! owns the sink and writes records in discovery order, whatever order the
//! workers finish in.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use buildlog_analyzer::{AnalysisError, AnalysisResult, LogAnalyzer, OutputRecord};
use thiserror::Error;
use tokio::sync::{AcquireError, Semaphore};
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::discover::{DiscoverError, discover_logs};
use crate::output::{OutputError, RecordSink};

// ============================================================================
// Error Types
// ============================================================================

/// Failure to analyze one log file
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read
    #[error("Failed to read log: {0}")]
    Read(#[from] std::io::Error),

    /// The log could not be analyzed
    #[error("Failed to analyze log: {0}")]
    Analysis(#[from] AnalysisError),

    /// The worker analyzing the log panicked or was cancelled
    #[error("Worker failed: {0}")]
    Worker(JoinError),
}

/// Batch errors
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input discovery failed
    #[error("Discovery error: {0}")]
    Discover(#[from] DiscoverError),

    /// Writing records failed
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// A log failed while `fail_fast` was set
    #[error("Aborted at {path}: {source}")]
    Aborted {
        /// The log that failed
        path: PathBuf,
        /// Why it failed
        #[source]
        source: FileError,
    },

    /// A worker that no file is waiting for failed
    #[error("Worker failed: {0}")]
    Worker(#[from] JoinError),

    /// The worker pool was shut down
    #[error("Worker pool closed: {0}")]
    PoolClosed(#[from] AcquireError),
}

// ============================================================================
// Options and Summary
// ============================================================================

/// Options for one batch
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum logs analyzed at once
    pub jobs: usize,
    /// Stop at the first failing log
    pub fail_fast: bool,
    /// Analyzer shared by all workers
    pub analyzer: LogAnalyzer,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            fail_fast: false,
            analyzer: LogAnalyzer::default(),
        }
    }
}

impl From<&Config> for BatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            jobs: config.jobs(),
            fail_fast: config.fail_fast,
            analyzer: LogAnalyzer::new(config.analyzer_config()),
        }
    }
}

/// Counts reported at the end of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Logs that produced a record
    pub analyzed: usize,
    /// Logs that could not be analyzed
    pub failed: usize,
    /// Analyzed logs that carried warnings
    pub with_warnings: usize,
}

// ============================================================================
// Batch driver
// ============================================================================

/// Read and analyze one log file
///
/// The file name, not the full path, is used for the build identity.
///
/// # Errors
///
/// Returns a `FileError` if the file cannot be read or the log is empty.
pub fn analyze_file(analyzer: &LogAnalyzer, path: &Path) -> Result<AnalysisResult, FileError> {
    let raw = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(analyzer.analyze(&raw, &filename)?)
}

type AnalyzeFn = fn(&LogAnalyzer, &Path) -> Result<AnalysisResult, FileError>;

struct Finished {
    index: usize,
    path: PathBuf,
    outcome: Result<AnalysisResult, FileError>,
}

/// Single consumer that restores discovery order before writing
struct Collector {
    fail_fast: bool,
    next: usize,
    pending: BTreeMap<usize, Option<OutputRecord>>,
    summary: BatchSummary,
}

impl Collector {
    fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            next: 0,
            pending: BTreeMap::new(),
            summary: BatchSummary::default(),
        }
    }

    fn accept<W: Write>(
        &mut self,
        finished: Finished,
        sink: &mut RecordSink<W>,
    ) -> Result<(), BatchError> {
        let record = match finished.outcome {
            Ok(result) => {
                self.summary.analyzed += 1;
                if !result.is_clean() {
                    self.summary.with_warnings += 1;
                }
                debug!(
                    path = %finished.path.display(),
                    warnings = result.warnings.len(),
                    "Analyzed log"
                );
                Some(result.to_record())
            }
            Err(source) => {
                self.summary.failed += 1;
                warn!(path = %finished.path.display(), error = %source, "Failed to analyze log");
                if self.fail_fast {
                    return Err(BatchError::Aborted {
                        path: finished.path,
                        source,
                    });
                }
                None
            }
        };

        self.pending.insert(finished.index, record);
        while let Some(record) = self.pending.remove(&self.next) {
            if let Some(record) = record {
                sink.write(&record)?;
            }
            self.next += 1;
        }
        Ok(())
    }
}

/// Analyze `paths` and write one record per analyzable log to `sink`
///
/// A log that cannot be read or analyzed, or whose worker panics, is logged
/// and counted as failed; the batch moves on to the next log.
///
/// # Errors
///
/// Returns an error if writing fails or (with `fail_fast`) a log cannot be
/// analyzed. Otherwise failing logs are only counted in the summary.
pub async fn analyze_batch<W: Write>(
    paths: Vec<PathBuf>,
    options: &BatchOptions,
    sink: &mut RecordSink<W>,
) -> Result<BatchSummary, BatchError> {
    analyze_batch_with(paths, options, sink, analyze_file).await
}

async fn analyze_batch_with<W: Write>(
    paths: Vec<PathBuf>,
    options: &BatchOptions,
    sink: &mut RecordSink<W>,
    analyze: AnalyzeFn,
) -> Result<BatchSummary, BatchError> {
    let semaphore = Arc::new(Semaphore::new(options.jobs.max(1)));
    let mut join_set = JoinSet::new();
    let mut in_flight: HashMap<Id, (usize, PathBuf)> = HashMap::new();
    let mut collector = Collector::new(options.fail_fast);
    info!(files = paths.len(), jobs = options.jobs, "Starting batch analysis");

    for (index, path) in paths.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let analyzer = options.analyzer;
        let task_path = path.clone();
        let handle = join_set.spawn_blocking(move || {
            let _permit = permit;
            let outcome = analyze(&analyzer, &task_path);
            Finished {
                index,
                path: task_path,
                outcome,
            }
        });
        in_flight.insert(handle.id(), (index, path));

        while let Some(joined) = join_set.try_join_next_with_id() {
            let finished = settle(joined, &mut in_flight)?;
            collector.accept(finished, sink)?;
        }
    }

    while let Some(joined) = join_set.join_next_with_id().await {
        let finished = settle(joined, &mut in_flight)?;
        collector.accept(finished, sink)?;
    }

    Ok(collector.summary)
}

/// Turn a joined task into its file's outcome, including worker failures
fn settle(
    joined: Result<(Id, Finished), JoinError>,
    in_flight: &mut HashMap<Id, (usize, PathBuf)>,
) -> Result<Finished, BatchError> {
    match joined {
        Ok((id, finished)) => {
            in_flight.remove(&id);
            Ok(finished)
        }
        Err(error) => match in_flight.remove(&error.id()) {
            Some((index, path)) => Ok(Finished {
                index,
                path,
                outcome: Err(FileError::Worker(error)),
            }),
            None => Err(BatchError::Worker(error)),
        },
    }
}

/// Run the batch described by `config`
///
/// # Errors
///
/// Returns an error if discovery fails, the output cannot be opened or
/// written, or the batch is aborted.
pub async fn run(config: &Config) -> Result<BatchSummary, BatchError> {
    let paths = discover_logs(&config.input, config.recursive)?;

    let writer: Box<dyn Write + Send> = match &config.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(OutputError::from)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    let mut sink = RecordSink::new(writer, config.format)?;

    let summary = analyze_batch(paths, &BatchOptions::from(config), &mut sink).await?;
    sink.finish()?;

    info!(
        analyzed = summary.analyzed,
        failed = summary.failed,
        with_warnings = summary.with_warnings,
        "Batch complete"
    );
    Ok(summary)
}
