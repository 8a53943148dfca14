// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlog-cli library
//!
//! This module exports the batch driver behind the `buildlog-analysis`
//! binary for use in integration tests and as a library.

pub mod batch;
pub mod config;
pub mod discover;
pub mod output;

pub use batch::{BatchError, BatchOptions, BatchSummary, analyze_batch, run};
pub use config::{Config, ConfigError, OutputFormat};
pub use output::RecordSink;
