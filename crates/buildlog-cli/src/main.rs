// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlog-analysis: Extract test statistics from CI build logs
//!
//! Analyzes one log or a directory of logs and writes one CSV or JSON record
//! per log. Diagnostics go to stderr.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildlog_cli::{Config, run};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_level().into()))
        .with_writer(std::io::stderr)
        .init();

    config.validate().context("Invalid configuration")?;

    let summary = run(&config).await.context("Batch analysis failed")?;
    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
