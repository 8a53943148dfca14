// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Record sinks
//!
//! A sink owns the output writer for a whole batch. CSV output starts with a
//! single header row in [`COLUMNS`] order; JSON output is one array with one
//! object per line.

use std::io::Write;

use buildlog_analyzer::{COLUMNS, OutputRecord};
use csv::WriterBuilder;
use thiserror::Error;

use crate::config::OutputFormat;

/// Output errors
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writer of output records in one format
#[derive(Debug)]
pub enum RecordSink<W: Write> {
    /// CSV with a header row
    Csv(csv::Writer<W>),
    /// JSON array
    Json {
        /// Underlying writer
        writer: W,
        /// Records written so far
        written: usize,
    },
}

impl<W: Write> RecordSink<W> {
    /// Create a sink, writing the CSV header or the opening bracket
    ///
    /// # Errors
    ///
    /// Returns an error if the preamble cannot be written.
    pub fn new(mut writer: W, format: OutputFormat) -> Result<Self, OutputError> {
        match format {
            OutputFormat::Csv => {
                let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
                csv.write_record(COLUMNS)?;
                Ok(Self::Csv(csv))
            }
            OutputFormat::Json => {
                writer.write_all(b"[")?;
                Ok(Self::Json { writer, written: 0 })
            }
        }
    }

    /// Write one record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn write(&mut self, record: &OutputRecord) -> Result<(), OutputError> {
        match self {
            Self::Csv(csv) => csv.serialize(record)?,
            Self::Json { writer, written } => {
                writer.write_all(if *written == 0 { b"\n" } else { b",\n" })?;
                serde_json::to_writer(&mut *writer, record)?;
                *written += 1;
            }
        }
        Ok(())
    }

    /// Close the output and return the writer
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written or flushing fails.
    pub fn finish(self) -> Result<W, OutputError> {
        match self {
            Self::Csv(csv) => csv.into_inner().map_err(|e| OutputError::Io(e.into_error())),
            Self::Json { mut writer, written } => {
                writer.write_all(if written == 0 { b"]\n" } else { b"\n]\n" })?;
                writer.flush()?;
                Ok(writer)
            }
        }
    }
}
