//! Error types for the descriptor pipeline.
//!
//! Every variant here is fatal for the run. Row-level structure parse
//! failures are not errors at this level; they are recorded in the
//! [`ChunkResult`](super::ChunkResult) and the affected row keeps empty
//! descriptor cells.

use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// No column name matches the requested pattern.
    #[error("no column matches '{pattern}' (available: {})", available.join(", "))]
    ColumnNotFound {
        /// The pattern that was searched for.
        pattern: String,
        /// Column names present in the input.
        available: Vec<String>,
    },

    /// The partition parameters yield no usable chunk count.
    ///
    /// Happens when `ceil(rows / chunk_size)` exceeds `max_workers` and
    /// `max_workers - 1` is zero.
    #[error(
        "cannot partition {rows} rows with chunk size {chunk_size} and at most {max_workers} workers"
    )]
    InvalidPartition {
        rows: usize,
        chunk_size: usize,
        max_workers: usize,
    },

    /// A worker crashed, faulted, or returned a malformed result.
    #[error("worker for chunk {chunk} failed: {detail}")]
    WorkerFailure {
        /// Partition index of the failed chunk.
        chunk: usize,
        /// Description of the failure.
        detail: String,
    },

    /// A configuration value is out of range.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a TOML configuration file.
    #[error("failed to parse pipeline configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a [`ColumnNotFound`](Error::ColumnNotFound) error.
    pub fn column_not_found(pattern: &str, available: &[String]) -> Self {
        Self::ColumnNotFound {
            pattern: pattern.to_string(),
            available: available.to_vec(),
        }
    }

    /// Creates a [`WorkerFailure`](Error::WorkerFailure) error.
    pub fn worker_failure(chunk: usize, details: impl Into<String>) -> Self {
        Self::WorkerFailure {
            chunk,
            detail: details.into(),
        }
    }
}
