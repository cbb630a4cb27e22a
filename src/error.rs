//! Error types for instapaper-stats.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the snapshot pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record in {}:{line}: expected 4 fields, found {fields}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        fields: usize,
    },

    #[error("No YYYY-MM-DD date in file name: {}", .0.display())]
    UnrecognizedFilename(PathBuf),

    #[error("No snapshot files found in {}", .0.display())]
    EmptyArchive(PathBuf),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Malformed report row {line}: {reason}")]
    MalformedReport { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template error: {0}")]
    Template(#[from] mustache::Error),
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
