//! # Errors
//!
//! The filtering pipeline itself never raises for data-shape problems; it
//! under-matches rather than crashing, since it sits directly under an
//! interactive UI. The error type below covers the I/O-backed edges of the
//! crate: record sources, search history persistence, and boundary files.

use thiserror::Error;

/// Pipeline errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reading a record source, history, or boundary file.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited-file parsing failure.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// A source or boundary file had an unusable shape.
    #[error("unsupported format: {0}")]
    Format(String),
}
