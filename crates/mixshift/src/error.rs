//! Error types for the mixshift library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mixshift operations.
#[derive(Debug, Error)]
pub enum MixshiftError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset or the requested grouping cannot be decomposed.
    #[error("Invalid input shape: {0}")]
    InputShape(String),

    /// A column referenced by name does not exist in the dataset.
    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    /// A value mapping rule could not be parsed.
    #[error("Mapping rule on line {line}: {message}")]
    MappingRule { line: usize, message: String },
}

/// Result type alias for mixshift operations.
pub type Result<T> = std::result::Result<T, MixshiftError>;
