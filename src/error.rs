//! Error types for the surrogate pipeline
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Surrogate pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed campaign spec, training input, or a case missing a required field
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// Not enough usable samples to train
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Training backend requested that this build does not implement
    #[error("Unsupported training backend: {0}")]
    UnsupportedBackend(String),

    /// Required environment or credential value absent
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Dataset document has an unusable shape
    #[error("Dataset format error: {0}")]
    DatasetFormat(String),

    /// Job service transport or protocol failure
    #[error("Registry error: {0}")]
    Registry(String),

    /// Parquet/Arrow ingestion error
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<parquet::errors::ParquetError> for Error {
    fn from(err: parquet::errors::ParquetError) -> Self {
        Self::Parquet(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for Error {
    fn from(err: arrow::error::ArrowError) -> Self {
        Self::Parquet(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Registry(err.to_string())
    }
}
