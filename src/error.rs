//! Error types for the demand_forecast crate

use chrono::NaiveDate;
use thiserror::Error;

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Requested store id is not present in the dataset
    #[error("unknown store: {0}")]
    UnknownStore(String),

    /// Forecast start date precedes the store's earliest recorded date
    #[error("start date {start} precedes earliest record {earliest} for store {store}")]
    InvalidDate {
        store: String,
        start: NaiveDate,
        earliest: NaiveDate,
    },

    /// Too few records on or before the requested start date
    #[error("insufficient history for store {store}: need at least {needed} records on or before {cutoff}, got {got}")]
    InsufficientHistory {
        store: String,
        needed: usize,
        got: usize,
        cutoff: NaiveDate,
    },

    /// A step of the recursive forecast loop failed
    #[error("forecast step failed: {0}")]
    ForecastFailure(String),

    /// Error related to dataset validation or processing
    #[error("data error: {0}")]
    DataError(String),

    /// Error loading or validating a model/schema artifact
    #[error("artifact error: {0}")]
    ArtifactError(String),

    /// Error from invalid parameters
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("polars error: {0}")]
    PolarsError(String),

    /// Error from JSON serialization or deserialization
    #[error("serialization error: {0}")]
    SerdeError(String),
}

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerdeError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::DataError(err.to_string())
    }
}
