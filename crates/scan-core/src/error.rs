//! Error types for the scan-reduce numeric layer
//!
//! Provides a unified error type for all scan-reduce crates.

use thiserror::Error;

/// Core error type for reduction operations
#[derive(Error, Debug)]
pub enum Error {
    /// Histogram bin size was zero, negative or not finite
    #[error("Invalid bin size: {0} (must be finite and > 0)")]
    InvalidBinSize(f64),

    /// A range endpoint was NaN or infinite
    #[error("Non-finite bound: {name} = {value}")]
    NonFiniteBound { name: &'static str, value: f64 },

    /// The range does not satisfy `max > min`
    #[error("Empty range: max ({max}) must be greater than min ({min})")]
    EmptyRange { min: f64, max: f64 },

    /// Bin layout would exceed the allocation safety ceiling
    #[error("Too many bins: {requested} requested, limit is {limit}")]
    TooManyBins { requested: f64, limit: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a NaN/Inf range endpoint
    pub fn non_finite(name: &'static str, value: f64) -> Self {
        Self::NonFiniteBound { name, value }
    }

    /// Create an error for an out-of-range tunable
    pub fn out_of_range(name: &str, value: f64, expected: &str) -> Self {
        Self::InvalidParameter(format!("{name} = {value} must be {expected}"))
    }
}
