//! Error types for quantile and VaR computations.

use thiserror::Error;

/// Result type for VaR operations.
pub type Result<T> = std::result::Result<T, VarError>;

/// Errors that can occur while estimating quantiles or Value-at-Risk.
#[derive(Debug, Error)]
pub enum VarError {
    /// Quantile or VaR requested against a sample with no observations
    #[error("Empty sample: at least one observation is required")]
    EmptySample,

    /// Confidence level outside the open interval (0, 1)
    #[error("Invalid confidence level {0}: must lie strictly between 0 and 1")]
    InvalidConfidenceLevel(f64),

    /// NaN or infinite observation supplied as part of a sample
    #[error("Non-finite observation at index {index}: {value}")]
    NonFiniteObservation {
        /// Position of the offending observation in the supplied sample
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Column exists but does not hold numeric observations
    #[error("Column '{column}' is not numeric (dtype {dtype})")]
    NonNumericColumn {
        /// Column name
        column: String,
        /// Polars dtype of the column, rendered for display
        dtype: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error while reading inputs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
