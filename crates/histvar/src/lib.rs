#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/histvar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calculator;
pub mod confidence;
pub mod config;
pub mod error;
pub mod frame;
pub mod quantile;

// Re-export core types
pub use calculator::{VarCalculator, VarEstimate};
pub use confidence::ConfidenceLevel;
pub use config::RiskConfig;
pub use error::{Result, VarError};
pub use frame::{ColumnReport, column_sample, frame_report, numeric_columns, read_csv};
pub use quantile::{QuantileEstimator, quantile, quantile_sorted};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
