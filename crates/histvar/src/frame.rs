//! Per-column historical VaR over tabular P&L data.
//!
//! Each numeric column of a DataFrame (one per strategy or book) is treated
//! as an independent sample. Missing values are dropped column by column, so
//! columns with different history lengths can share one table.

use crate::{Result, VarCalculator, VarError, VarEstimate};
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

/// VaR estimates for one column of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    /// Column name
    pub column: String,
    /// One estimate per requested confidence level, in request order
    pub estimates: Vec<VarEstimate>,
}

/// Read a CSV file with a header row into a DataFrame.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded P&L table"
    );
    Ok(df)
}

/// Names of the columns that can be read as P&L samples, in table order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .collect()
}

/// Extract one column as a sample, dropping nulls and NaN.
///
/// # Errors
///
/// - [`VarError::MissingColumn`] if the column does not exist
/// - [`VarError::NonNumericColumn`] if it is not a primitive integer or float column
/// - [`VarError::EmptySample`] if nothing remains after dropping missing values
pub fn column_sample(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| VarError::MissingColumn(name.to_string()))?;

    if !column.dtype().is_primitive_numeric() {
        return Err(VarError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let values = column.cast(&DataType::Float64)?;
    let sample: Vec<f64> = values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();

    let dropped = values.len() - sample.len();
    if dropped > 0 {
        tracing::debug!(column = name, dropped, "dropped missing observations");
    }
    if sample.is_empty() {
        return Err(VarError::EmptySample);
    }
    Ok(sample)
}

/// Compute VaR estimates for several columns of a table.
///
/// # Arguments
///
/// * `df` - Table of P&L or returns, one column per strategy
/// * `columns` - Columns to evaluate; every numeric column when `None`
/// * `levels` - Confidence levels, each strictly inside `(0, 1)`
/// * `with_expected_shortfall` - Also compute expected shortfall
pub fn frame_report(
    df: &DataFrame,
    columns: Option<&[String]>,
    levels: &[f64],
    with_expected_shortfall: bool,
) -> Result<Vec<ColumnReport>> {
    let columns = match columns {
        Some(columns) => columns.to_vec(),
        None => numeric_columns(df),
    };

    columns
        .into_iter()
        .map(|column| {
            let calc = VarCalculator::from_vec(column_sample(df, &column)?)?;
            let estimates = calc.report(levels, with_expected_shortfall)?;
            Ok(ColumnReport { column, estimates })
        })
        .collect()
}
