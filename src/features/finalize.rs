use super::as_float64;
use crate::error::Result;
use polars::prelude::*;

/// Casts every column except `target` to `Float64`; unparseable values become null.
///
/// The target column is passed through exactly as provided.
///
/// # Errors
///
/// Returns an error if a column has a dtype polars cannot cast to a float.
pub fn ensure_float_table(df: DataFrame, target: &str) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            if column.name().as_str() == target {
                Ok(column.clone())
            } else {
                Ok(Column::from(as_float64(column.as_materialized_series())?))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}
