use super::present_columns;
use crate::error::Result;
use polars::prelude::*;

/// Drops the listed columns that exist. Names that are not present are ignored.
///
/// # Errors
///
/// Only fails if polars rejects dropping a column it just reported as present.
pub fn drop_columns<S: AsRef<str>>(df: DataFrame, cols: &[S]) -> Result<DataFrame> {
    let present = present_columns(&df, cols);
    if present.is_empty() {
        return Ok(df);
    }

    let mut out = df;
    for name in &present {
        out = out.drop(name)?;
    }
    tracing::info!("Dropped columns: {}", present.join(", "));
    Ok(out)
}
