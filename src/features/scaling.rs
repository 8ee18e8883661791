use super::{as_float64, present_columns};
use crate::config::{DERIVED_FEATURES, FeatureConfig};
use crate::error::Result;
use polars::prelude::*;

/// Columns the scaler touches: configured continuous columns, then derived
/// features, restricted to what is present and never including the target.
pub fn columns_to_scale(df: &DataFrame, cfg: &FeatureConfig) -> Vec<String> {
    let candidates: Vec<&str> = cfg
        .continuous
        .iter()
        .map(String::as_str)
        .chain(DERIVED_FEATURES)
        .filter(|name| *name != cfg.target)
        .collect();
    present_columns(df, &candidates)
}

/// `(x - mean) / std`, fit on the column itself.
///
/// A standard deviation that is zero or undefined (too few observations for
/// `ddof`) leaves the column centered but undivided. Nulls stay null.
pub fn standardize_expr(name: &str, ddof: u8) -> Expr {
    let values = col(name).cast(DataType::Float64);
    let mean = values.clone().mean();
    let std = values.clone().std(ddof);
    let divisor = when(std.clone().gt(lit(0.0)))
        .then(std)
        .otherwise(lit(1.0));
    ((values - mean) / divisor).alias(name)
}

/// Standardizes every column from [`columns_to_scale`]. A no-op when scaling
/// is off or nothing qualifies.
///
/// Columns are coerced with [`as_float64`] first, so NaN is treated as missing.
///
/// # Errors
///
/// Returns an error if a column cannot be cast to `Float64`.
pub fn scale_continuous(df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
    if !cfg.scale_continuous {
        return Ok(df);
    }
    let to_scale = columns_to_scale(&df, cfg);
    if to_scale.is_empty() {
        return Ok(df);
    }

    let mut df = df;
    for name in &to_scale {
        let values = as_float64(df.column(name)?.as_materialized_series())?;
        df.with_column(values)?;
    }

    let exprs: Vec<Expr> = to_scale
        .iter()
        .map(|name| standardize_expr(name, cfg.scale_ddof))
        .collect();
    let out = df.lazy().with_columns(exprs).collect()?;
    tracing::info!("Scaled columns: {}", to_scale.join(", "));
    Ok(out)
}
