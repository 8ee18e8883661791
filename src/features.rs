//! Feature table construction.
//!
//! Each stage takes a [`DataFrame`] by value and hands back a new one. Column
//! lists from [`FeatureConfig`](crate::config::FeatureConfig) are always
//! intersected with the frame's columns first, so a configured column that is
//! absent is skipped rather than reported.

pub mod encoding;
pub mod engineering;
pub mod finalize;
pub mod naming;
pub mod pipeline;
pub mod pruning;
pub mod scaling;


pub use encoding::{encode_categoricals, observed_categories};
pub use engineering::engineer_features;
pub use finalize::ensure_float_table;
pub use naming::{NameNormalizer, normalize_column_name, standardize_column_names};
pub use pipeline::{FeaturePipeline, FeatureStage, prepare_feature_table, split_features_target};
pub use pruning::drop_columns;
pub use scaling::scale_continuous;

use crate::error::Result;
use polars::prelude::*;

/// The subset of `wanted` present in `df`, deduplicated, in `wanted` order.
pub fn present_columns<S: AsRef<str>>(df: &DataFrame, wanted: &[S]) -> Vec<String> {
    let mut present: Vec<String> = Vec::new();
    for name in wanted {
        let name = name.as_ref();
        if df.get_column_index(name).is_some() && !present.iter().any(|p| p == name) {
            present.push(name.to_owned());
        }
    }
    present
}

/// Casts a series to `Float64`. Values that do not parse become null, and so does NaN.
///
/// # Errors
///
/// Returns an error if polars cannot cast the dtype at all (e.g. nested lists).
pub fn as_float64(series: &Series) -> Result<Series> {
    let casted = match series.dtype() {
        DataType::Categorical(..) | DataType::Enum(..) => series
            .cast(&DataType::String)?
            .cast(&DataType::Float64)?,
        _ => series.cast(&DataType::Float64)?,
    };
    let values: Vec<Option<f64>> = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Reads a column as optional floats. See [`as_float64`] for the coercion rules.
///
/// # Errors
///
/// Returns an error if the column does not exist or cannot be cast.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = as_float64(df.column(name)?.as_materialized_series())?;
    Ok(series.f64()?.into_iter().collect())
}
