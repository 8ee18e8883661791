use super::{float_values, present_columns};
use crate::config::{FeatureConfig, INDEX_FEATURE, RATIO_FEATURE, SCORE_FEATURE};
use crate::error::Result;
use polars::prelude::*;

/// Appends the derived columns whose toggle is on and whose sources exist.
///
/// Source columns are kept. A derived column replaces an existing column of
/// the same name.
///
/// # Errors
///
/// Returns an error if a source column cannot be cast to `Float64`.
pub fn engineer_features(df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
    let mut out = df;

    if cfg.add_fev1_fvc_ratio {
        let sources = [cfg.ratio_numerator.as_str(), cfg.ratio_denominator.as_str()];
        if present_columns(&out, &sources).len() == sources.len() {
            let values = ratio(
                &float_values(&out, &cfg.ratio_numerator)?,
                &float_values(&out, &cfg.ratio_denominator)?,
            );
            add_derived(&mut out, RATIO_FEATURE, values)?;
        } else {
            tracing::debug!("Skipping {RATIO_FEATURE}: source columns missing");
        }
    }

    let symptoms = present_columns(&out, &cfg.symptom_cols);
    if cfg.add_symptom_score && !symptoms.is_empty() {
        let values = row_sum(&columns_as_floats(&out, &symptoms)?, out.height());
        add_derived(&mut out, SCORE_FEATURE, values)?;
    }

    let exposures = present_columns(&out, &cfg.exposure_cols);
    if cfg.add_exposure_index && !exposures.is_empty() {
        let values = row_mean(&columns_as_floats(&out, &exposures)?, out.height());
        add_derived(&mut out, INDEX_FEATURE, values)?;
    }

    Ok(out)
}

fn add_derived(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    if df.get_column_index(name).is_some() {
        tracing::warn!("Derived feature '{name}' replaces an existing column");
    }
    df.with_column(Series::new(name.into(), values))?;
    tracing::info!("Derived feature '{name}'");
    Ok(())
}

fn columns_as_floats(df: &DataFrame, names: &[String]) -> Result<Vec<Vec<Option<f64>>>> {
    names.iter().map(|name| float_values(df, name)).collect()
}

/// Elementwise quotient. Non-finite results (division by zero, 0/0) are null.
pub fn ratio(numerator: &[Option<f64>], denominator: &[Option<f64>]) -> Vec<Option<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) => Some(n / d).filter(|q| q.is_finite()),
            _ => None,
        })
        .collect()
}

/// Row-wise sum skipping nulls; a row with no values sums to zero.
pub fn row_sum(columns: &[Vec<Option<f64>>], height: usize) -> Vec<Option<f64>> {
    let mut sums = vec![0.0; height];
    for column in columns {
        for (sum, value) in sums.iter_mut().zip(column) {
            *sum += value.unwrap_or(0.0);
        }
    }
    sums.into_iter().map(Some).collect()
}

/// Row-wise mean over the non-null values; a row with no values is null.
pub fn row_mean(columns: &[Vec<Option<f64>>], height: usize) -> Vec<Option<f64>> {
    let mut sums = vec![0.0; height];
    let mut counts = vec![0_u32; height];
    for column in columns {
        for ((sum, count), value) in sums.iter_mut().zip(counts.iter_mut()).zip(column) {
            if let Some(v) = value {
                *sum += v;
                *count += 1;
            }
        }
    }
    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > 0).then(|| sum / f64::from(count)))
        .collect()
}
