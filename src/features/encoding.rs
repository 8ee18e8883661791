use super::naming::normalize_column_name;
use super::present_columns;
use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Expands each present categorical column into 0/1 indicator columns, in place.
///
/// Indicators are named `<column>_<category>` run through the name normalizer,
/// so `gender` / `Male` becomes `gender_male`. Categories whose labels
/// normalize alike (`Male` / `male`) still get one indicator each; later ones
/// take an ordinal suffix (`gender_male_2`). With `drop_first`, the first
/// category in [`observed_categories`] order is the reference and gets no
/// indicator. Rows where the source value is null are 0 in every indicator.
///
/// # Errors
///
/// Returns [`FeatureError::DuplicateColumn`] if an indicator name collides
/// with an existing column.
pub fn encode_categoricals(df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
    if !cfg.one_hot_encode {
        return Ok(df);
    }
    let to_encode = present_columns(&df, &cfg.categorical);
    if to_encode.is_empty() {
        return Ok(df);
    }

    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut origins: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for column in df.get_columns() {
        let name = column.name().as_str();
        if !to_encode.iter().any(|c| c == name) {
            origins
                .entry(name.to_owned())
                .or_default()
                .push(name.to_owned());
            columns.push(column.clone());
            continue;
        }

        let series = column.as_materialized_series();
        let mut categories = observed_categories(series)?;
        if cfg.drop_first && !categories.is_empty() {
            let reference = categories.remove(0);
            tracing::debug!("'{name}': reference category '{reference}'");
        }

        let labels = series.cast(&DataType::String)?;
        let labels = labels.str()?;
        let mut taken: BTreeSet<String> = BTreeSet::new();
        for category in &categories {
            let indicator = indicator_name(name, category, &taken);
            taken.insert(indicator.clone());
            let values: Vec<f64> = labels
                .into_iter()
                .map(|v| if v == Some(category.as_str()) { 1.0 } else { 0.0 })
                .collect();
            origins
                .entry(indicator.clone())
                .or_default()
                .push(format!("{name}={category}"));
            columns.push(Column::from(Series::new(indicator.into(), values)));
        }
        tracing::info!("Encoded '{name}' into {} indicator columns", categories.len());
    }

    if let Some((name, sources)) = origins.into_iter().find(|(_, s)| s.len() > 1) {
        return Err(FeatureError::DuplicateColumn { name, sources });
    }

    Ok(DataFrame::new(columns)?)
}

/// `<column>_<category>` normalized, suffixed `_2`, `_3`, ... until it is not
/// among the names `taken` by earlier categories of the same column.
fn indicator_name(column: &str, category: &str, taken: &BTreeSet<String>) -> String {
    let base = normalize_column_name(&format!("{column}_{category}"));
    let mut candidate = base.clone();
    let mut ordinal = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}_{ordinal}");
        ordinal += 1;
    }
    candidate
}

/// Distinct non-null values of a column, as labels, in reference order.
///
/// NaN in a float column counts as missing and is not a category. Numeric
/// columns are ordered by value, everything else lexicographically.
///
/// # Errors
///
/// Returns an error if the column cannot be rendered as strings.
pub fn observed_categories(series: &Series) -> Result<Vec<String>> {
    let is_float = series.dtype().is_float();
    let labels = series.cast(&DataType::String)?;
    let distinct: BTreeSet<String> = labels
        .str()?
        .into_iter()
        .flatten()
        .filter(|label| !(is_float && label.parse::<f64>().is_ok_and(f64::is_nan)))
        .map(str::to_owned)
        .collect();
    let mut categories: Vec<String> = distinct.into_iter().collect();

    if series.dtype().is_primitive_numeric() {
        categories.sort_by(|a, b| {
            let a = a.parse::<f64>().unwrap_or(f64::NAN);
            let b = b.parse::<f64>().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        });
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::from(Series::new("bmi".into(), &[25.0_f64, 30.0, 22.0, 27.5])),
            Column::from(Series::new(
                "gender".into(),
                &[Some("Male"), Some("Female"), None, Some("Male")],
            )),
            Column::from(Series::new("education_level".into(), &[2_i64, 10, 1, 2])),
            Column::from(Series::new("diagnosis".into(), &[1_i64, 0, 0, 1])),
        ])
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_drop_first_gives_k_minus_one() -> anyhow::Result<()> {
        let out = encode_categoricals(survey()?, &FeatureConfig::default())?;
        assert_eq!(
            names(&out),
            [
                "bmi",
                "gender_male",
                "education_level_2",
                "education_level_10",
                "diagnosis"
            ]
        );
        let male: Vec<Option<f64>> = out
            .column("gender_male")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        assert_eq!(male, vec![Some(1.0), Some(0.0), Some(0.0), Some(1.0)]);
        Ok(())
    }

    #[test]
    fn test_without_drop_first_gives_k() -> anyhow::Result<()> {
        let cfg = FeatureConfig {
            drop_first: false,
            ..Default::default()
        };
        let out = encode_categoricals(survey()?, &cfg)?;
        assert_eq!(
            names(&out),
            [
                "bmi",
                "gender_female",
                "gender_male",
                "education_level_1",
                "education_level_2",
                "education_level_10",
                "diagnosis"
            ]
        );
        // Null gender row is zero everywhere.
        let female = out.column("gender_female")?.as_materialized_series().f64()?.get(2);
        assert_eq!(female, Some(0.0));
        Ok(())
    }

    #[test]
    fn test_disabled_encoding_is_identity() -> anyhow::Result<()> {
        let cfg = FeatureConfig {
            one_hot_encode: false,
            ..Default::default()
        };
        let df = survey()?;
        let out = encode_categoricals(df.clone(), &cfg)?;
        assert!(out.equals_missing(&df));
        Ok(())
    }

    #[test]
    fn test_case_variants_each_get_an_indicator() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![Column::from(Series::new(
            "gender".into(),
            &["Male", "male", "Female"],
        ))])?;
        let cfg = FeatureConfig {
            drop_first: false,
            ..Default::default()
        };
        let out = encode_categoricals(df, &cfg)?;
        assert_eq!(
            names(&out),
            ["gender_female", "gender_male", "gender_male_2"]
        );
        let lower: Vec<Option<f64>> = out
            .column("gender_male_2")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        assert_eq!(lower, vec![Some(0.0), Some(1.0), Some(0.0)]);
        Ok(())
    }

    #[test]
    fn test_punctuation_variants_each_get_an_indicator() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![Column::from(Series::new(
            "education".into(),
            &["High School", "High-School", "College", "High School"],
        ))])?;
        let cfg = FeatureConfig {
            categorical: vec!["education".to_owned()],
            ..Default::default()
        };
        let out = encode_categoricals(df, &cfg)?;
        // "College" is the reference; the two high school spellings stay apart.
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 4);
        Ok(())
    }

    #[test]
    fn test_indicator_clashing_with_existing_column_is_rejected() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![
            Column::from(Series::new("smoking".into(), &["yes", "no"])),
            Column::from(Series::new("smoking_yes".into(), &[1.0_f64, 0.0])),
        ])?;
        let cfg = FeatureConfig {
            categorical: vec!["smoking".to_owned()],
            ..Default::default()
        };
        let result = encode_categoricals(df, &cfg);
        assert!(matches!(
            result,
            Err(FeatureError::DuplicateColumn { ref name, .. }) if name == "smoking_yes"
        ));
        Ok(())
    }

    #[test]
    fn test_nan_is_not_a_category() -> anyhow::Result<()> {
        let series = Series::new("pollution_exposure".into(), &[2.0_f64, f64::NAN, 1.0, 2.0]);
        assert_eq!(observed_categories(&series)?.len(), 2);

        let df = DataFrame::new(vec![Column::from(series)])?;
        let cfg = FeatureConfig {
            categorical: vec!["pollution_exposure".to_owned()],
            drop_first: false,
            ..Default::default()
        };
        let out = encode_categoricals(df, &cfg)?;
        let columns = names(&out);
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|c| !c.contains("nan")), "{columns:?}");
        // Lowest value first; the NaN row is 0 everywhere.
        let ones: Vec<Option<f64>> = out
            .column(&columns[0])?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        assert_eq!(ones, vec![Some(0.0), Some(0.0), Some(1.0), Some(0.0)]);
        Ok(())
    }
}
