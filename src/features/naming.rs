//! Canonical `snake_case` column labels.
//!
//! Survey exports mix `CamelCase`, spaced headers and embedded acronyms
//! (`LungFunctionFEV1`, `Lung Function FEV1`, `BMI`). A label is rewritten by
//! an ordered list of independent passes, then a table of acronym repairs
//! glues back tokens the boundary passes split too eagerly.

use crate::error::{FeatureError, Result};
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("separator pattern is valid"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("case pattern is valid"));
static DIGIT_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])([0-9])").expect("digit pattern is valid"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("underscore pattern is valid"));

/// Spaces (and any other non-alphanumeric character) become underscores.
pub fn replace_separators(name: &str) -> String {
    SEPARATORS.replace_all(name, "_").into_owned()
}

/// `lungFunction` -> `lung_Function`. Uppercase runs such as `FEV` stay whole.
pub fn split_case_boundaries(name: &str) -> String {
    CASE_BOUNDARY.replace_all(name, "${1}_${2}").into_owned()
}

/// `FEV1` -> `FEV_1`.
pub fn split_digit_boundaries(name: &str) -> String {
    DIGIT_BOUNDARY.replace_all(name, "${1}_${2}").into_owned()
}

/// `LUNG_Function` -> `lung_function`.
pub fn lowercase(name: &str) -> String {
    name.to_lowercase()
}

/// Collapses underscore runs and trims underscores at both ends.
pub fn collapse_underscores(name: &str) -> String {
    UNDERSCORE_RUNS
        .replace_all(name, "_")
        .trim_matches('_')
        .to_owned()
}

/// The rewrite passes, in the order they are applied.
pub const REWRITE_PASSES: [fn(&str) -> String; 5] = [
    replace_separators,
    split_case_boundaries,
    split_digit_boundaries,
    lowercase,
    collapse_underscores,
];

/// Replaces the underscore-delimited token sequence `from` with `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymRepair {
    pub from: String,
    pub to: String,
}

impl AcronymRepair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Matching is whole-token: `b_m_i` repairs `b_m_i_index` but not `ab_m_i`.
    pub fn apply(&self, name: &str) -> String {
        if self.from.is_empty() {
            return name.to_owned();
        }
        let pattern: Vec<&str> = self.from.split('_').collect();
        let tokens: Vec<&str> = name.split('_').collect();

        let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while let Some(rest) = tokens.get(i..) {
            if rest.is_empty() {
                break;
            }
            if rest.starts_with(&pattern) {
                out.push(self.to.as_str());
                i += pattern.len();
            } else {
                out.extend(rest.first());
                i += 1;
            }
        }
        out.join("_")
    }
}

/// Column label normalizer with an explicit acronym repair table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameNormalizer {
    pub repairs: Vec<AcronymRepair>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self {
            repairs: vec![
                AcronymRepair::new("b_m_i", "bmi"),
                AcronymRepair::new("f_e_v_1", "fev1"),
                AcronymRepair::new("fev_1", "fev1"),
            ],
        }
    }
}

impl NameNormalizer {
    /// Appends a repair, applied after the existing ones.
    pub fn with_repair(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.repairs.push(AcronymRepair::new(from, to));
        self
    }

    /// Raw label -> canonical label.
    ///
    /// ```
    /// use asthma_features::features::naming::NameNormalizer;
    ///
    /// let normalizer = NameNormalizer::default();
    /// assert_eq!(normalizer.normalize("LungFunctionFEV1"), "lung_function_fev1");
    /// assert_eq!(normalizer.normalize("Lung Function FEV1"), "lung_function_fev1");
    /// ```
    pub fn normalize(&self, raw: &str) -> String {
        let rewritten = REWRITE_PASSES
            .iter()
            .fold(raw.to_owned(), |name, pass| pass(&name));
        self.repairs
            .iter()
            .fold(rewritten, |name, repair| repair.apply(&name))
    }
}

/// Normalizes a label with the default repair table.
pub fn normalize_column_name(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

/// Renames every column of `df` to its canonical label, keeping column order.
///
/// # Errors
///
/// Returns [`FeatureError::DuplicateColumn`] when two raw labels normalize to
/// the same canonical label; nothing is renamed in that case.
pub fn standardize_column_names(df: DataFrame, normalizer: &NameNormalizer) -> Result<DataFrame> {
    let mut df = df;
    let raw: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let canonical: Vec<String> = raw.iter().map(|name| normalizer.normalize(name)).collect();

    let mut sources: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (raw_name, clean) in raw.iter().zip(&canonical) {
        sources.entry(clean.as_str()).or_default().push(raw_name.clone());
    }
    if let Some((name, labels)) = sources.into_iter().find(|(_, labels)| labels.len() > 1) {
        return Err(FeatureError::DuplicateColumn {
            name: name.to_owned(),
            sources: labels,
        });
    }

    tracing::debug!("Standardized {} column names", canonical.len());
    df.set_column_names(canonical.iter().map(String::as_str))?;
    Ok(df)
}
