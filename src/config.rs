use crate::error::{FeatureError, Result};
use crate::features::naming::NameNormalizer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output name of the FEV1/FVC quotient.
pub const RATIO_FEATURE: &str = "fev1_fvc_ratio";
/// Output name of the row-wise symptom sum.
pub const SCORE_FEATURE: &str = "symptom_score";
/// Output name of the row-wise exposure mean.
pub const INDEX_FEATURE: &str = "exposure_index";

/// Names of every column the feature engineering stage can create.
pub const DERIVED_FEATURES: [&str; 3] = [RATIO_FEATURE, SCORE_FEATURE, INDEX_FEATURE];

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}

/// Declarative description of how a survey table becomes a feature table.
///
/// Column lists are treated as sets: every stage intersects them with the
/// columns actually present before acting. List order only decides the
/// order in which present columns are visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub target: String,
    pub categorical: Vec<String>,
    pub continuous: Vec<String>,
    pub symptom_cols: Vec<String>,
    pub exposure_cols: Vec<String>,

    /// Dividend of the ratio feature
    pub ratio_numerator: String,
    /// Divisor of the ratio feature
    pub ratio_denominator: String,

    pub add_fev1_fvc_ratio: bool,
    pub add_symptom_score: bool,
    pub add_exposure_index: bool,

    pub one_hot_encode: bool,
    pub drop_first: bool,
    pub scale_continuous: bool,
    /// Delta degrees of freedom for the scaler's standard deviation (1 = sample).
    pub scale_ddof: u8,

    /// Identifier/administrative columns removed before any derivation
    pub drop_cols: Vec<String>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target: "diagnosis".to_owned(),
            categorical: names(&["gender", "ethnicity", "education_level"]),
            continuous: names(&[
                "age",
                "bmi",
                "physical_activity",
                "diet_quality",
                "sleep_quality",
                "pollution_exposure",
                "pollen_exposure",
                "dust_exposure",
                "lung_function_fev1",
                "lung_function_fvc",
            ]),
            symptom_cols: names(&[
                "wheezing",
                "shortness_of_breath",
                "chest_tightness",
                "coughing",
                "nighttime_symptoms",
                "exercise_induced",
            ]),
            exposure_cols: names(&["pollution_exposure", "pollen_exposure", "dust_exposure"]),
            ratio_numerator: "lung_function_fev1".to_owned(),
            ratio_denominator: "lung_function_fvc".to_owned(),
            add_fev1_fvc_ratio: true,
            add_symptom_score: true,
            add_exposure_index: true,
            one_hot_encode: true,
            drop_first: true,
            scale_continuous: true,
            scale_ddof: 1,
            drop_cols: names(&["patientid", "patient_id", "doctor_in_charge"]),
        }
    }
}

impl FeatureConfig {
    /// Rejects configurations the pipeline cannot honour.
    ///
    /// The target must survive untouched, so it may not be dropped, encoded,
    /// scaled, or shadowed by a derived feature.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Config`] describing the first conflict found.
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(FeatureError::Config("target column name is empty".to_owned()));
        }

        let conflicts = [
            ("drop_cols", &self.drop_cols),
            ("categorical", &self.categorical),
            ("continuous", &self.continuous),
        ];
        for (field, cols) in conflicts {
            if cols.contains(&self.target) {
                return Err(FeatureError::Config(format!(
                    "target '{}' must not be listed in {field}",
                    self.target
                )));
            }
        }

        if DERIVED_FEATURES.contains(&self.target.as_str()) {
            return Err(FeatureError::Config(format!(
                "target '{}' collides with a derived feature name",
                self.target
            )));
        }

        if self.add_fev1_fvc_ratio
            && (self.ratio_numerator.is_empty() || self.ratio_denominator.is_empty())
        {
            return Err(FeatureError::Config(
                "ratio feature enabled without numerator/denominator columns".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Settings document accepted by `prepare --config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareSettings {
    pub features: FeatureConfig,
    pub naming: NameNormalizer,
}

impl PrepareSettings {
    /// Load settings from a JSON file. Missing sections and fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns [`FeatureError::Config`] when the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
