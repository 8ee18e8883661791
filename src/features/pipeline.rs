//! Stage trait and the fixed feature pipeline.

use super::{
    drop_columns, encode_categoricals, engineer_features, ensure_float_table, scale_continuous,
};
use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use polars::prelude::*;

/// One step of feature table construction.
///
/// A stage must be deterministic and must not change the number of rows.
pub trait FeatureStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Stage-specific; see the function each stage wraps.
    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame>;
}

pub struct PruneStage;
pub struct EngineerStage;
pub struct EncodeStage;
pub struct ScaleStage;
pub struct FinalizeStage;

impl FeatureStage for PruneStage {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        drop_columns(df, &cfg.drop_cols)
    }
}

impl FeatureStage for EngineerStage {
    fn name(&self) -> &'static str {
        "engineer"
    }

    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        engineer_features(df, cfg)
    }
}

impl FeatureStage for EncodeStage {
    fn name(&self) -> &'static str {
        "encode"
    }

    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        encode_categoricals(df, cfg)
    }
}

impl FeatureStage for ScaleStage {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        scale_continuous(df, cfg)
    }
}

impl FeatureStage for FinalizeStage {
    fn name(&self) -> &'static str {
        "finalize"
    }

    fn apply(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        ensure_float_table(df, &cfg.target)
    }
}

/// Stages applied in sequence.
pub struct FeaturePipeline {
    stages: Vec<Box<dyn FeatureStage>>,
}

impl FeaturePipeline {
    /// prune -> engineer -> encode -> scale -> finalize
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Box::new(PruneStage),
                Box::new(EngineerStage),
                Box::new(EncodeStage),
                Box::new(ScaleStage),
                Box::new(FinalizeStage),
            ],
        }
    }

    pub fn add(&mut self, stage: Box<dyn FeatureStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage, checking that each one preserves the row count.
    ///
    /// # Errors
    ///
    /// Propagates the first stage error unchanged, or
    /// [`FeatureError::RowCountChanged`] if a stage altered the height.
    pub fn run(&self, df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
        let rows = df.height();
        let mut current = df;

        for stage in &self.stages {
            current = stage.apply(current, cfg)?;
            if current.height() != rows {
                return Err(FeatureError::RowCountChanged {
                    stage: stage.name(),
                    before: rows,
                    after: current.height(),
                });
            }
            tracing::debug!(
                "Stage '{}' done: {} rows x {} columns",
                stage.name(),
                current.height(),
                current.width()
            );
        }

        Ok(current)
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Full feature pipeline, no I/O: drop -> engineer -> encode -> scale -> float table.
///
/// `df` is expected to carry canonical column names already (see
/// [`standardize_column_names`](super::standardize_column_names)).
///
/// # Errors
///
/// Returns [`FeatureError::Config`] for an unsupported configuration, otherwise
/// whatever a stage reports.
pub fn prepare_feature_table(df: DataFrame, cfg: &FeatureConfig) -> Result<DataFrame> {
    cfg.validate()?;
    tracing::info!(
        "Preparing feature table from {} rows x {} columns",
        df.height(),
        df.width()
    );
    let out = FeaturePipeline::standard().run(df, cfg)?;
    tracing::info!(
        "Feature table ready: {} rows x {} columns",
        out.height(),
        out.width()
    );
    Ok(out)
}

/// Splits a feature table into the feature matrix and the target column.
///
/// # Errors
///
/// Returns [`FeatureError::MissingColumn`] if `target` is not in `df`.
pub fn split_features_target(df: &DataFrame, target: &str) -> Result<(DataFrame, DataFrame)> {
    if df.get_column_index(target).is_none() {
        return Err(FeatureError::MissingColumn(target.to_owned()));
    }
    let y = df.select([target])?;
    let x = df.drop(target)?;
    Ok((x, y))
}
