//! Integration tests for the full preparation workflow
//!
//! These run the pipeline (and the binary) on the survey fixture in
//! `testdata/` and verify the written tables.

use asthma_features::config::FeatureConfig;
use asthma_features::features::{
    NameNormalizer, prepare_feature_table, split_features_target, standardize_column_names,
};
use asthma_features::io::{load_csv, save_csv};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/asthma_sample.csv")
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_fixture_headers_normalize() -> anyhow::Result<()> {
    let raw = load_csv(&fixture())?;
    let df = standardize_column_names(raw, &NameNormalizer::default())?;
    let names = column_names(&df);

    for expected in [
        "patient_id",
        "education_level",
        "bmi",
        "diet_quality",
        "family_history_asthma",
        "gastroesophageal_reflux",
        "lung_function_fev1",
        "lung_function_fvc",
        "shortness_of_breath",
        "nighttime_symptoms",
        "doctor_in_charge",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
    Ok(())
}

#[test]
fn test_fixture_feature_table() -> anyhow::Result<()> {
    let raw = load_csv(&fixture())?;
    let rows = raw.height();
    let target_before = raw.column("Diagnosis")?.as_materialized_series().clone();

    let df = standardize_column_names(raw, &NameNormalizer::default())?;
    let feats = prepare_feature_table(df, &FeatureConfig::default())?;

    assert_eq!(feats.height(), rows);
    let names = column_names(&feats);
    assert!(!names.iter().any(|n| n == "patient_id" || n == "doctor_in_charge"));
    assert!(!names.iter().any(|n| n == "gender" || n == "ethnicity"));
    assert!(names.iter().any(|n| n == "gender_1"));
    assert!(names.iter().any(|n| n == "fev1_fvc_ratio"));
    assert!(names.iter().any(|n| n == "symptom_score"));
    assert!(names.iter().any(|n| n == "exposure_index"));

    for column in feats.get_columns() {
        if column.name().as_str() != "diagnosis" {
            assert_eq!(column.dtype(), &DataType::Float64, "{}", column.name());
        }
    }

    // "n/a" in BMI is coerced to a missing value, not an error.
    assert_eq!(feats.column("bmi")?.null_count(), 1);
    // The zero FVC row has no ratio.
    assert_eq!(feats.column("fev1_fvc_ratio")?.null_count(), 1);

    let target_after = feats.column("diagnosis")?.as_materialized_series();
    assert_eq!(target_after.dtype(), target_before.dtype());
    let before: Vec<Option<i64>> = target_before.i64()?.into_iter().collect();
    let after: Vec<Option<i64>> = target_after.i64()?.into_iter().collect();
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn test_written_tables_reload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = load_csv(&fixture())?;
    let df = standardize_column_names(raw, &NameNormalizer::default())?;
    let mut feats = prepare_feature_table(df, &FeatureConfig::default())?;
    let (mut x, mut y) = split_features_target(&feats, "diagnosis")?;

    let all_path = dir.path().join("all.csv");
    let x_path = dir.path().join("x").join("X.csv");
    let y_path = dir.path().join("y").join("y.csv");
    save_csv(&mut feats, &all_path)?;
    save_csv(&mut x, &x_path)?;
    save_csv(&mut y, &y_path)?;

    assert_eq!(load_csv(&all_path)?.shape(), feats.shape());
    assert_eq!(load_csv(&x_path)?.width(), feats.width() - 1);
    assert_eq!(column_names(&load_csv(&y_path)?), ["diagnosis"]);
    Ok(())
}

#[test]
fn test_cli_prepare_writes_outputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let all = dir.path().join("out").join("all.csv");
    let x = dir.path().join("out").join("X.csv");
    let y = dir.path().join("out").join("y.csv");

    let output = Command::new(env!("CARGO_BIN_EXE_asthma-features"))
        .arg("prepare")
        .arg("--input")
        .arg(fixture())
        .arg("--output-all")
        .arg(&all)
        .arg("--output-x")
        .arg(&x)
        .arg("--output-y")
        .arg(&y)
        .arg("--no-scale")
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Saved: ").count(), 3, "{stdout}");

    // Unscaled: the first patient's BMI survives verbatim.
    let feats = load_csv(&all)?;
    let bmi = feats.column("bmi")?.as_materialized_series().f64()?.get(0);
    assert!(matches!(bmi, Some(v) if (v - 15.848744).abs() < 1e-9));
    assert!(x.exists() && y.exists());
    Ok(())
}

#[test]
fn test_cli_names_lists_mapping() -> anyhow::Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_asthma-features"))
        .arg("names")
        .arg("--input")
        .arg(fixture())
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LungFunctionFEV1 -> lung_function_fev1"), "{stdout}");
    assert!(stdout.contains("PatientID -> patient_id"), "{stdout}");
    Ok(())
}
