//! # asthma-features
//!
//! Turns a raw asthma risk-factor survey export into a float-only feature
//! table with the diagnosis target preserved, ready for statistical modelling.
//!
//! ## Quick Start
//!
//! ```no_run
//! use asthma_features::config::FeatureConfig;
//! use asthma_features::features::{NameNormalizer, prepare_feature_table, standardize_column_names};
//! use asthma_features::io::load_csv;
//!
//! # fn example() -> asthma_features::error::Result<()> {
//! let raw = load_csv("clean_asthma_disease_data.csv".as_ref())?;
//! let df = standardize_column_names(raw, &NameNormalizer::default())?;
//! let feats = prepare_feature_table(df, &FeatureConfig::default())?;
//! println!("{} rows x {} columns", feats.height(), feats.width());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`features`]: name normalization and the feature pipeline
//!   (prune -> engineer -> encode -> scale -> finalize)
//! - [`config`]: declarative pipeline configuration
//! - [`error`]: error types and handling utilities
//! - [`io`]: CSV loading and saving for the command-line tool
//! - [`logging`]: tracing subscriber setup
//!
//! The pipeline performs no I/O. Every stage takes a `DataFrame` by value and
//! returns a new one with the same number of rows.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod logging;
