//! CSV loading and saving for the CLI. The feature pipeline itself never
//! touches the filesystem.

use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Reads a delimited survey export with a header row of raw column labels.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_has_header(true)
        .finish()
        .with_context(|| format!("Failed to scan CSV {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to read CSV {}", path.display()))
}

/// Writes `df` as CSV with a header, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .context("Failed to write CSV file")?;
    Ok(())
}
