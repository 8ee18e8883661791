//! Error handling for feature table preparation.
//!
//! Most irregularities in survey exports are not errors at all: configured
//! columns that are missing are skipped, unparseable numbers become nulls and
//! divisions by zero become nulls. What remains is collected here.
//!
//! ```
//! use asthma_features::error::FeatureError;
//!
//! fn describe(err: &FeatureError) -> String {
//!     match err {
//!         FeatureError::DuplicateColumn { name, .. } => format!("rename `{name}` upstream"),
//!         FeatureError::Config(msg) => format!("fix the configuration: {msg}"),
//!         other => other.to_string(),
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error converts
//! into [`FeatureError`]:
//!
//! ```no_run
//! use asthma_features::error::ResultExt as _;
//!
//! fn read_header(path: &str) -> asthma_features::error::Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read survey export")
//! }
//! ```

use std::fmt;

/// Main error type for feature preparation.
#[derive(Debug)]
pub enum FeatureError {
    /// I/O errors while reading or writing tables
    Io(std::io::Error),

    /// Polars failures (casting, frame construction, CSV parsing)
    DataProcessing(String),

    /// Invalid or unsupported configuration
    Config(String),

    /// Two labels resolved to the same canonical column name
    DuplicateColumn { name: String, sources: Vec<String> },

    /// A column required by the operation is absent
    MissingColumn(String),

    /// A stage returned a table with a different number of rows
    RowCountChanged {
        stage: &'static str,
        before: usize,
        after: usize,
    },

    /// Generic error with context
    Other(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::DuplicateColumn { name, sources } => write!(
                f,
                "Duplicate column name '{name}' produced by: {}",
                sources.join(", ")
            ),
            Self::MissingColumn(name) => write!(f, "Column not found: {name}"),
            Self::RowCountChanged {
                stage,
                before,
                after,
            } => write!(
                f,
                "Stage '{stage}' changed the row count from {before} to {after}"
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for FeatureError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for feature preparation.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FeatureError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: FeatureError = e.into();
            FeatureError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: FeatureError = e.into();
            FeatureError::Other(format!("{}: {}", f(), err))
        })
    }
}
