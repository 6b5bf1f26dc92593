//! Error handling for the prediction engine.

use std::path::{Path, PathBuf};

use arrow::error::ArrowError;

/// Specialized error type for the prediction engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or decoding CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] ArrowError),

    /// No usable dataset file found at any discovery path
    #[error("no dataset file found in {}", dir.display())]
    DatasetMissing {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// No parsable training rows in any source, including the synthetic fallback
    #[error("no parsable training rows in any dataset source")]
    EmptyTrainingSet,

    /// The header row is unusable for the detected format
    #[error("schema error: {0}")]
    Schema(String),

    /// Training is in progress on another caller; retry once it completes
    #[error("engine is warming up, retry once training completes")]
    Initializing,

    /// Error persisting or restoring a model artifact
    #[error("artifact error: {0}")]
    Artifact(String),
}

/// Result type for prediction engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A non-fatal problem encountered while parsing one dataset row.
///
/// Warnings are accumulated alongside a load and never abort it.
#[derive(Debug, Clone)]
pub struct ParseWarning {
    /// Zero-based row index within the source, if the problem is row-scoped
    pub row: Option<usize>,
    /// What went wrong
    pub message: String,
}

impl ParseWarning {
    /// Warning for a specific data row
    #[must_use]
    pub fn row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            message: message.into(),
        }
    }

    /// Warning that applies to the dataset as a whole
    #[must_use]
    pub fn dataset(message: impl Into<String>) -> Self {
        Self {
            row: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Log every accumulated warning for a source at `warn` level
pub fn log_warnings(source: &Path, warnings: &[ParseWarning]) {
    for warning in warnings {
        log::warn!("{}: {warning}", source.display());
    }
}
