//! Error handling for training log import operations.
//!
//! The history parser itself never fails; these errors cover reading the
//! source text, loading the exercise catalog, and appending to the sheet.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("History file not found at path: {path}")]
    HistoryNotFound { path: PathBuf },

    #[error("Sheet header mismatch in file: {path} - expected {expected} columns, found {found}")]
    HeaderMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported output format for file: {path} (expected .xlsx, .csv, or .parquet)")]
    UnsupportedOutput { path: PathBuf },

    #[error("Workbook error in file: {path} - {reason}")]
    Workbook { path: PathBuf, reason: String },

    #[error("Failed to load exercise catalog: {path} - {reason}")]
    Catalog { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl ImportError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a catalog load error
    pub fn catalog(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Catalog {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
