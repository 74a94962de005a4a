//! Configuration management and validation.
//!
//! Provides the import configuration (source history file, destination
//! sheet, optional exercise catalog, synthetic session time) and its
//! layered loading: built-in defaults, then a TOML file, then CLI flags.

use crate::constants::{
    APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_HISTORY_FILE, DEFAULT_OUTPUT_FILE,
    DEFAULT_SESSION_TIME,
};
use crate::error::{ImportError, Result};
use chrono::NaiveTime;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported compression algorithms for Parquet sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse a CLI value (snappy, zstd, lz4, none)
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(ImportError::configuration(format!(
                "Unknown compression '{}' (expected snappy, zstd, lz4, or none)",
                other
            ))),
        }
    }
}

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Workout history text file
    pub history_path: PathBuf,

    /// Destination sheet (.xlsx, .csv, or .parquet)
    pub output_path: PathBuf,

    /// Optional `id,name_ru,name_en` CSV used to fill `Exercise_ID`
    pub catalog_path: Option<PathBuf>,

    /// Time-of-day attached to every set timestamp
    pub session_time: NaiveTime,

    /// Compression for Parquet sheets
    pub compression: CompressionAlgorithm,

    /// Parse and report without writing the sheet
    pub dry_run: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let base = default_base_dir();
        let (hour, minute) = DEFAULT_SESSION_TIME;

        Self {
            history_path: base.join(DEFAULT_HISTORY_FILE),
            output_path: base.join(DEFAULT_OUTPUT_FILE),
            catalog_path: None,
            session_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
            compression: CompressionAlgorithm::Snappy,
            dry_run: false,
        }
    }
}

impl ImportConfig {
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_session_time(mut self, session_time: NaiveTime) -> Self {
        self.session_time = session_time;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Default config file location, `<config_dir>/training-log/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ImportConfig = toml::from_str(&content).map_err(|e| {
            ImportError::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, overlaid by the given file or the default file if it exists
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path),
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Check the settings before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.history_path.as_os_str().is_empty() {
            return Err(ImportError::configuration("History path is empty"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ImportError::configuration("Output path is empty"));
        }

        if self.history_path == self.output_path {
            return Err(ImportError::configuration(format!(
                "Output path must differ from the history file: {}",
                self.output_path.display()
            )));
        }

        Ok(())
    }
}

/// The desktop, falling back to home, then the working directory
fn default_base_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
