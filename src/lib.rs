//! Training Log Library
//!
//! A Rust library for converting a free-form, human-authored workout history
//! log into normalized rows appended to a spreadsheet.
//!
//! This library provides tools for:
//! - Classifying history lines (dates, exercise names, sets, rest intervals)
//! - Parsing the whole log in one pass into ordered set records
//! - Grouping sets into per-date sessions with supersets and category tags
//! - Matching exercise labels against an exercise catalog
//! - Appending rows to Excel, CSV, or Parquet sheets with header reconciliation

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod sheet;

// Re-export commonly used types
pub use catalog::ExerciseCatalog;
pub use config::{CompressionAlgorithm, ImportConfig};
pub use error::{ImportError, Result};
pub use models::{ParseResult, ParseStats, Session, SetRecord};
pub use parser::HistoryParser;
pub use processor::HistoryImporter;
pub use sheet::{SheetFormat, SheetWriter};
