//! Workout history text parser
//!
//! Turns a loosely structured, line-oriented training log into set
//! records. The parser is organized into:
//! - [`line_kind`] - pure per-line classification in priority order
//! - [`history`] - the single-pass state machine producing [`SetRecord`]s
//! - [`sessions`] - per-date grouping with duration, categories, and supersets
//!
//! ## Usage
//!
//! ```rust
//! use training_log::parser::HistoryParser;
//!
//! let text = "2026.02.09\nПриседания со штангой\nотдых 2м\n60 кг × 10 повторений\n";
//! let records = HistoryParser::new().parse(text);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].rest_before, 2.0);
//! ```
//!
//! [`SetRecord`]: crate::models::SetRecord

pub mod history;
pub mod line_kind;
pub mod sessions;

#[cfg(test)]
mod tests;

pub use history::HistoryParser;
pub use line_kind::{LineKind, SessionMarker, classify};
pub use sessions::flatten_sessions;
