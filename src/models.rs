//! Core data structures for training log import.
//!
//! Defines the set records produced by the parser, the per-date session
//! grouping, and the statistics reported by parsing and importing.

use crate::constants::TIMESTAMP_FORMAT;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One completed exercise set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Date of the most recent date line at the fixed session time
    pub timestamp: NaiveDateTime,
    /// Exercise label in effect when the set line was read, verbatim
    pub exercise_name: String,
    pub input_weight: f64,
    /// Equal to `input_weight` at parse time
    pub total_weight: f64,
    pub reps: u32,
    /// Rest that preceded this set, in minutes as written; 0 if none
    pub rest_before: f64,
}

impl SetRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        exercise_name: impl Into<String>,
        weight: f64,
        reps: u32,
        rest_before: f64,
    ) -> Self {
        Self {
            timestamp,
            exercise_name: exercise_name.into(),
            input_weight: weight,
            total_weight: weight,
            reps,
            rest_before,
        }
    }

    /// Calendar date of the set
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Sheet representation of the timestamp, e.g. `2026.02.09, 12:00`
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A single set inside a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSet {
    pub weight: f64,
    pub reps: u32,
    pub rest_before: f64,
}

/// An exercise and the sets recorded for it within one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub name: String,
    pub sets: Vec<SessionSet>,
}

/// Consecutive exercises; more than one only for supersets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseBlock {
    pub superset: bool,
    pub exercises: Vec<SessionExercise>,
}

/// Everything recorded under one date line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    /// Workout length from a bare `42м` line directly under the date
    pub duration_minutes: Option<u32>,
    /// Tags from a `Ноги • Плечи` line directly under the date
    pub categories: Vec<String>,
    pub blocks: Vec<ExerciseBlock>,
}

impl Session {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            duration_minutes: None,
            categories: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn set_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|block| &block.exercises)
            .map(|exercise| exercise.sets.len())
            .sum()
    }

    pub fn exercise_count(&self) -> usize {
        self.blocks.iter().map(|block| block.exercises.len()).sum()
    }
}

/// Line-level parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub date_lines: usize,
    pub exercise_lines: usize,
    pub set_lines: usize,
    pub records_emitted: usize,
    /// Set lines dropped because no date or exercise was established yet
    pub orphaned_sets: usize,
    pub rest_lines: usize,
    pub unclassified_lines: usize,
    /// Sets attributed to an exercise named under an earlier date
    pub carried_exercise_sets: usize,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the document produced nothing to import
    pub fn is_empty(&self) -> bool {
        self.records_emitted == 0
    }
}

/// Records with the statistics of the pass that produced them
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub records: Vec<SetRecord>,
    pub stats: ParseStats,
}

/// Outcome of one import run
#[derive(Debug, Default)]
pub struct ImportStats {
    pub records_parsed: usize,
    pub rows_appended: usize,
    pub catalog_matches: usize,
    /// Exercise labels with no catalog entry, sorted
    pub unmatched_exercises: BTreeSet<String>,
    /// Each unmatched label once per date it appears under
    pub unmatched_by_date: BTreeSet<(NaiveDate, String)>,
    /// Where the unmatched list was written, if anywhere
    pub unmatched_report: Option<PathBuf>,
    pub sheet_rows_total: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
