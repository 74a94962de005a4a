//! Single-pass state machine over workout history text
//!
//! Carries the current date, the current exercise, and the pending rest
//! value from line to line, emitting one [`SetRecord`] per set line that
//! has both a date and an exercise in effect.

use super::line_kind::{LineKind, classify};
use crate::constants::DEFAULT_SESSION_TIME;
use crate::models::{ParseResult, ParseStats, SetRecord};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, trace};

/// Something the scan observed, in document order
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanEvent<'a> {
    Date(NaiveDate),
    Exercise(&'a str),
    Set(SetRecord),
    Other(&'a str),
}

/// Context carried between lines of one scan
#[derive(Debug, Default)]
struct ScanState<'a> {
    current_date: Option<NaiveDate>,
    current_exercise: Option<&'a str>,
    /// Date under which `current_exercise` was named
    exercise_date: Option<NaiveDate>,
    pending_rest: f64,
}

/// Parser for free-form workout history logs
#[derive(Debug, Clone)]
pub struct HistoryParser {
    session_time: NaiveTime,
}

impl Default for HistoryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryParser {
    pub fn new() -> Self {
        let (hour, minute) = DEFAULT_SESSION_TIME;
        Self {
            session_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Use a different synthetic time-of-day for record timestamps
    pub fn with_session_time(mut self, session_time: NaiveTime) -> Self {
        self.session_time = session_time;
        self
    }

    /// Parse the whole document into set records, in encounter order
    pub fn parse(&self, text: &str) -> Vec<SetRecord> {
        self.parse_with_stats(text).records
    }

    /// Parse the whole document, also returning line statistics
    pub fn parse_with_stats(&self, text: &str) -> ParseResult {
        let mut records = Vec::new();
        let stats = self.scan(text, |event| {
            if let ScanEvent::Set(record) = event {
                records.push(record);
            }
        });

        debug!(
            "Parsed {} records from {} lines ({} orphaned sets, {} unclassified lines)",
            stats.records_emitted, stats.total_lines, stats.orphaned_sets, stats.unclassified_lines
        );

        ParseResult { records, stats }
    }

    /// Run the state machine, reporting every meaningful line to `on_event`
    pub(crate) fn scan<'a, F>(&self, text: &'a str, mut on_event: F) -> ParseStats
    where
        F: FnMut(ScanEvent<'a>),
    {
        let mut state = ScanState::default();
        let mut stats = ParseStats::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            stats.total_lines += 1;

            match classify(line, state.current_date.is_some()) {
                LineKind::Blank => {
                    stats.blank_lines += 1;
                }
                LineKind::Date(date) => {
                    stats.date_lines += 1;
                    state.current_date = Some(date);
                    on_event(ScanEvent::Date(date));
                }
                LineKind::ExerciseName => {
                    stats.exercise_lines += 1;
                    state.current_exercise = Some(line);
                    state.exercise_date = state.current_date;
                    on_event(ScanEvent::Exercise(line));
                }
                LineKind::Set { weight, reps } => {
                    stats.set_lines += 1;
                    match (state.current_date, state.current_exercise) {
                        (Some(date), Some(exercise)) => {
                            if state.exercise_date != Some(date) {
                                stats.carried_exercise_sets += 1;
                                debug!(
                                    "Line {}: set on {} reuses exercise '{}' from an earlier date",
                                    index + 1,
                                    date,
                                    exercise
                                );
                            }

                            let record = SetRecord::new(
                                date.and_time(self.session_time),
                                exercise,
                                weight,
                                reps,
                                state.pending_rest,
                            );
                            stats.records_emitted += 1;
                            on_event(ScanEvent::Set(record));
                        }
                        _ => {
                            stats.orphaned_sets += 1;
                            debug!(
                                "Line {}: set line without date or exercise dropped: {}",
                                index + 1,
                                line
                            );
                        }
                    }
                    state.pending_rest = 0.0;
                }
                LineKind::Rest { minutes } => {
                    stats.rest_lines += 1;
                    state.pending_rest = minutes;
                }
                LineKind::Other => {
                    stats.unclassified_lines += 1;
                    trace!("Line {}: unclassified: {}", index + 1, line);
                    state.pending_rest = 0.0;
                    on_event(ScanEvent::Other(line));
                }
            }
        }

        stats
    }
}
