//! Per-date session grouping
//!
//! Folds the same scan used for flat records into [`Session`] values so
//! that a day's duration, category tags, and superset blocks are kept.
//! Every set record lands in exactly one session.

use super::history::{HistoryParser, ScanEvent};
use super::line_kind::{SessionMarker, session_marker};
use crate::models::{ExerciseBlock, Session, SessionExercise, SessionSet, SetRecord};
use tracing::debug;

#[derive(Debug, Default)]
struct SessionBuilder {
    sessions: Vec<Session>,
    /// A superset marker was seen and its block has no exercise yet
    superset_pending: bool,
    /// Exercises named now join the last (superset) block
    superset_active: bool,
}

impl SessionBuilder {
    fn apply(&mut self, event: ScanEvent<'_>) {
        match event {
            ScanEvent::Date(date) => {
                self.sessions.push(Session::new(date));
                self.superset_pending = false;
                self.superset_active = false;
            }
            ScanEvent::Exercise(name) => self.start_exercise(name),
            ScanEvent::Set(record) => self.add_set(record),
            ScanEvent::Other(line) => self.apply_marker(line),
        }
    }

    fn start_exercise(&mut self, name: &str) {
        let superset_pending = self.superset_pending;
        let superset_active = self.superset_active;
        let Some(session) = self.sessions.last_mut() else {
            return;
        };

        let exercise = SessionExercise {
            name: name.to_string(),
            sets: Vec::new(),
        };

        match session.blocks.last_mut() {
            Some(block) if superset_active && !superset_pending => block.exercises.push(exercise),
            _ => {
                session.blocks.push(ExerciseBlock {
                    superset: superset_pending,
                    exercises: vec![exercise],
                });
                if superset_pending {
                    self.superset_pending = false;
                    self.superset_active = true;
                }
            }
        }
    }

    fn add_set(&mut self, record: SetRecord) {
        let needs_exercise = self
            .sessions
            .last()
            .and_then(|session| session.blocks.last())
            .and_then(|block| block.exercises.last())
            .is_none_or(|exercise| exercise.name != record.exercise_name);

        if needs_exercise {
            // Exercise carried over from an earlier date.
            self.superset_active = false;
            self.superset_pending = false;
            self.start_exercise(&record.exercise_name);
        }

        let Some(exercise) = self
            .sessions
            .last_mut()
            .and_then(|session| session.blocks.last_mut())
            .and_then(|block| block.exercises.last_mut())
        else {
            debug!("Set for '{}' has no session to join", record.exercise_name);
            return;
        };

        exercise.sets.push(SessionSet {
            weight: record.input_weight,
            reps: record.reps,
            rest_before: record.rest_before,
        });
    }

    fn apply_marker(&mut self, line: &str) {
        let Some(marker) = session_marker(line) else {
            return;
        };

        if marker == SessionMarker::Superset {
            self.superset_pending = true;
            self.superset_active = false;
            return;
        }

        let Some(session) = self.sessions.last_mut() else {
            return;
        };

        // Duration and categories only count in the header, before any exercise.
        if !session.blocks.is_empty() {
            return;
        }

        match marker {
            SessionMarker::Duration(minutes) if session.duration_minutes.is_none() => {
                session.duration_minutes = Some(minutes);
            }
            SessionMarker::Categories(categories) if session.categories.is_empty() => {
                session.categories = categories;
            }
            _ => {}
        }
    }
}

impl HistoryParser {
    /// Group the document into one session per date line
    pub fn parse_sessions(&self, text: &str) -> Vec<Session> {
        let mut builder = SessionBuilder::default();
        let stats = self.scan(text, |event| builder.apply(event));

        debug!(
            "Grouped {} records into {} sessions",
            stats.records_emitted,
            builder.sessions.len()
        );

        builder.sessions
    }
}

/// Flatten sessions back into sets with their exercise and date
pub fn flatten_sessions(sessions: &[Session]) -> Vec<(chrono::NaiveDate, &str, &SessionSet)> {
    sessions
        .iter()
        .flat_map(|session| {
            session.blocks.iter().flat_map(move |block| {
                block.exercises.iter().flat_map(move |exercise| {
                    exercise
                        .sets
                        .iter()
                        .map(move |set| (session.date, exercise.name.as_str(), set))
                })
            })
        })
        .collect()
}
