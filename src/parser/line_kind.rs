//! Line classification for workout history text
//!
//! Each trimmed line is tested against an ordered cascade of predicates;
//! the first match decides its [`LineKind`]. Classification is pure: the
//! only context it needs is whether a date line has been seen yet.

use crate::constants::{
    BULLET, DATE_FORMAT, DATE_PATTERN, MINUTES_PATTERN, NAME_SEPARATOR, REST_KEYWORD,
    REST_PATTERN, SET_PATTERN, SUPERSET_MARKER, WEIGHT_UNIT,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| compile(DATE_PATTERN));
static SET_RE: LazyLock<Regex> = LazyLock::new(|| compile(SET_PATTERN));
static REST_RE: LazyLock<Regex> = LazyLock::new(|| compile(REST_PATTERN));
static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| compile(MINUTES_PATTERN));

fn compile(pattern: &str) -> Regex {
    // Patterns are compile-time constants covered by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid line pattern {pattern}: {e}"))
}

/// What a single history line means
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Blank,
    Date(NaiveDate),
    /// The trimmed line itself is the exercise label
    ExerciseName,
    Set { weight: f64, reps: u32 },
    Rest { minutes: f64 },
    Other,
}

/// Session-level annotation found on a line classified as [`LineKind::Other`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMarker {
    /// Bare `42м` workout duration
    Duration(u32),
    /// `Ноги • Плечи` category tags
    Categories(Vec<String>),
    Superset,
}

/// Classify a trimmed line in priority order:
/// blank, date, exercise name, set, rest, anything else.
pub fn classify(line: &str, date_seen: bool) -> LineKind {
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(captures) = DATE_RE.captures(line) {
        // Pattern-shaped but impossible dates like 2026.13.40 are not dates.
        return match NaiveDate::parse_from_str(&captures[1], DATE_FORMAT) {
            Ok(date) => LineKind::Date(date),
            Err(_) => LineKind::Other,
        };
    }

    if date_seen && is_exercise_name(line) {
        return LineKind::ExerciseName;
    }

    if let Some(kind) = parse_set(line) {
        return kind;
    }

    if let Some(kind) = parse_rest(line) {
        return kind;
    }

    LineKind::Other
}

/// Exercise-name shape check; callers gate it on a date having been seen
pub fn is_exercise_name(line: &str) -> bool {
    if line.contains(WEIGHT_UNIT)
        || line.to_lowercase().contains(REST_KEYWORD)
        || line.starts_with(SUPERSET_MARKER)
    {
        return false;
    }

    line.contains(NAME_SEPARATOR) || !(line.contains(BULLET) || MINUTES_RE.is_match(line))
}

fn parse_set(line: &str) -> Option<LineKind> {
    let captures = SET_RE.captures(line)?;
    let weight = parse_decimal(&captures[1])?;
    let reps = captures[2].parse::<u32>().ok()?;
    Some(LineKind::Set { weight, reps })
}

fn parse_rest(line: &str) -> Option<LineKind> {
    let captures = REST_RE.captures(line)?;
    let minutes = parse_decimal(&captures[1])?;
    Some(LineKind::Rest { minutes })
}

/// Parse a number written with either a decimal comma or dot
pub fn parse_decimal(value: &str) -> Option<f64> {
    value.replace(',', ".").parse::<f64>().ok()
}

/// Recognise duration, category, and superset lines
pub fn session_marker(line: &str) -> Option<SessionMarker> {
    if line.starts_with(SUPERSET_MARKER) {
        return Some(SessionMarker::Superset);
    }

    if let Some(captures) = MINUTES_RE.captures(line) {
        return captures[1].parse::<u32>().ok().map(SessionMarker::Duration);
    }

    if line.contains(BULLET) {
        let categories: Vec<String> = line
            .split(BULLET)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if !categories.is_empty() {
            return Some(SessionMarker::Categories(categories));
        }
    }

    None
}
