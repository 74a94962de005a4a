//! Tests for line classification

use super::super::line_kind::{
    LineKind, SessionMarker, classify, is_exercise_name, parse_decimal, session_marker,
};
use super::date;

#[test]
fn test_blank_line() {
    assert_eq!(classify("", true), LineKind::Blank);
    assert_eq!(classify("", false), LineKind::Blank);
}

#[test]
fn test_date_line() {
    assert_eq!(classify("2026.02.09", false), LineKind::Date(date(2026, 2, 9)));
    assert_eq!(classify("2026.02.09  ", true), LineKind::Date(date(2026, 2, 9)));
}

#[test]
fn test_date_line_must_stand_alone() {
    // Extra text after the date is not a date line; with a date seen it names an exercise.
    assert_eq!(classify("2026.02.09 утро", false), LineKind::Other);
    assert_eq!(classify("2026.2.9", false), LineKind::Other);
}

#[test]
fn test_impossible_date_is_unclassified() {
    assert_eq!(classify("2026.13.40", false), LineKind::Other);
    assert_eq!(classify("2026.13.40", true), LineKind::Other);
}

#[test]
fn test_exercise_name_requires_date() {
    assert_eq!(classify("Приседания со штангой", true), LineKind::ExerciseName);
    assert_eq!(classify("Приседания со штангой", false), LineKind::Other);
}

#[test]
fn test_exercise_name_exclusions() {
    assert!(is_exercise_name("Тяга гантелей на наклонной скамье 30°"));
    assert!(is_exercise_name("Сгибание ног лежа / Prone leg curl"));

    assert!(!is_exercise_name("Ноги • Плечи"));
    assert!(!is_exercise_name("42м"));
    assert!(!is_exercise_name("СУПЕРСЕТ"));
    assert!(!is_exercise_name("СУПЕРСЕТ из двух упражнений"));
    assert!(!is_exercise_name("Отдых между кругами"));
    assert!(!is_exercise_name("Жим 40 кг разминка"));
}

#[test]
fn test_slash_overrides_bullet_exclusion() {
    assert!(is_exercise_name("Ноги • Плечи / Legs"));
}

#[test]
fn test_set_line() {
    assert_eq!(
        classify("60 кг × 10 повторений", true),
        LineKind::Set {
            weight: 60.0,
            reps: 10
        }
    );
    assert_eq!(
        classify("62.5 кг × 8 повторений", false),
        LineKind::Set {
            weight: 62.5,
            reps: 8
        }
    );
}

#[test]
fn test_set_line_decimal_comma_equals_dot() {
    assert_eq!(
        classify("27,5 кг × 10 повторений", true),
        classify("27.5 кг × 10 повторений", true)
    );
}

#[test]
fn test_set_line_with_overflowing_reps_is_unclassified() {
    assert_eq!(
        classify("60 кг × 99999999999 повторений", true),
        LineKind::Other
    );
}

#[test]
fn test_rest_line() {
    assert_eq!(classify("отдых 2м", true), LineKind::Rest { minutes: 2.0 });
    assert_eq!(classify("Отдых 1,5м", true), LineKind::Rest { minutes: 1.5 });
    assert_eq!(classify("ОТДЫХ 3 м", false), LineKind::Rest { minutes: 3.0 });
}

#[test]
fn test_unclassified_lines() {
    assert_eq!(classify("42м", true), LineKind::Other);
    assert_eq!(classify("Ноги • Плечи", true), LineKind::Other);
    assert_eq!(classify("СУПЕРСЕТ", true), LineKind::Other);
    assert_eq!(classify("отдых долгий", true), LineKind::Other);
}

#[test]
fn test_parse_decimal() {
    assert_eq!(parse_decimal("27,5"), Some(27.5));
    assert_eq!(parse_decimal("27.5"), Some(27.5));
    assert_eq!(parse_decimal("abc"), None);
}

#[test]
fn test_session_markers() {
    assert_eq!(session_marker("42м"), Some(SessionMarker::Duration(42)));
    assert_eq!(session_marker("СУПЕРСЕТ"), Some(SessionMarker::Superset));
    assert_eq!(
        session_marker("Ноги • Плечи"),
        Some(SessionMarker::Categories(vec![
            "Ноги".to_string(),
            "Плечи".to_string()
        ]))
    );
    assert_eq!(session_marker("•"), None);
    assert_eq!(session_marker("что-то ещё"), None);
}
