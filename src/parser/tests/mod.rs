//! Test fixtures shared by the history parser tests

mod line_kind_tests;

use chrono::NaiveDate;

/// A short two-day log with rest lines, a category line, and a superset
pub fn create_test_history() -> String {
    r#"2026.02.09
•
58м
Ноги • Плечи
Приседания со штангой
отдых 2м
60 кг × 10 повторений
62.5 кг × 8 повторений

Сгибание ног лежа / Prone leg curl
27 кг × 15 повторений
отдых 1,5м
27,5 кг × 12 повторений

2026.02.11
42м
СУПЕРСЕТ
Жим гантелей сидя / Seated dumbbell press
14 кг × 12 повторений
Разведение гантелей в стороны / Lateral raise
8 кг × 15 повторений
"#
    .to_string()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
