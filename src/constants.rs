//! Application constants for the training log importer
//!
//! Keywords of the history text format, sheet layout, and default file
//! locations used throughout the importer.

// =============================================================================
// History Text Vocabulary
// =============================================================================

/// Weight unit token; any line containing it is never an exercise name
pub const WEIGHT_UNIT: &str = "кг";

/// Rest keyword, matched case-insensitively
pub const REST_KEYWORD: &str = "отдых";

/// Line prefix marking a superset block
pub const SUPERSET_MARKER: &str = "СУПЕРСЕТ";

/// Separator used in category tag lines like "Ноги • Плечи"
pub const BULLET: char = '•';

/// Separator between the Russian and English halves of an exercise name
pub const NAME_SEPARATOR: char = '/';

/// Strict date line pattern, `YYYY.MM.DD`
pub const DATE_PATTERN: &str = r"^(\d{4}\.\d{2}\.\d{2})\s*$";

/// Date format used by date lines
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// Set line pattern: `60 кг × 10 повторений` (comma or dot decimals)
pub const SET_PATTERN: &str = r"^(\d+(?:[.,]\d+)?)\s*кг\s*×\s*(\d+)\s*повторений\s*$";

/// Rest line pattern: `отдых 2м` (comma or dot decimals, any keyword case)
pub const REST_PATTERN: &str = r"(?i)^отдых\s+(\d+(?:[.,]\d+)?)\s*м\s*$";

/// Bare minute annotation like `42м`; never an exercise name
pub const MINUTES_PATTERN: &str = r"^(\d+)\s*м\s*$";

// =============================================================================
// Sheet Layout
// =============================================================================

/// Header row of the destination sheet, in column order
pub const SHEET_HEADER: [&str; 7] = [
    "Date",
    "Exercise_ID",
    "Exercise_Name_Calc",
    "Input_Weight",
    "Total_Weight",
    "Reps",
    "Rest",
];

/// Timestamp format written to the `Date` column, e.g. `2026.02.09, 12:00`
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d, %H:%M";

/// Synthetic time-of-day attached to every set (hour, minute)
pub const DEFAULT_SESSION_TIME: (u32, u32) = (12, 0);

// =============================================================================
// Default Locations
// =============================================================================

/// Default history file name, looked up on the desktop
pub const DEFAULT_HISTORY_FILE: &str = "История тренировок.txt";

/// Default output sheet name, looked up on the desktop
pub const DEFAULT_OUTPUT_FILE: &str = "log.xlsx";

/// Catalog misses, written next to the output sheet
pub const UNMATCHED_REPORT_FILE: &str = "unmapped-exercises.txt";

/// Application directory name under the user config directory
pub const APP_CONFIG_DIR: &str = "training-log";

/// Config file name inside [`APP_CONFIG_DIR`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log filter target
pub const LOG_TARGET: &str = "training_log";
