//! Exercise catalog lookup for the `Exercise_ID` column.
//!
//! Loads `id,name_ru,name_en` rows from a CSV file and matches the free-text
//! exercise labels of the history log against them. Labels are often
//! bilingual (`Жим лежа / Bench press`), so each half is tried on its own
//! before falling back to substring containment.

use crate::error::{ImportError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One known exercise
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name_ru: String,
    pub name_en: Option<String>,
}

/// Name-indexed exercise catalog
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
    by_name_ru: HashMap<String, usize>,
    by_name_en: HashMap<String, usize>,
}

impl ExerciseCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_name_ru = HashMap::new();
        let mut by_name_en = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let ru = normalize(&entry.name_ru);
            if !ru.is_empty() {
                by_name_ru.insert(ru, index);
            }
            if let Some(en) = entry.name_en.as_deref().map(normalize) {
                if !en.is_empty() {
                    by_name_en.insert(en, index);
                }
            }
        }

        Self {
            entries,
            by_name_ru,
            by_name_en,
        }
    }

    /// Load a catalog from a CSV file with `id`, `name_ru`, and `name_en` columns
    pub fn load_csv(path: &Path) -> Result<Self> {
        info!("Loading exercise catalog: {}", path.display());

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| ImportError::catalog(path, e.to_string()))?;

        let column = |name: &str| -> Result<StringChunked> {
            df.column(name)
                .and_then(|c| c.str().cloned())
                .map_err(|_| ImportError::catalog(path, format!("missing column '{}'", name)))
        };

        let ids = column("id")?;
        let names_ru = column("name_ru")?;
        let names_en = match df.column("name_en") {
            Ok(c) => Some(c.str()?.clone()),
            Err(_) => None,
        };

        let mut entries = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let (Some(id), Some(name_ru)) = (ids.get(row), names_ru.get(row)) else {
                debug!("Catalog row {} skipped: missing id or name_ru", row + 1);
                continue;
            };
            let name_en = names_en
                .as_ref()
                .and_then(|names| names.get(row))
                .map(str::to_string);

            entries.push(CatalogEntry {
                id: id.trim().to_string(),
                name_ru: name_ru.to_string(),
                name_en,
            });
        }

        debug!("Loaded {} catalog entries", entries.len());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the catalog id for an exercise label from the history log
    pub fn match_name(&self, name: &str) -> Option<&str> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return None;
        }

        let mut parts = normalized.split('/').map(str::trim);
        let ru_part = parts.next().unwrap_or_default();
        let en_part = parts.next().unwrap_or_default();

        let exact = self
            .by_name_ru
            .get(&normalized)
            .or_else(|| self.by_name_en.get(&normalized))
            .or_else(|| self.by_name_ru.get(ru_part).filter(|_| !ru_part.is_empty()))
            .or_else(|| self.by_name_en.get(en_part).filter(|_| !en_part.is_empty()));

        if let Some(&index) = exact {
            return Some(self.entries[index].id.as_str());
        }

        self.entries
            .iter()
            .find(|entry| {
                let ru = normalize(&entry.name_ru);
                let en = entry.name_en.as_deref().map(normalize).unwrap_or_default();
                contains_either_way(&normalized, &ru) || contains_either_way(&normalized, &en)
            })
            .map(|entry| entry.id.as_str())
    }
}

fn contains_either_way(label: &str, name: &str) -> bool {
    !name.is_empty() && (label.contains(name) || name.contains(label))
}

/// Trim, collapse inner whitespace, and lowercase
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
