//! Import pipeline from history text to sheet rows.
//!
//! Orchestrates the complete import workflow: reading the history file,
//! parsing it into set records, resolving catalog ids, and appending the
//! rows to the destination sheet.

use crate::catalog::ExerciseCatalog;
use crate::config::ImportConfig;
use crate::constants::{DATE_FORMAT, UNMATCHED_REPORT_FILE};
use crate::error::{ImportError, Result};
use crate::models::{ImportStats, ParseStats, Session};
use crate::parser::HistoryParser;
use crate::sheet::{SheetRow, SheetWriter};

use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, info, warn};

/// Main importer for workout history files
pub struct HistoryImporter {
    config: ImportConfig,
    parser: HistoryParser,
    last_parse: Option<ParseStats>,
}

impl HistoryImporter {
    /// Create an importer for the given configuration
    pub fn new(config: ImportConfig) -> Result<Self> {
        config.validate()?;
        let parser = HistoryParser::new().with_session_time(config.session_time);

        Ok(Self {
            config,
            parser,
            last_parse: None,
        })
    }

    /// Line statistics of the most recent run
    pub fn parse_stats(&self) -> Option<&ParseStats> {
        self.last_parse.as_ref()
    }

    async fn read_history(&self) -> Result<String> {
        let path = &self.config.history_path;
        match fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImportError::HistoryNotFound { path: path.clone() })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse the history file into per-date sessions without writing anything
    pub async fn sessions(&self) -> Result<Vec<Session>> {
        let text = self.read_history().await?;
        Ok(self.parser.parse_sessions(&text))
    }

    /// Main import entry point
    pub async fn run(&mut self) -> Result<ImportStats> {
        let start_time = Instant::now();
        println!("{}", "Starting training log import".bright_green().bold());
        println!(
            "  {} {}",
            "History:".bright_cyan(),
            self.config.history_path.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.output_path.display()
        );

        // Step 1: Read and parse
        let text = self.read_history().await?;
        let result = self.parser.parse_with_stats(&text);
        info!(
            "Parsed {} records from {} lines",
            result.stats.records_emitted, result.stats.total_lines
        );
        self.last_parse = Some(result.stats.clone());

        let mut stats = ImportStats {
            records_parsed: result.records.len(),
            output_path: self.config.output_path.clone(),
            ..Default::default()
        };

        if result.records.is_empty() {
            println!(
                "\n{} {}",
                "No records found in".bright_yellow(),
                self.config.history_path.display()
            );
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        // Step 2: Resolve catalog ids
        let catalog = match &self.config.catalog_path {
            Some(path) => {
                let path = path.clone();
                Some(
                    task::spawn_blocking(move || ExerciseCatalog::load_csv(&path))
                        .await
                        .map_err(|e| ImportError::ProcessingFailed {
                            path: self.config.catalog_path.clone().unwrap_or_default(),
                            reason: format!("Failed to spawn catalog loading task: {}", e),
                        })??,
                )
            }
            None => None,
        };

        let exercise_ids: Vec<Option<String>> = result
            .records
            .iter()
            .map(|record| {
                catalog
                    .as_ref()
                    .and_then(|catalog| catalog.match_name(&record.exercise_name))
                    .map(str::to_string)
            })
            .collect();
        stats.catalog_matches = exercise_ids.iter().filter(|id| id.is_some()).count();
        if let Some(catalog) = &catalog {
            if catalog.is_empty() {
                warn!("Exercise catalog has no usable entries");
            }
            debug!(
                "Matched {} of {} records against {} catalog entries",
                stats.catalog_matches,
                stats.records_parsed,
                catalog.len()
            );

            for (record, id) in result.records.iter().zip(&exercise_ids) {
                if id.is_none() {
                    stats.unmatched_exercises.insert(record.exercise_name.clone());
                    stats
                        .unmatched_by_date
                        .insert((record.date(), record.exercise_name.clone()));
                }
            }

            if !stats.unmatched_exercises.is_empty() {
                let report_path = self.unmatched_report_path();
                let parent = report_path.parent().filter(|p| !p.as_os_str().is_empty());
                if let Some(parent) = parent {
                    fs::create_dir_all(parent).await?;
                }
                fs::write(&report_path, unmatched_report(&stats)).await?;
                info!("Unmatched exercises written to {}", report_path.display());
                stats.unmatched_report = Some(report_path);
            }
        }

        // Step 3: Append to the sheet
        if self.config.dry_run {
            println!("\n{}", "Dry run - sheet left unchanged".bright_yellow());
        } else {
            let writer = SheetWriter::new(self.config.output_path.clone())?
                .with_compression(self.config.compression);
            let records = result.records;
            let summary = task::spawn_blocking(move || {
                let rows: Vec<SheetRow<'_>> = records
                    .iter()
                    .zip(exercise_ids)
                    .map(|(record, exercise_id)| SheetRow {
                        record,
                        exercise_id,
                    })
                    .collect();
                writer.append(&rows)
            })
            .await
            .map_err(|e| ImportError::ProcessingFailed {
                path: self.config.output_path.clone(),
                reason: format!("Failed to spawn sheet writing task: {}", e),
            })??;

            stats.rows_appended = summary.rows_appended;
            stats.sheet_rows_total = summary.total_rows;
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        self.print_summary(&stats);
        Ok(stats)
    }

    /// Report file next to the output sheet
    fn unmatched_report_path(&self) -> PathBuf {
        self.config.output_path.with_file_name(UNMATCHED_REPORT_FILE)
    }

    fn print_summary(&self, stats: &ImportStats) {
        println!("\n{}", "Import Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Records parsed:".bright_cyan(),
            stats.records_parsed.to_string().bright_white().bold()
        );
        if self.config.catalog_path.is_some() {
            println!(
                "  {} {}",
                "Catalog matches:".bright_cyan(),
                stats.catalog_matches.to_string().bright_white()
            );
        }
        if !stats.unmatched_exercises.is_empty() {
            println!(
                "  {} {}",
                "Not found in catalog:".bright_yellow(),
                stats.unmatched_exercises.len().to_string().bright_yellow()
            );
            for name in &stats.unmatched_exercises {
                println!("    - {}", name);
            }
            if let Some(path) = &stats.unmatched_report {
                println!("  {} {}", "Unmatched list:".bright_cyan(), path.display());
            }
        }
        if let Some(parse) = &self.last_parse {
            if parse.orphaned_sets > 0 {
                println!(
                    "  {} {}",
                    "Sets without date or exercise:".bright_red(),
                    parse.orphaned_sets.to_string().bright_red().bold()
                );
            }
            if parse.carried_exercise_sets > 0 {
                println!(
                    "  {} {}",
                    "Sets using an exercise from an earlier date:".bright_yellow(),
                    parse.carried_exercise_sets.to_string().bright_yellow()
                );
            }
        }
        if !self.config.dry_run {
            println!(
                "  {} {}",
                "Rows appended:".bright_cyan(),
                stats.rows_appended.to_string().bright_white().bold()
            );
            println!(
                "  {} {}",
                "Rows in sheet:".bright_cyan(),
                stats.sheet_rows_total.to_string().bright_white()
            );
        }
    }
}

/// Sorted unmatched names, then one `date | exercise` line per session
fn unmatched_report(stats: &ImportStats) -> String {
    let mut report = String::new();
    for name in &stats.unmatched_exercises {
        report.push_str(name);
        report.push('\n');
    }

    report.push_str("\n# By date:\n");
    for (date, name) in &stats.unmatched_by_date {
        report.push_str(&format!("{} | {}\n", date.format(DATE_FORMAT), name));
    }
    report
}
