//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ImportConfig};
use crate::constants::LOG_TARGET;
use crate::error::Result;
use crate::models::Session;
use chrono::NaiveTime;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "training-log")]
#[command(about = "Convert a free-form workout history log into spreadsheet rows")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the workout history text file (defaults to the desktop file)
    #[arg(value_name = "HISTORY_PATH")]
    pub history_path: Option<PathBuf>,

    /// Sheet to append rows to (.xlsx, .csv, or .parquet)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Exercise catalog CSV (id,name_ru,name_en) used to fill Exercise_ID
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Time-of-day written with every date, HH:MM
    #[arg(long, value_name = "HH:MM")]
    pub session_time: Option<String>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long)]
    pub compression: Option<String>,

    /// Parse and report without writing the sheet
    #[arg(long)]
    pub dry_run: bool,

    /// Print the per-date session breakdown and exit
    #[arg(long)]
    pub sessions: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Layer CLI flags over the loaded configuration
    pub fn apply_overrides(&self, mut config: ImportConfig) -> Result<ImportConfig> {
        if let Some(path) = &self.history_path {
            config = config.with_history_path(path);
        }
        if let Some(path) = &self.output_path {
            config = config.with_output_path(path);
        }
        if let Some(path) = &self.catalog {
            config = config.with_catalog_path(path);
        }
        if let Some(time) = &self.session_time {
            let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| {
                crate::ImportError::configuration(format!("Invalid session time '{}': {}", time, e))
            })?;
            config = config.with_session_time(time);
        }
        if let Some(compression) = &self.compression {
            config = config.with_compression(CompressionAlgorithm::parse(compression)?);
        }
        if self.dry_run {
            config = config.with_dry_run();
        }

        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Full configuration: defaults, config file, then these flags
    pub fn resolve_config(&self) -> Result<ImportConfig> {
        let config = ImportConfig::load(self.config.as_deref())?;
        self.apply_overrides(config)
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Print sessions as an indented outline
pub fn print_sessions(sessions: &[Session]) {
    if sessions.is_empty() {
        println!("{}", "No sessions found".bright_yellow());
        return;
    }

    for session in sessions {
        let mut heading = session.date.format("%Y.%m.%d").to_string();
        if let Some(minutes) = session.duration_minutes {
            heading.push_str(&format!(" ({} min)", minutes));
        }
        println!("{}", heading.bright_green().bold());

        if !session.categories.is_empty() {
            println!("  {}", session.categories.join(" • ").bright_black());
        }

        for block in &session.blocks {
            if block.superset {
                println!("  {}", "Superset".bright_magenta());
            }
            let indent = if block.superset { "    " } else { "  " };
            for exercise in &block.exercises {
                println!(
                    "{}{} {}",
                    indent,
                    exercise.name.bright_cyan(),
                    format!("({} sets)", exercise.sets.len()).bright_black()
                );
                for set in &exercise.sets {
                    let rest = if set.rest_before > 0.0 {
                        format!(", rest {} min", set.rest_before)
                    } else {
                        String::new()
                    };
                    println!("{}  {} kg × {}{}", indent, set.weight, set.reps, rest);
                }
            }
        }
        println!();
    }
}
