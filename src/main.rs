use anyhow::Context;
use clap::Parser;
use std::process;
use training_log::cli::{Args, print_sessions, setup_logging};
use training_log::{HistoryImporter, ImportError};

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; never resolve.
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::Error::from(ImportError::interrupted(
                    "Import interrupted by user",
                )))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args
        .resolve_config()
        .context("Failed to load configuration")?;

    let mut importer = HistoryImporter::new(config).context("Invalid configuration")?;

    if args.sessions {
        let sessions = importer
            .sessions()
            .await
            .context("Failed to read workout history")?;
        print_sessions(&sessions);
        return Ok(());
    }

    importer.run().await.context("Import failed")?;
    Ok(())
}
