use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aiwire_common::Config;
use aiwire_engine::arxiv::ArxivClient;
use aiwire_engine::feeds::HttpFeedFetcher;
use aiwire_engine::scheduler::SyncScheduler;
use aiwire_engine::sync::SyncEngine;
use aiwire_store::{migrate, PgStore};

#[derive(Parser)]
#[command(name = "aiwire-engine", about = "AI content synchronization engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the engine as a daemon: periodic sync until interrupted.
    Run,
    /// Run one incremental sync and exit.
    Sync,
    /// Run one full backfill sync (past 30 days) and exit.
    Backfill,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aiwire=info".parse()?))
        .init();

    let cli = Cli::parse();

    info!("AIWire engine starting...");

    let config = Config::from_env();
    config.log_redacted();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    migrate(&pool).await?;

    let engine = SyncEngine::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(ArxivClient::new()),
        Arc::new(HttpFeedFetcher::new()),
        &config,
    );
    let scheduler = SyncScheduler::new(engine, config.sync_interval_minutes);

    match cli.command {
        Command::Run => {
            let outcome = scheduler.start();
            info!(message = outcome.message.as_str(), "Scheduler control");

            tokio::signal::ctrl_c().await?;
            info!("Interrupt received, shutting down");
            let outcome = scheduler.stop();
            info!(message = outcome.message.as_str(), "Scheduler control");
        }
        Command::Sync => {
            if let Some(report) = scheduler.run_now().await {
                println!("{report}");
            }
        }
        Command::Backfill => {
            if let Some(report) = scheduler.run_initial_sync().await {
                println!("{report}");
            }
        }
    }

    Ok(())
}
