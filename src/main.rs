use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use suchna::config::Config;
use suchna::ingest::Pipeline;
use suchna::storage::NoticeStore;
use suchna::{scheduler, server};

#[derive(Parser)]
#[command(
    name = "suchna",
    version,
    about = "University notice-board ingestion service with date inference",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (environment variables otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single ingestion pass and print the report
    Ingest,

    /// Serve the read API and run the ingestion scheduler
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the most recent notices
    Latest {
        /// Number of notices to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Ingest => ingest(config).await?,
        Commands::Serve { host, port } => serve(config, host, port).await?,
        Commands::Latest { limit } => latest(config, limit)?,
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("suchna=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("suchna=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

async fn ingest(config: Config) -> Result<()> {
    let store = Arc::new(NoticeStore::open(&config.database.sqlite_path)?);
    let pipeline = Pipeline::new(&config, store)?;

    let report = pipeline.run().await;

    println!("Ingestion finished: {:?}", report.outcome);
    println!("  Created: {}", report.created);
    println!("  Updated: {}", report.updated);
    println!("  Total:   {}", report.total);
    Ok(())
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let store = Arc::new(NoticeStore::open(&config.database.sqlite_path)?);
    let pipeline = Arc::new(Pipeline::new(&config, store.clone())?);

    let scheduler = tokio::spawn(scheduler::run_loop(pipeline, config.ingest_interval()));

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let app = server::router(store);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(%addr, "notice API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    scheduler.abort();
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install shutdown signal handler");
    }
    tracing::info!("shutdown signal received");
}

fn latest(config: Config, limit: usize) -> Result<()> {
    let store = NoticeStore::open(&config.database.sqlite_path)?;

    let notices = store.latest(limit)?;
    if notices.is_empty() {
        println!("No notices stored yet.");
        return Ok(());
    }

    for notice in notices {
        println!("{}  {}", notice.date, notice.title);
        println!("            {}", notice.url);
    }
    Ok(())
}
