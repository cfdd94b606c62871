mod config;
mod logging;
mod shutdown;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use contacts::Contacts;
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Contacts Server - contact directory with account lifecycle management
#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "Contacts Server - contact directory with account lifecycle management")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use mock database (sqlite::memory:)
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Purge soft-deleted accounts past retention once and exit
    Sweep,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let args = CliArgs {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // defaults -> YAML (if provided) -> env (CONTACTS__*) -> CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    logging::init_logging(&config.logging);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
        Commands::Sweep => sweep(&config).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Connect, migrate and build the module.
async fn open_contacts(config: &AppConfig) -> Result<Contacts> {
    config.validate()?;
    let db = Contacts::connect(
        &config.database.dsn,
        config.database.max_connections,
        config.database.acquire_timeout,
    )
    .await?;
    Contacts::migrate(&db).await?;
    Contacts::init(db, config.contacts.clone())
}

async fn sweep(config: &AppConfig) -> Result<()> {
    let contacts = open_contacts(config).await?;
    let report = contacts
        .sweep_once()
        .await
        .context("expiry sweep failed, see log for details")?;
    println!(
        "examined={} purged={} skipped={} failed={}",
        report.examined, report.purged, report.skipped, report.failed
    );
    if report.failed > 0 {
        anyhow::bail!("{} account(s) could not be purged", report.failed);
    }
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    tracing::info!("Contacts Server starting");
    let contacts = open_contacts(config).await?;

    // Root token: fired by OS signals, drives the HTTP server and the sweeper.
    let cancel = CancellationToken::new();
    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = shutdown::wait_for_shutdown().await {
            tracing::error!(error = %e, "shutdown: signal waiter failed, stopping");
        }
        cancel_for_signals.cancel();
    });

    let sweeper = contacts.spawn_sweeper(cancel.clone());

    let app = contacts
        .register_rest(Router::new())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "HTTP server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(cancel.clone().cancelled_owned())
        .await
        .context("HTTP server failed");

    cancel.cancel();
    if let Some(handle) = sweeper
        && let Err(e) = handle.await
    {
        tracing::warn!(error = %e, "Expiry sweeper task ended abnormally");
    }

    tracing::info!("Contacts Server stopped");
    served
}
