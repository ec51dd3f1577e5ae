//! ParkYourLark server entry point.
//!
//! # Responsibility
//! - Resolve configuration from file, environment, and flags.
//! - Construct the configured store and inject it into the admin service.
//! - Serve HTTP until a shutdown signal arrives.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use parkyourlark_api::{router, serve, shutdown_signal, AppConfig, CliOverrides, StoreBackend};
use parkyourlark_core::{
    init_logging, AdminService, DataAccess, InMemoryDataAccess, SqliteDataAccess,
};
use tokio::net::TcpListener;

/// Parking space registration API
#[derive(Parser)]
#[command(name = "parkyourlark", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server
    #[arg(short, long)]
    port: Option<u16>,

    /// Use the in-memory store instead of SQLite
    #[arg(long)]
    mock: bool,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration, open the store, and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&CliOverrides {
        port: cli.port,
        mock: cli.mock,
        log_level: cli.log_level,
    });

    let log_dir = config
        .logging
        .dir
        .as_deref()
        .map(|dir| dir.to_str().context("logging.dir must be valid UTF-8"))
        .transpose()?;
    init_logging(&config.logging.level, log_dir).map_err(anyhow::Error::msg)?;

    let addr = config.server.socket_addr()?;
    let command = cli.command.unwrap_or(Commands::Run);

    match config.database.backend {
        StoreBackend::Sqlite => {
            let path = &config.database.path;
            let store = SqliteDataAccess::open(path)
                .with_context(|| format!("failed to open database `{}`", path.display()))?;
            run(command, addr, store).await
        }
        StoreBackend::Memory => run(command, addr, InMemoryDataAccess::new()).await,
    }
}

async fn run<D>(command: Commands, addr: SocketAddr, store: D) -> Result<()>
where
    D: DataAccess + Send + Sync + 'static,
{
    match command {
        Commands::Check => {
            info!("event=config_check module=cli status=ok addr={addr}");
            println!("configuration ok");
            Ok(())
        }
        Commands::Run => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            let app = router(Arc::new(AdminService::new(store)));
            serve(listener, app, shutdown_signal()).await?;
            Ok(())
        }
    }
}
