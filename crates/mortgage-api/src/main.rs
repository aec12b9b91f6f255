use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mortgage_api::config::{ConfigSource, DEFAULT_CONFIG_PATH, MortgageConfig};
use mortgage_api::{AppState, create_app, tracing_setup};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "mortgage", version, about = "Mortgage calculator HTTP service")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "MORTGAGE_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listen port, overriding the configuration file and environment
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, source) = MortgageConfig::load(&cli.config)?;
    let mut config = config.apply_env_overrides();
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::CheckConfig => {
            if let ConfigSource::Defaults { missing } = &source {
                eprintln!("# {} not found, showing defaults", missing.display());
            }
            config.validate()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Serve => {
            tracing_setup::init_tracing(&config.logging)?;
            source.log();
            config.validate()?;
            start_server(config).await
        }
    }
}

async fn start_server(config: MortgageConfig) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting mortgage calculator");

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_app(state, &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Web server started successfully");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
