//! TempestWatch CLI
//!
//! Command-line interface for the WeatherFlow Tempest weather station:
//! station inventory, recorded observations and live listening.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use anyhow::Context;
use application::{DeviceOutcome, DiscoveryService, ListenerService};
use clap::{Parser, Subcommand};
use domain::DeviceId;
use integration_tempest::{AccessToken, TempestClient, TempestConfig, TempestStream};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// TempestWatch CLI
#[derive(Parser)]
#[command(name = "tempestwatch")]
#[command(author, version, about = "WeatherFlow Tempest weather station client", long_about = None)]
struct Cli {
    /// Personal access token (falls back to TEMPEST_TOKEN)
    #[arg(long, env = "TEMPEST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Base URL of the REST API
    #[arg(long)]
    base_url: Option<String>,

    /// URL of the live data WebSocket
    #[arg(long)]
    socket_url: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum LogFormat {
    /// Human-readable log lines
    Text,
    /// One JSON object per log line
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List stations and their devices
    Stations,

    /// Show the latest recorded observation for a device
    Observations {
        /// Device identifier
        device_id: u64,
    },

    /// Discover listenable devices and stream their live observations
    Listen,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(verbose));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Apply endpoint overrides on top of the default configuration
fn build_config(cli: &Cli) -> TempestConfig {
    let mut config = TempestConfig::default();
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(socket_url) = &cli.socket_url {
        config.socket_url.clone_from(socket_url);
    }
    config
}

/// Resolve the access token from the flag or the environment
fn resolve_token(token: Option<String>) -> Result<AccessToken, integration_tempest::TempestError> {
    match token {
        Some(token) if !token.trim().is_empty() => Ok(AccessToken::new(token)),
        _ => AccessToken::from_env(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);

    let config = build_config(&cli);
    let token = match resolve_token(cli.token.clone()) {
        Ok(token) => token,
        Err(e) => {
            println!("❌ {e}");
            std::process::exit(1);
        },
    };

    match cli.command {
        Commands::Stations => run_stations(config, token).await,
        Commands::Observations { device_id } => {
            run_observations(config, token, DeviceId::new(device_id)).await
        },
        Commands::Listen => run_listen(config, token).await,
    }
}

async fn run_stations(config: TempestConfig, token: AccessToken) -> anyhow::Result<()> {
    let client =
        TempestClient::new(config, token).context("Failed to initialize the REST client")?;
    let service = DiscoveryService::new(Arc::new(client));

    let stations = service.stations().await?;
    if stations.is_empty() {
        println!("No stations are visible to this token");
        return Ok(());
    }

    for station in &stations {
        let name = station.name.as_deref().unwrap_or("unnamed");
        println!("🏠 Station {} ({name})", station.station_id);
        for device in &station.devices {
            let serial = device.serial_number.as_deref().unwrap_or("-");
            let marker = if device.is_listenable() { "📡" } else { "  " };
            println!(
                "   {marker} {} {} [{serial}]",
                device.device_id,
                device.device_type.label()
            );
        }
    }

    Ok(())
}

async fn run_observations(
    config: TempestConfig,
    token: AccessToken,
    device_id: DeviceId,
) -> anyhow::Result<()> {
    let client =
        TempestClient::new(config, token).context("Failed to initialize the REST client")?;
    let service = DiscoveryService::new(Arc::new(client));

    match service.latest_observation(device_id).await? {
        Some(observation) => {
            println!("📈 Latest observation for device {device_id}:");
            println!("{observation}");
        },
        None => println!("Device {device_id} has no recorded observations"),
    }

    Ok(())
}

async fn run_listen(config: TempestConfig, token: AccessToken) -> anyhow::Result<()> {
    let client = TempestClient::new(config.clone(), token.clone())
        .context("Failed to initialize the REST client")?;
    let discovery = DiscoveryService::new(Arc::new(client));

    let devices = discovery
        .discover()
        .await
        .context("Failed to fetch the station inventory")?;
    if devices.is_empty() {
        println!("No listenable devices found");
        return Ok(());
    }

    println!(
        "📡 Listening to {} device(s), press Ctrl+C to stop",
        devices.len()
    );

    let listener = ListenerService::new(Arc::new(TempestStream::new(config, token)));
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let report = listener.run(devices, cancel).await;

    if report.all_closed {
        println!("👋 All subscriptions closed cleanly");
    } else {
        for device_id in report.failed_devices() {
            if let Some(DeviceOutcome::Failed(reason)) = report.outcome(device_id) {
                println!("❌ Device {device_id}: {reason}");
            }
        }
    }

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, shutting down...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, shutting down...");
        }
    }
}
