//! Airwatch CLI
//!
//! - `serve`: run the dashboard server with the background poller
//! - `snapshot`: fetch once and print the latest reading per device
//! - `config`: print a default config file

use airwatch::api::{serve, AppState};
use airwatch::config::{generate_default_config, Config, LoggingConfig};
use airwatch::dashboard::{format_value, BannerLevel, Dashboard, DashboardSnapshot, PageView};
use airwatch::poller::Poller;
use airwatch::sensor::HttpSensorSource;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "airwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Air quality monitoring dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server
    Serve {
        /// Override the sensor API base URL
        #[arg(long)]
        source_url: Option<String>,
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch once and print the latest reading per device
    Snapshot {
        /// Only show this device
        #[arg(short, long)]
        device: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {}", path.display()))?;
                println!("Wrote default config to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Serve { source_url, port } => {
            let mut config = config;
            if let Some(url) = source_url {
                config.source.base_url = url;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Commands::Snapshot { device, format } => run_snapshot(config, device, format).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("airwatch={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Airwatch v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Sensor API: {}", config.source.base_url);

    let source = HttpSensorSource::new(config.source.client_config())?;
    let dashboard = Arc::new(Dashboard::new(Arc::new(source)));

    let interval = config.dashboard.refresh_interval();
    tracing::info!("Refreshing every {}s", interval.as_secs());

    let poller = Arc::new(Poller::new(Arc::clone(&dashboard), interval));
    let poller_handle = Arc::clone(&poller).start();

    let api_config = config.api_config();
    let state = AppState::with_poller(dashboard, api_config.clone(), Arc::clone(&poller));
    serve(state, &api_config).await?;

    poller.stop();
    poller_handle.abort();

    tracing::info!("Airwatch stopped");
    Ok(())
}

async fn run_snapshot(
    config: Config,
    device: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let source = HttpSensorSource::new(config.source.client_config())?;
    let dashboard = Dashboard::new(Arc::new(source));
    dashboard.refresh().await;

    let snapshot = dashboard.snapshot().await;
    let pages = device_pages(&snapshot, device.as_deref());

    // Fetch errors repeat on every page
    let mut banners = Vec::new();
    for banner in pages.iter().flat_map(|p| &p.banners) {
        if !banners.contains(&banner) {
            banners.push(banner);
        }
    }
    for banner in banners {
        let level = match banner.level {
            BannerLevel::Error => "error",
            BannerLevel::Warning => "warning",
        };
        eprintln!("{}: {}", level, banner.message);
    }

    match format {
        OutputFormat::Json => {
            let latest: Vec<_> = pages
                .iter()
                .filter_map(|p| p.device.as_ref().map(|d| &d.latest))
                .collect();
            println!("{}", serde_json::to_string_pretty(&latest)?);
        }
        OutputFormat::Table => print_table(&pages),
    }

    if snapshot.devices.value.is_none() {
        anyhow::bail!("device list unavailable");
    }
    Ok(())
}

/// One page per requested device, or per listed device when none is given
fn device_pages(snapshot: &DashboardSnapshot, device: Option<&str>) -> Vec<PageView> {
    if device.is_some() {
        return vec![snapshot.page(device)];
    }

    let first = snapshot.page(None);
    let ids = first.device_ids.clone();
    if ids.len() <= 1 {
        return vec![first];
    }

    ids.iter().map(|id| snapshot.page(Some(id.as_str()))).collect()
}

fn print_table(pages: &[PageView]) {
    println!(
        "{:<16} {:<16} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
        "DEVICE", "LOCATION", "AQI", "DUST", "GAS", "HUMID", "TEMP", "TIMESTAMP"
    );

    for view in pages.iter().filter_map(|p| p.device.as_ref()) {
        let r = &view.latest;
        println!(
            "{:<16} {:<16} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
            view.device_id,
            r.location.as_deref().unwrap_or("-"),
            format_value(r.corrected_gas.map(round1)),
            format_value(r.dust.map(round1)),
            format_value(r.gas.map(round1)),
            format_value(r.humidity.map(round1)),
            format_value(r.temperature.map(round1)),
            r.timestamp
        );
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
