use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};
use weather_feed_core::{Config, OpenMeteoProvider, StreamLoop, WeatherRecord};
use weather_feed_server::{AppState, build_router, serve};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-feed", version, about = "Stream city weather over Server-Sent Events")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Serve the browser client from this directory.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Fetch every city once and print the result.
    Once,

    /// Print the effective configuration.
    Config {
        /// Write the default configuration to the config path.
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve {
                host,
                port,
                static_dir,
            } => {
                let mut config = load_config(self.config.as_deref())?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                if static_dir.is_some() {
                    config.server.static_dir = static_dir;
                }
                run_server(config).await
            }
            Command::Once => {
                let config = load_config(self.config.as_deref())?;
                print_once(&config).await
            }
            Command::Config { init } => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                if init {
                    if path.exists() {
                        bail!("Config file already exists: {}", path.display());
                    }
                    Config::default().save_to(&path)?;
                    println!("Wrote default configuration to {}", path.display());
                }
                let config = Config::load_from(&path)?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
        }
    }
}

/// Explicit `--config` path, else the platform default location.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let state = AppState::from_config(&config, shutdown_rx).context("Failed to build app state")?;
    info!(
        cities = config.cities.len(),
        interval_secs = config.stream.interval_secs,
        upstream = %config.upstream.base_url,
        "configuration loaded"
    );

    let router = build_router(Arc::new(state), config.server.static_dir.as_deref());

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("shutdown requested, closing streams");
        let _ = shutdown_tx.send(());
    };

    serve(&config.server, router, shutdown).await?;
    Ok(())
}

async fn print_once(config: &Config) -> anyhow::Result<()> {
    let provider = OpenMeteoProvider::from_config(&config.upstream)?;
    let stream = StreamLoop::new(
        Arc::new(provider),
        config.cities.clone(),
        config.stream.interval(),
    );

    let records = stream.tick().await;
    if records.is_empty() {
        bail!("No weather data available for any configured city");
    }

    for record in &records {
        println!("{}", format_record(record));
    }

    Ok(())
}

fn format_record(record: &WeatherRecord) -> String {
    format!(
        "{} {}: {:.1}°C, {} {}, wind {:.1} km/h, humidity {}% ({})",
        record.city_icon,
        record.city,
        record.temperature,
        record.weather_icon,
        record.description,
        record.wind_speed,
        record.humidity,
        record.timestamp.format("%H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn cli_parses_serve_overrides() {
        let cli = Cli::try_parse_from(["weather-feed", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { port, host, .. } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli =
            Cli::try_parse_from(["weather-feed", "once", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert!(matches!(cli.command, Command::Once));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stream]\ninterval_secs = 42\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.stream.interval_secs, 42);

        let missing = load_config(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(missing, Config::default());
    }

    #[test]
    fn format_record_is_human_readable() {
        let record = WeatherRecord {
            city: "Bursa".into(),
            city_icon: "🌳".into(),
            temperature: 12.0,
            wind_speed: 3.4,
            humidity: 55,
            description: "Foggy".into(),
            weather_icon: "🌫️".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap(),
        };

        assert_eq!(
            format_record(&record),
            "🌳 Bursa: 12.0°C, 🌫️ Foggy, wind 3.4 km/h, humidity 55% (09:05:00)"
        );
    }
}
