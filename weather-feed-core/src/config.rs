use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::City,
    provider::openmeteo::{DEFAULT_BASE_URL, DEFAULT_TIMEZONE},
    stream::DEFAULT_INTERVAL,
};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the browser client, served at `/` when set.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

/// Forecast API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timezone: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub interval_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

impl StreamConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [stream]
/// interval_secs = 10
///
/// [[cities]]
/// name = "Bursa"
/// latitude = 40.1826
/// longitude = 29.0665
/// icon = "🌳"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub stream: StreamConfig,
    pub cities: Vec<City>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            stream: StreamConfig::default(),
            cities: default_cities(),
        }
    }
}

pub fn default_cities() -> Vec<City> {
    vec![
        City::new("İstanbul", 41.0082, 28.9784, "🏙️"),
        City::new("Bursa", 40.1826, 29.0665, "🌳"),
        City::new("Eskişehir", 39.7767, 30.5206, "🎓"),
    ]
}

impl Config {
    /// Load config from the platform config path, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-feed", "weather-feed")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            bail!("At least one city must be configured");
        }

        for city in &self.cities {
            if !(-90.0..=90.0).contains(&city.latitude) {
                bail!("City '{}' has invalid latitude {}", city.name, city.latitude);
            }
            if !(-180.0..=180.0).contains(&city.longitude) {
                bail!("City '{}' has invalid longitude {}", city.name, city.longitude);
            }
        }

        if self.stream.interval_secs == 0 {
            bail!("stream.interval_secs must be greater than zero");
        }

        if self.upstream.timeout_secs == 0 {
            bail!("upstream.timeout_secs must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = Config::default();

        let names: Vec<_> = cfg.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["İstanbul", "Bursa", "Eskişehir"]);
        assert_eq!(cfg.stream.interval(), Duration::from_secs(10));
        assert_eq!(cfg.upstream.timezone, "Europe/Istanbul");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [stream]
            interval_secs = 30

            [[cities]]
            name = "Ankara"
            latitude = 39.9334
            longitude = 32.8597
            icon = "🏛️"
            "#,
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.stream.interval_secs, 30);
        assert_eq!(cfg.cities, vec![City::new("Ankara", 39.9334, 32.8597, "🏛️")]);
        assert_eq!(cfg.server, ServerConfig::default());
        assert_eq!(cfg.upstream, UpstreamConfig::default());
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.server.port = 8081;
        cfg.server.static_dir = Some(PathBuf::from("./wwwroot"));
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[stream]\ninterval_secs = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.cities.clear();
        assert!(cfg.validate().unwrap_err().to_string().contains("At least one city"));

        let mut cfg = Config::default();
        cfg.stream.interval_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.upstream.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.cities[1].latitude = 123.0;
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("Bursa"));
        assert!(msg.contains("latitude"));
    }
}
