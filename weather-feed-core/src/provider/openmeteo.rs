use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{
    config::UpstreamConfig,
    model::{City, ForecastResponse, WeatherRecord},
    provider::{FetchError, WeatherProvider, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEZONE: &str = "Europe/Istanbul";

const CURRENT_FIELDS: &str = "temperature_2m,windspeed_10m,relativehumidity_2m,weathercode";

/// Open-Meteo forecast API, current conditions only.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoProvider {
    pub fn new(
        base_url: impl Into<String>,
        timezone: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            timezone: timezone.into(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, FetchError> {
        Self::new(
            config.base_url.as_str(),
            config.timezone.as_str(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn query(&self, city: &City) -> [(&'static str, String); 4] {
        [
            ("latitude", format!("{:.4}", city.latitude)),
            ("longitude", format!("{:.4}", city.longitude)),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", self.timezone.clone()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_weather(&self, city: &City) -> Result<WeatherRecord, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query(city))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        parse_forecast(city, status, &body)
    }
}

fn parse_forecast(city: &City, status: StatusCode, body: &str) -> Result<WeatherRecord, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            body: truncate_body(body),
        });
    }

    let parsed: ForecastResponse = serde_json::from_str(body)?;
    let current = parsed.current.ok_or(FetchError::MissingCurrent)?;

    Ok(WeatherRecord::from_current(city, &current, Utc::now()))
}
