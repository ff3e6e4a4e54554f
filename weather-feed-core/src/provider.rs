use async_trait::async_trait;
use futures::FutureExt;
use reqwest::StatusCode;
use std::{fmt::Debug, panic::AssertUnwindSafe};
use tracing::{debug, error, warn};

use crate::model::{City, WeatherRecord};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Everything that can go wrong while fetching one city.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse upstream response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("upstream response has no current conditions")]
    MissingCurrent,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &City) -> Result<WeatherRecord, FetchError>;
}

/// Fetch one city, downgrading any failure to `None` after logging it.
///
/// Failures of one city must never affect the others, so nothing escapes
/// this function, panics included.
pub async fn fetch(provider: &dyn WeatherProvider, city: &City) -> Option<WeatherRecord> {
    debug!(city = %city.name, "fetching current weather");

    match AssertUnwindSafe(provider.current_weather(city))
        .catch_unwind()
        .await
    {
        Ok(Ok(record)) => Some(record),
        Ok(Err(FetchError::MissingCurrent)) => {
            warn!(city = %city.name, "upstream returned no current conditions");
            None
        }
        Ok(Err(e)) => {
            error!(city = %city.name, error = %e, "failed to fetch weather");
            None
        }
        Err(_) => {
            error!(city = %city.name, "weather fetch panicked");
            None
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
