use std::sync::Arc;

use tokio::sync::watch;
use weather_feed_core::{Config, OpenMeteoProvider, StreamLoop};

use crate::server::ServerError;

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub stream: StreamLoop,
    pub shutdown: watch::Receiver<()>,
}

impl AppState {
    pub fn new(stream: StreamLoop, shutdown: watch::Receiver<()>) -> Self {
        Self { stream, shutdown }
    }

    /// Build the production state: Open-Meteo upstream plus configured cities.
    pub fn from_config(config: &Config, shutdown: watch::Receiver<()>) -> Result<Self, ServerError> {
        let provider = OpenMeteoProvider::from_config(&config.upstream)?;
        let stream = StreamLoop::new(
            Arc::new(provider),
            config.cities.clone(),
            config.stream.interval(),
        );

        Ok(Self::new(stream, shutdown))
    }
}
