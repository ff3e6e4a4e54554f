//! Core library for the `weather-feed` service.
//!
//! This crate defines:
//! - Configuration (server, upstream API, stream cadence, city list)
//! - Shared domain models (cities, weather records, upstream responses)
//! - Abstraction over weather providers, with an Open-Meteo implementation
//! - The per-connection stream loop and its event framing
//!
//! It is used by `weather-feed-server`, but has no HTTP server dependency of its own.

pub mod conditions;
pub mod config;
pub mod frame;
pub mod model;
pub mod provider;
pub mod stream;

#[cfg(test)]
mod test_log;

pub use config::Config;
pub use frame::Frame;
pub use model::{City, WeatherRecord};
pub use provider::{FetchError, OpenMeteoProvider, WeatherProvider};
pub use stream::{FrameSink, SinkClosed, StreamLoop, StreamSummary};
