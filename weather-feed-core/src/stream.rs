//! Per-connection weather update loop.
//!
//! Each connected client gets its own [`StreamLoop::run`]. Every tick the
//! loop fetches all configured cities concurrently, keeps whatever succeeded
//! (in configuration order) and pushes it to the client as one [`Frame`].
//! Ticks where nothing succeeded send nothing and do not consume an event id.
//!
//! The loop only ends when the server shuts down or the client goes away.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::{
    frame::Frame,
    model::{City, WeatherRecord},
    provider::{WeatherProvider, fetch},
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stream client disconnected")]
pub struct SinkClosed;

/// Destination for encoded events, usually one client connection.
#[async_trait]
pub trait FrameSink: Send + Sync {
    async fn send(&mut self, frame: Frame) -> Result<(), SinkClosed>;

    /// Resolves once the receiving side is gone.
    async fn closed(&self);
}

#[async_trait]
impl FrameSink for mpsc::Sender<Frame> {
    async fn send(&mut self, frame: Frame) -> Result<(), SinkClosed> {
        mpsc::Sender::send(self, frame).await.map_err(|_| SinkClosed)
    }

    async fn closed(&self) {
        mpsc::Sender::closed(self).await
    }
}

/// Counters reported when a stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub ticks: u64,
    pub events_sent: u64,
}

#[derive(Debug, Clone)]
pub struct StreamLoop {
    provider: Arc<dyn WeatherProvider>,
    cities: Arc<[City]>,
    interval: Duration,
}

impl StreamLoop {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cities: impl Into<Arc<[City]>>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            cities: cities.into(),
            interval,
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch every city concurrently and return the successes in city order.
    pub async fn tick(&self) -> Vec<WeatherRecord> {
        let fetches = self
            .cities
            .iter()
            .map(|city| fetch(self.provider.as_ref(), city));

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Drive one client connection until shutdown or disconnect.
    pub async fn run<S: FrameSink>(
        &self,
        sink: &mut S,
        mut shutdown: watch::Receiver<()>,
    ) -> StreamSummary {
        let mut summary = StreamSummary::default();
        let mut next_id: u64 = 0;

        loop {
            if shutdown.has_changed().unwrap_or(true) {
                info!("server shutting down, closing weather stream");
                break;
            }

            let records = tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("server shutting down, closing weather stream");
                    break;
                }
                _ = sink.closed() => {
                    info!("weather stream client disconnected");
                    break;
                }
                records = self.tick() => records,
            };
            summary.ticks += 1;

            if records.is_empty() {
                debug!(tick = summary.ticks, "no weather data this tick, skipping event");
            } else {
                // Records hold only strings, numbers and timestamps, and serde_json
                // writes non-finite floats as null, so this cannot fail today.
                match Frame::from_records(next_id, &records) {
                    Ok(frame) => {
                        // A client that stops reading must not pin the loop past shutdown.
                        let sent = tokio::select! {
                            biased;
                            _ = shutdown.changed() => {
                                info!("server shutting down, closing weather stream");
                                break;
                            }
                            sent = sink.send(frame) => sent,
                        };
                        if sent.is_err() {
                            info!("weather stream client disconnected");
                            break;
                        }
                        info!(event_id = next_id, records = records.len(), "weather event sent");
                        next_id += 1;
                        summary.events_sent += 1;
                    }
                    Err(e) => {
                        error!(error = %e, "failed to encode weather event");
                    }
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("server shutting down, closing weather stream");
                    break;
                }
                _ = sink.closed() => {
                    info!("weather stream client disconnected");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        summary
    }
}
