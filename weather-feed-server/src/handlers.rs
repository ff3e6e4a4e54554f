use std::{convert::Infallible, sync::Arc};

use axum::{
    Json,
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;
use weather_feed_core::{Frame, frame};

use crate::state::AppState;

/// Frames buffered per connection before the loop waits on the client.
const FRAME_BUFFER: usize = 4;

/// `GET /api/weather/stream`
///
/// Spawns a dedicated stream loop for this connection. The loop writes into
/// a channel whose receiver backs the response body, so a client that goes
/// away drops the receiver and the loop stops on its next wait.
pub async fn weather_stream(State(state): State<Arc<AppState>>) -> Response {
    let (tx, rx) = mpsc::channel::<Frame>(FRAME_BUFFER);
    let stream_loop = state.stream.clone();
    let shutdown = state.shutdown.clone();

    info!(
        cities = stream_loop.cities().len(),
        interval_secs = stream_loop.interval().as_secs(),
        "weather stream opened"
    );

    tokio::spawn(async move {
        let mut tx = tx;
        let summary = stream_loop.run(&mut tx, shutdown).await;
        info!(
            ticks = summary.ticks,
            events = summary.events_sent,
            "weather stream closed"
        );
    });

    let body = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|frame| (Ok::<_, Infallible>(frame.encode()), rx))
    });

    (
        [
            (header::CONTENT_TYPE, frame::CONTENT_TYPE),
            (header::CACHE_CONTROL, frame::CACHE_CONTROL),
            (header::CONNECTION, frame::CONNECTION),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/health`
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
