//! HTTP surface for the `weather-feed` service.
//!
//! Exposes:
//! - `GET /api/weather/stream`: one Server-Sent Events stream per client,
//!   each driven by its own [`StreamLoop`](weather_feed_core::StreamLoop)
//! - `GET /api/health`: liveness probe
//! - optional static files for the browser client
//!
//! Shutdown is broadcast to every open stream through a
//! [`tokio::sync::watch`] channel so streams close before the server exits.

pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use router::build_router;
pub use server::{ServerError, serve};
pub use state::AppState;
