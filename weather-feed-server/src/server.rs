//! Server lifecycle: bind, serve, and drain on shutdown.

use std::{future::Future, net::SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use weather_feed_core::{FetchError, config::ServerConfig};

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),

    /// The upstream HTTP client could not be built.
    #[error("upstream client error: {0}")]
    Upstream(#[from] FetchError),
}

/// Serve `router` until `shutdown` resolves and open connections drain.
///
/// Streams only drain if `shutdown` also notifies the stream loops, which
/// the binary does by firing the watch channel held in [`AppState`](crate::AppState).
pub async fn serve<F>(config: &ServerConfig, router: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            ServerError::Bind(format!("invalid address {}:{}: {e}", config.host, config.port))
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;

    info!(%addr, "weather-feed listening");
    info!("SSE endpoint: http://{addr}/api/weather/stream");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    info!("server stopped");
    Ok(())
}
