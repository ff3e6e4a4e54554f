use std::{path::Path, sync::Arc};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Build the complete router.
///
/// - `GET /api/weather/stream` -- weather event stream
/// - `GET /api/health` -- health check
/// - everything else -- files under `static_dir`, when given
///
/// CORS allows any origin, matching the browser client being served from
/// anywhere during development.
pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/weather/stream", get(handlers::weather_stream))
        .route("/api/health", get(handlers::health));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
