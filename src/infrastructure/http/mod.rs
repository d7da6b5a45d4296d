use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, health::ReadinessState, tts::TtsController};
use crate::infrastructure::config::Config;

/// Assemble the application router. Kept separate from the listener so
/// tests can drive it in-process.
pub fn build_router(
    tts_controller: Arc<TtsController>,
    readiness: Arc<ReadinessState>,
) -> Router {
    let tts_routes = Router::new()
        .route("/api/tts/synthesize", post(TtsController::synthesize))
        .route("/api/tts/voices", get(TtsController::list_voices))
        .with_state(tts_controller);

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness);

    Router::new()
        .merge(health_routes)
        .merge(tts_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
