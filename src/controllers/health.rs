use crate::infrastructure::providers::EspeakProvider;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// What the readiness probe inspects: the offline fallback binary and which
/// provider credentials were configured at startup.
pub struct ReadinessState {
    pub espeak: Arc<EspeakProvider>,
    pub speechify_configured: bool,
    pub elevenlabs_configured: bool,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// The service is ready as long as the offline tier can run; remote tiers
/// are reported but optional.
pub async fn health_ready(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let espeak_available = state.espeak.is_available().await;

    let body = json!({
        "status": if espeak_available { "ready" } else { "degraded" },
        "providers": {
            "speechify": if state.speechify_configured { "configured" } else { "no_credential" },
            "elevenlabs": if state.elevenlabs_configured { "configured" } else { "no_credential" },
            "espeak": if espeak_available { "available" } else { "missing" },
        }
    });

    let status = if espeak_available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body))
}
