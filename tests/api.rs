use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use newscast_backend::controllers::health::ReadinessState;
use newscast_backend::controllers::tts::{SynthesisDefaults, TtsController};
use newscast_backend::domain::tts::{
    AudioFormat, Gender, ProviderTier, SynthesisModel, SynthesisRequest, TtsError, TtsService,
    Voice,
};
use newscast_backend::infrastructure::audio::AudioSink;
use newscast_backend::infrastructure::http::build_router;
use newscast_backend::infrastructure::providers::{EspeakProvider, TtsProvider, VoiceCatalog};

struct StubProvider {
    tier: ProviderTier,
    response: Result<Vec<u8>, fn() -> TtsError>,
}

#[async_trait]
impl TtsProvider for StubProvider {
    fn tier(&self) -> ProviderTier {
        self.tier
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    async fn synthesize(&self, _request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        match &self.response {
            Ok(bytes) => Ok(bytes.clone()),
            Err(make_err) => Err(make_err()),
        }
    }
}

/// Captures the language the orchestrator was asked to speak
struct RecordingProvider {
    tier: ProviderTier,
    seen_language: std::sync::Mutex<Option<String>>,
}

#[async_trait]
impl TtsProvider for RecordingProvider {
    fn tier(&self) -> ProviderTier {
        self.tier
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        *self.seen_language.lock().unwrap() = Some(request.language.clone());
        Ok(b"audio".to_vec())
    }
}

struct StubCatalog {
    voices: Vec<Voice>,
}

#[async_trait]
impl VoiceCatalog for StubCatalog {
    async fn list_voices(&self) -> Result<Vec<Voice>, TtsError> {
        Ok(self.voices.clone())
    }
}

fn defaults() -> SynthesisDefaults {
    SynthesisDefaults {
        voice: "scott".to_string(),
        model: SynthesisModel::SimbaEnglish,
        format: AudioFormat::Mp3,
        language: "en-US".to_string(),
    }
}

fn sample_voices() -> Vec<Voice> {
    vec![
        Voice {
            id: "scott".to_string(),
            gender: Gender::Male,
            locale: "en-US".to_string(),
            tags: ["narration"].iter().map(|t| t.to_string()).collect(),
        },
        Voice {
            id: "kristy".to_string(),
            gender: Gender::Female,
            locale: "en-US".to_string(),
            tags: ["news"].iter().map(|t| t.to_string()).collect(),
        },
    ]
}

fn build_app_with(
    providers: Vec<Arc<dyn TtsProvider>>,
    defaults: SynthesisDefaults,
    dir: &std::path::Path,
) -> axum::Router {
    let service = Arc::new(TtsService::new(providers, AudioSink::new(dir)));
    let catalog = Arc::new(StubCatalog {
        voices: sample_voices(),
    });
    let controller = Arc::new(TtsController::new(service, catalog, defaults));
    let readiness = Arc::new(ReadinessState {
        espeak: Arc::new(EspeakProvider::new("espeak-ng".to_string())),
        speechify_configured: false,
        elevenlabs_configured: false,
    });
    build_router(controller, readiness)
}

fn build_app(providers: Vec<Arc<dyn TtsProvider>>) -> (axum::Router, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("newscast-api-test-{}", Uuid::new_v4().simple()));
    (build_app_with(providers, defaults(), &dir), dir)
}

fn synthesize_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/tts/synthesize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_synthesize_returns_audio_from_primary() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"mp3 bytes".to_vec()),
    });
    let (app, dir) = build_app(vec![primary]);

    let response = app
        .oneshot(synthesize_request(serde_json::json!({
            "text": "Hello, world!",
            "voice": "scott",
            "format": "mp3"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Provider").unwrap(),
        "primary"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/mpeg"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), b"mp3 bytes");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_synthesize_falls_back_when_primary_is_down() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Err(|| TtsError::ProviderUnavailable("down".to_string())),
    });
    let secondary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Secondary,
        response: Ok(b"fallback audio".to_vec()),
    });
    let (app, dir) = build_app(vec![primary, secondary]);

    let response = app
        .oneshot(synthesize_request(
            serde_json::json!({"text": "Hello, world!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Provider").unwrap(),
        "secondary"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_synthesize_rejects_empty_text() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    let (app, _dir) = build_app(vec![primary]);

    let response = app
        .oneshot(synthesize_request(serde_json::json!({"text": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_synthesize_rejects_oversized_text() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    let (app, _dir) = build_app(vec![primary]);

    let response = app
        .oneshot(synthesize_request(
            serde_json::json!({"text": "a".repeat(10_001)}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_synthesize_reports_bad_gateway_when_chain_is_exhausted() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Err(|| TtsError::MissingCredential("no key".to_string())),
    });
    let secondary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Secondary,
        response: Err(|| TtsError::ProviderUnavailable("down".to_string())),
    });
    let (app, _dir) = build_app(vec![primary, secondary]);

    let response = app
        .oneshot(synthesize_request(
            serde_json::json!({"text": "Hello, world!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_model_is_bad_request() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    let (app, _dir) = build_app(vec![primary]);

    let response = app
        .oneshot(synthesize_request(serde_json::json!({
            "text": "Hello",
            "model": "gpt-4o-mini-tts"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_letterless_text_falls_back_to_configured_default_language() {
    // Digits give language detection nothing to work with; the configured
    // default locale must reach the provider, not a hardcoded one
    let recorder = Arc::new(RecordingProvider {
        tier: ProviderTier::Primary,
        seen_language: std::sync::Mutex::new(None),
    });
    let mut defaults = defaults();
    defaults.language = "fr-FR".to_string();
    let dir = std::env::temp_dir().join(format!("newscast-api-test-{}", Uuid::new_v4().simple()));
    let app = build_app_with(vec![recorder.clone()], defaults, &dir);

    let response = app
        .oneshot(synthesize_request(
            serde_json::json!({"text": "1234 5678 9012"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        recorder.seen_language.lock().unwrap().as_deref(),
        Some("fr-FR")
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_non_ascii_audio_dir_is_internal_error_not_panic() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    // The X-Audio-Path header cannot carry a non-ASCII path; the request
    // must fail cleanly instead of bringing the task down
    let dir = std::env::temp_dir().join(format!("newscast-audió-{}", Uuid::new_v4().simple()));
    let app = build_app_with(vec![primary], defaults(), &dir);

    let response = app
        .oneshot(synthesize_request(
            serde_json::json!({"text": "Hello, world!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_list_voices_filters_by_gender() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    let (app, _dir) = build_app(vec![primary]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tts/voices?gender=female")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let voices: Vec<Voice> = serde_json::from_slice(&body).unwrap();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].id, "kristy");
}

#[tokio::test]
async fn test_health_endpoint() {
    let primary: Arc<dyn TtsProvider> = Arc::new(StubProvider {
        tier: ProviderTier::Primary,
        response: Ok(b"audio".to_vec()),
    });
    let (app, _dir) = build_app(vec![primary]);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_defaults_parse_like_config_strings() {
    // The startup path parses these from env strings; keep them in sync
    assert_eq!(
        SynthesisModel::from_str("simba-english").unwrap(),
        SynthesisModel::SimbaEnglish
    );
    assert_eq!(AudioFormat::from_str("mp3").unwrap(), AudioFormat::Mp3);
}
