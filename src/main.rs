use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newscast_backend::controllers::health::ReadinessState;
use newscast_backend::controllers::tts::{SynthesisDefaults, TtsController};
use newscast_backend::domain::tts::{AudioFormat, SynthesisModel, TtsService};
use newscast_backend::infrastructure::audio::AudioSink;
use newscast_backend::infrastructure::config::{Config, LogFormat};
use newscast_backend::infrastructure::http::{build_router, start_http_server};
use newscast_backend::infrastructure::providers::{
    ElevenLabsProvider, EspeakProvider, SpeechifyProvider, TtsProvider, VoiceCatalog,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Newscast Backend on {}:{}",
        config.host,
        config.port
    );

    tracing::info!(
        speechify_configured = config.speechify_api_key.is_some(),
        elevenlabs_configured = config.elevenlabs_api_key.is_some(),
        espeak_binary = %config.espeak_binary,
        "Provider credential check"
    );

    // Shared HTTP client with the per-request deadline for remote providers
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate providers in fallback order (inject credentials)
    tracing::info!("Instantiating TTS providers...");
    let speechify = Arc::new(SpeechifyProvider::new(
        http.clone(),
        config.speechify_api_key.clone(),
    ));
    let elevenlabs = Arc::new(ElevenLabsProvider::new(
        http.clone(),
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_default_voice.clone(),
        config.elevenlabs_default_model.clone(),
    ));
    let espeak = Arc::new(EspeakProvider::new(config.espeak_binary.clone()));

    if !espeak.is_available().await {
        tracing::warn!(
            binary = %config.espeak_binary,
            "Offline TTS binary not found; the tertiary tier will fail"
        );
    }

    let providers: Vec<Arc<dyn TtsProvider>> =
        vec![speechify.clone(), elevenlabs.clone(), espeak.clone()];

    // 2. Instantiate the sink and the fallback chain service
    tracing::info!("Instantiating services...");
    let sink = AudioSink::new(&config.output_dir);
    let tts_service = Arc::new(TtsService::new(providers, sink));

    let defaults = SynthesisDefaults {
        voice: config.default_voice.clone(),
        model: SynthesisModel::from_str(&config.default_model)?,
        format: AudioFormat::from_str(&config.default_format)?,
        language: config.default_language.clone(),
    };

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(
        tts_service,
        speechify.clone() as Arc<dyn VoiceCatalog>,
        defaults,
    ));
    let readiness = Arc::new(ReadinessState {
        espeak,
        speechify_configured: config.speechify_api_key.is_some(),
        elevenlabs_configured: config.elevenlabs_api_key.is_some(),
    });

    // Start HTTP server with all routes
    let app = build_router(tts_controller, readiness);
    start_http_server(Arc::new(config), app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newscast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newscast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
