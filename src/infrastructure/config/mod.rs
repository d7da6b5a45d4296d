use serde::Deserialize;
use std::env;

/// Process-wide configuration. This is the only place that reads the
/// environment; everything downstream gets explicit values.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Provider credentials (a missing key disables that tier)
    pub speechify_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_default_voice: String,
    pub elevenlabs_default_model: String,
    pub espeak_binary: String,
    // Synthesis defaults, each overridable per request
    pub default_voice: String,
    pub default_model: String,
    pub default_format: String,
    pub default_language: String,
    pub output_dir: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            speechify_api_key: env::var("SPEECHIFY_API_KEY").ok().filter(|k| !k.is_empty()),
            elevenlabs_api_key: env::var("ELEVENLABS_API_KEY").ok().filter(|k| !k.is_empty()),
            elevenlabs_default_voice: env::var("ELEVENLABS_DEFAULT_VOICE")
                .unwrap_or_else(|_| "JBFqnCBsd6RMkjVDRZzb".to_string()),
            elevenlabs_default_model: env::var("ELEVENLABS_DEFAULT_MODEL")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            espeak_binary: env::var("ESPEAK_BINARY").unwrap_or_else(|_| "espeak-ng".to_string()),
            default_voice: env::var("DEFAULT_VOICE").unwrap_or_else(|_| "scott".to_string()),
            default_model: env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| "simba-english".to_string()),
            default_format: env::var("DEFAULT_AUDIO_FORMAT").unwrap_or_else(|_| "mp3".to_string()),
            default_language: env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en-US".to_string()),
            output_dir: env::var("AUDIO_OUTPUT_DIR").unwrap_or_else(|_| "audio".to_string()),
            request_timeout_secs: env::var("TTS_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
