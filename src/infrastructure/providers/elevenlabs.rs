use super::batching::{clip_to_char_boundary, split_into_batches};
use super::tts_provider::TtsProvider;
use crate::domain::tts::{
    AudioFormat, ProviderTier, SynthesisModel, SynthesisRequest, TtsError,
};
use async_trait::async_trait;
use serde::Serialize;

const BASE_URL: &str = "https://api.elevenlabs.io";
const XI_API_KEY_HEADER: &str = "xi-api-key";

/// ElevenLabs caps input at 5000 characters per request
const MAX_BATCH_SIZE: usize = 5000;

/// Premade voice ids shipped with every ElevenLabs account
const PREMADE_VOICES: &[&str] = &[
    "21m00Tcm4TlvDq8ikWAM", // Rachel
    "AZnzlk1XvdvUeBnXmlld", // Domi
    "EXAVITQu4vr4xnSDxMaL", // Sarah
    "ErXwobaYiN019PkySvjV", // Antoni
    "JBFqnCBsd6RMkjVDRZzb", // George
    "MF3mGyEYCl7XYWbV9V6O", // Elli
    "TxGEqnHWrfWFTfGW9XjX", // Josh
    "onwK4e9ZLuTAKqWW03F9", // Daniel
    "pNInz6obpnDQGcFmaJgB", // Adam
];

/// Secondary provider: the ElevenLabs HTTP API.
///
/// Voice and model ids from another provider's namespace are substituted
/// with the configured defaults so that a request built for the primary
/// provider can still be spoken here.
pub struct ElevenLabsProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    default_voice: String,
    default_model: String,
    base_url: String,
}

#[derive(Serialize)]
struct SpeechRequestBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl ElevenLabsProvider {
    pub fn new(
        http: reqwest::Client,
        api_key: Option<String>,
        default_voice: String,
        default_model: String,
    ) -> Self {
        Self {
            http,
            api_key,
            default_voice,
            default_model,
            base_url: BASE_URL.to_string(),
        }
    }

    fn credential(&self) -> Result<&str, TtsError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TtsError::MissingCredential("ElevenLabs API key is not configured".to_string())
            })
    }

    fn validate(&self, request: &SynthesisRequest) -> Result<(), TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::InvalidParameter(
                "text must not be empty".to_string(),
            ));
        }
        // This client only requests mp3 output
        if request.audio_format != AudioFormat::Mp3 {
            return Err(TtsError::InvalidParameter(format!(
                "format '{}' is not supported by the ElevenLabs client",
                request.audio_format
            )));
        }
        Ok(())
    }

    /// Resolve the request voice into an ElevenLabs voice id, substituting
    /// the default when the request carries another provider's voice
    fn resolve_voice(&self, requested: &str) -> String {
        if PREMADE_VOICES.contains(&requested) {
            return requested.to_string();
        }
        tracing::debug!(
            requested = requested,
            substituted = %self.default_voice,
            "Voice is not an ElevenLabs id, using default"
        );
        self.default_voice.clone()
    }

    fn resolve_model(&self, requested: SynthesisModel) -> String {
        match requested {
            SynthesisModel::ElevenMultilingualV2 | SynthesisModel::ElevenTurboV2 => {
                requested.as_str().to_string()
            }
            other => {
                tracing::debug!(
                    requested = %other,
                    substituted = %self.default_model,
                    "Model is not an ElevenLabs id, using default"
                );
                self.default_model.clone()
            }
        }
    }

    /// Call the text-to-speech endpoint for a single text batch
    async fn call_elevenlabs(
        &self,
        api_key: &str,
        text: &str,
        voice: &str,
        model: &str,
    ) -> Result<Vec<u8>, TtsError> {
        tracing::info!(
            voice = voice,
            model = model,
            text_length = text.len(),
            text_preview = clip_to_char_boundary(text, 200),
            "Calling ElevenLabs text-to-speech API"
        );

        let body = SpeechRequestBody { text, model_id: model };

        let response = self
            .http
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, voice))
            .header(XI_API_KEY_HEADER, api_key)
            .query(&[("output_format", "mp3_44100_128")])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "ElevenLabs request failed");
                TtsError::ProviderUnavailable(format!("ElevenLabs request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                detail = %detail,
                "ElevenLabs returned an error response"
            );
            return Err(TtsError::ProviderUnavailable(format!(
                "ElevenLabs returned {}: {}",
                status, detail
            )));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read ElevenLabs audio stream");
                TtsError::ProviderUnavailable(format!("failed to read audio stream: {}", e))
            })?
            .to_vec();

        tracing::debug!(audio_size = audio_bytes.len(), "ElevenLabs audio received");

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(
        &self,
        api_key: &str,
        batches: &[String],
        voice: &str,
        model: &str,
    ) -> Result<Vec<u8>, TtsError> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.len(),
                "Synthesizing batch"
            );

            let audio_data = self.call_elevenlabs(api_key, batch, voice, model).await?;
            merged_audio.extend(audio_data);

            tracing::info!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }
}

#[async_trait]
impl TtsProvider for ElevenLabsProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Secondary
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        self.validate(request)?;
        let api_key = self.credential()?;

        let start_time = std::time::Instant::now();

        let voice = self.resolve_voice(&request.voice_id);
        let model = self.resolve_model(request.model);

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Text split into batches"
        );

        let audio_data = self
            .synthesize_batches(api_key, &batches, &voice, &model)
            .await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "elevenlabs",
            voice = %voice,
            model = %model,
            latency_ms = duration.as_millis(),
            characters_count = request.text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tts::NormalizationFlags;

    fn request(text: &str, format: AudioFormat) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_id: "scott".to_string(),
            model: SynthesisModel::SimbaEnglish,
            audio_format: format,
            language: "en-US".to_string(),
            normalization: NormalizationFlags::default(),
        }
    }

    fn provider(api_key: Option<&str>) -> ElevenLabsProvider {
        ElevenLabsProvider::new(
            reqwest::Client::new(),
            api_key.map(|k| k.to_string()),
            "JBFqnCBsd6RMkjVDRZzb".to_string(),
            "eleven_multilingual_v2".to_string(),
        )
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_credential_check() {
        let provider = provider(None);
        let err = provider
            .synthesize(&request("", AudioFormat::Mp3))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = provider(None);
        let err = provider
            .synthesize(&request("Hello, world!", AudioFormat::Mp3))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_non_mp3_format_is_invalid_parameter() {
        let provider = provider(Some("key"));
        let err = provider
            .synthesize(&request("Hello", AudioFormat::Ogg))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::InvalidParameter(_)));
    }

    #[test]
    fn test_resolve_voice_keeps_premade_ids() {
        let provider = provider(Some("key"));
        assert_eq!(
            provider.resolve_voice("pNInz6obpnDQGcFmaJgB"),
            "pNInz6obpnDQGcFmaJgB"
        );
    }

    #[test]
    fn test_resolve_voice_substitutes_foreign_ids() {
        let provider = provider(Some("key"));
        assert_eq!(provider.resolve_voice("scott"), "JBFqnCBsd6RMkjVDRZzb");
    }

    #[test]
    fn test_resolve_model_substitutes_foreign_models() {
        let provider = provider(Some("key"));
        assert_eq!(
            provider.resolve_model(SynthesisModel::SimbaEnglish),
            "eleven_multilingual_v2"
        );
        assert_eq!(
            provider.resolve_model(SynthesisModel::ElevenTurboV2),
            "eleven_turbo_v2"
        );
    }
}
