use super::batching::{clip_to_char_boundary, split_into_batches};
use super::tts_provider::{TtsProvider, VoiceCatalog};
use crate::domain::tts::{
    Gender, ProviderTier, SynthesisModel, SynthesisRequest, TtsError, Voice,
};
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const BASE_URL: &str = "https://api.sws.speechify.com";

/// Speechify rejects inputs over 2000 characters per request
const MAX_BATCH_SIZE: usize = 2000;

/// Shared voices available on every Speechify plan. Requests for voices
/// outside this set fail fast instead of burning a network call.
const KNOWN_VOICES: &[&str] = &[
    "scott", "george", "henry", "oliver", "jesse", "joe", "kristy", "lisa", "emily", "julie",
];

/// Primary provider: the Speechify HTTP API.
pub struct SpeechifyProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct SpeechOptions {
    loudness_normalization: bool,
    text_normalization: bool,
}

#[derive(Serialize)]
struct SpeechRequestBody<'a> {
    input: &'a str,
    voice_id: &'a str,
    model: &'a str,
    audio_format: &'a str,
    language: &'a str,
    options: SpeechOptions,
}

#[derive(Deserialize)]
struct SpeechResponseBody {
    audio_data: String,
}

#[derive(Deserialize)]
struct CatalogVoice {
    id: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    models: Vec<CatalogModel>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogModel {
    #[serde(default)]
    languages: Vec<CatalogLanguage>,
}

#[derive(Deserialize)]
struct CatalogLanguage {
    locale: String,
}

impl SpeechifyProvider {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    fn credential(&self) -> Result<&str, TtsError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TtsError::MissingCredential("Speechify API key is not configured".to_string())
            })
    }

    fn validate(&self, request: &SynthesisRequest) -> Result<(), TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::InvalidParameter(
                "text must not be empty".to_string(),
            ));
        }
        if !KNOWN_VOICES.contains(&request.voice_id.as_str()) {
            return Err(TtsError::InvalidParameter(format!(
                "voice '{}' is not a Speechify voice",
                request.voice_id
            )));
        }
        match request.model {
            SynthesisModel::SimbaEnglish
            | SynthesisModel::SimbaMultilingual
            | SynthesisModel::SimbaTurbo => Ok(()),
            other => Err(TtsError::InvalidParameter(format!(
                "model '{}' is not a Speechify model",
                other
            ))),
        }
        // All four audio formats are supported, nothing to check there.
    }

    /// Call the speech endpoint for a single text batch
    async fn call_speechify(
        &self,
        api_key: &str,
        text: &str,
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, TtsError> {
        tracing::info!(
            voice = %request.voice_id,
            model = %request.model,
            audio_format = %request.audio_format,
            language = %request.language,
            text_length = text.len(),
            text_preview = clip_to_char_boundary(text, 200),
            "Calling Speechify speech API"
        );

        let body = SpeechRequestBody {
            input: text,
            voice_id: &request.voice_id,
            model: request.model.as_str(),
            audio_format: request.audio_format.extension(),
            language: &request.language,
            options: SpeechOptions {
                loudness_normalization: request.normalization.loudness,
                text_normalization: request.normalization.text,
            },
        };

        let response = self
            .http
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Speechify request failed");
                TtsError::ProviderUnavailable(format!("Speechify request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                detail = %detail,
                "Speechify returned an error response"
            );
            return Err(TtsError::ProviderUnavailable(format!(
                "Speechify returned {}: {}",
                status, detail
            )));
        }

        let payload: SpeechResponseBody = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode Speechify response body");
            TtsError::ProviderUnavailable(format!("invalid Speechify response: {}", e))
        })?;

        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.audio_data.as_bytes())
            .map_err(|e| {
                tracing::error!(error = %e, "Speechify audio_data is not valid base64");
                TtsError::ProviderUnavailable(format!("invalid Speechify audio payload: {}", e))
            })?;

        tracing::debug!(audio_size = audio_bytes.len(), "Speechify audio decoded");

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(
        &self,
        api_key: &str,
        batches: &[String],
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, TtsError> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.len(),
                "Synthesizing batch"
            );

            let audio_data = self.call_speechify(api_key, batch, request).await?;
            merged_audio.extend(audio_data);

            tracing::info!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }

    fn parse_voice(entry: CatalogVoice) -> Voice {
        let gender = entry
            .gender
            .as_deref()
            .and_then(|g| Gender::from_str(g).ok())
            .unwrap_or(Gender::Neutral);
        let locale = entry
            .models
            .iter()
            .flat_map(|m| m.languages.iter())
            .map(|l| l.locale.clone())
            .next()
            .unwrap_or_else(|| "en-US".to_string());

        Voice {
            id: entry.id,
            gender,
            locale,
            tags: entry.tags.into_iter().collect(),
        }
    }
}

#[async_trait]
impl TtsProvider for SpeechifyProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Primary
    }

    fn name(&self) -> &'static str {
        "speechify"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        self.validate(request)?;
        let api_key = self.credential()?;

        let start_time = std::time::Instant::now();

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Text split into batches"
        );

        let audio_data = self.synthesize_batches(api_key, &batches, request).await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "speechify",
            latency_ms = duration.as_millis(),
            characters_count = request.text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

#[async_trait]
impl VoiceCatalog for SpeechifyProvider {
    async fn list_voices(&self) -> Result<Vec<Voice>, TtsError> {
        let api_key = self.credential()?;

        let response = self
            .http
            .get(format!("{}/v1/voices", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Speechify voice listing failed");
                TtsError::ProviderUnavailable(format!("Speechify voice listing failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TtsError::ProviderUnavailable(format!(
                "Speechify returned {}: {}",
                status, detail
            )));
        }

        let entries: Vec<CatalogVoice> = response.json().await.map_err(|e| {
            TtsError::ProviderUnavailable(format!("invalid Speechify voice list: {}", e))
        })?;

        let voices: Vec<Voice> = entries.into_iter().map(Self::parse_voice).collect();
        tracing::info!(voice_count = voices.len(), "Speechify voice list fetched");

        Ok(voices)
    }
}
