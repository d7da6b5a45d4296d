use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    domain::tts::{
        detect_language, filter_voices, AudioFormat, Gender, NormalizationFlags, SynthesisModel,
        SynthesisRequest, TtsService, Voice, VoiceFilter,
    },
    error::{AppError, AppResult},
    infrastructure::providers::VoiceCatalog,
};

const MAX_TEXT_LENGTH: usize = 10_000;

/// Process-wide synthesis defaults, parsed once at startup. Every field can
/// be overridden per request.
#[derive(Debug, Clone)]
pub struct SynthesisDefaults {
    pub voice: String,
    pub model: SynthesisModel,
    pub format: AudioFormat,
    pub language: String,
}

/// Request for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness_normalization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_normalization: Option<bool>,
}

/// Query for GET /api/tts/voices
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    pub gender: Option<String>,
    pub locale: Option<String>,
    /// Comma-separated tag list; every tag must be present on a voice
    pub tags: Option<String>,
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
    catalog: Arc<dyn VoiceCatalog>,
    defaults: SynthesisDefaults,
}

impl TtsController {
    pub fn new(
        tts_service: Arc<TtsService>,
        catalog: Arc<dyn VoiceCatalog>,
        defaults: SynthesisDefaults,
    ) -> Self {
        Self {
            tts_service,
            catalog,
            defaults,
        }
    }

    fn build_request(&self, request: &TtsRequest) -> AppResult<SynthesisRequest> {
        let model = match &request.model {
            Some(raw) => SynthesisModel::from_str(raw).map_err(AppError::BadRequest)?,
            None => self.defaults.model,
        };
        let audio_format = match &request.format {
            Some(raw) => AudioFormat::from_str(raw).map_err(AppError::BadRequest)?,
            None => self.defaults.format,
        };
        // No locale supplied: detect from the text itself, falling back to
        // the configured default when detection is inconclusive
        let language = match &request.language {
            Some(locale) => locale.clone(),
            None => match detect_language(&request.text) {
                Some(detected) => {
                    tracing::info!(language = %detected, "Language detected from text");
                    detected.default_locale().to_string()
                }
                None => {
                    tracing::info!(
                        language = %self.defaults.language,
                        "Language detection inconclusive, using default"
                    );
                    self.defaults.language.clone()
                }
            },
        };
        let defaults = NormalizationFlags::default();

        Ok(SynthesisRequest {
            text: request.text.clone(),
            voice_id: request
                .voice
                .clone()
                .unwrap_or_else(|| self.defaults.voice.clone()),
            model,
            audio_format,
            language,
            normalization: NormalizationFlags {
                loudness: request.loudness_normalization.unwrap_or(defaults.loudness),
                text: request.text_normalization.unwrap_or(defaults.text),
            },
        })
    }

    /// POST /api/tts/synthesize - Convert text to speech and return the audio
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if request.text.trim().is_empty() {
            return Err(AppError::BadRequest("Text cannot be empty".to_string()));
        }
        if request.text.len() > MAX_TEXT_LENGTH {
            return Err(AppError::PayloadTooLarge(format!(
                "Text must be {} characters or less",
                MAX_TEXT_LENGTH
            )));
        }

        let synthesis_request = controller.build_request(&request)?;

        tracing::info!(
            voice = %synthesis_request.voice_id,
            model = %synthesis_request.model,
            format = %synthesis_request.audio_format,
            text_length = synthesis_request.text.len(),
            "TTS synthesis request"
        );

        let result = controller
            .tts_service
            .synthesize(&synthesis_request)
            .await
            .map_err(AppError::from)?;

        // The tertiary tier may produce a different container than requested;
        // trust the extension the chain actually wrote
        let written_format = result
            .file_path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| AudioFormat::from_str(e).ok())
            .unwrap_or(synthesis_request.audio_format);

        let audio_bytes = tokio::fs::read(&result.file_path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to read audio file: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(written_format.mime_type()),
        );
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!(
                "attachment; filename=news-summary.{}",
                written_format.extension()
            ))
            .map_err(|e| AppError::Internal(format!("invalid content disposition: {}", e)))?,
        );
        headers.insert(
            "X-Provider",
            HeaderValue::from_static(result.provider.as_str()),
        );
        // The audio path comes from operator configuration and may not be a
        // valid header value (non-ASCII directory names)
        headers.insert(
            "X-Audio-Path",
            HeaderValue::from_str(&result.file_path.display().to_string())
                .map_err(|e| AppError::Internal(format!("audio path is not a valid header value: {}", e)))?,
        );

        Ok((StatusCode::OK, headers, Body::from(audio_bytes)))
    }

    /// GET /api/tts/voices - List voices, optionally narrowed by
    /// gender/locale/tags
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
        Query(query): Query<VoiceQuery>,
    ) -> AppResult<Json<Vec<Voice>>> {
        let filter = VoiceFilter {
            gender: query
                .gender
                .as_deref()
                .map(Gender::from_str)
                .transpose()
                .map_err(AppError::BadRequest)?,
            locale: query.locale.clone(),
            tags: query.tags.as_deref().map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            }),
        };

        let voices = controller
            .catalog
            .list_voices()
            .await
            .map_err(AppError::from)?;

        Ok(Json(filter_voices(&voices, &filter)))
    }
}
