use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position of a provider in the fallback chain.
/// The order is fixed and total: primary, then secondary, then tertiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTier {
    Primary,
    Secondary,
    Tertiary,
}

impl ProviderTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTier::Primary => "primary",
            ProviderTier::Secondary => "secondary",
            ProviderTier::Tertiary => "tertiary",
        }
    }
}

impl std::fmt::Display for ProviderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audio container formats the synthesis pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    Aac,
}

impl AudioFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Aac => "aac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Aac => "audio/aac",
        }
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "wav" => Ok(AudioFormat::Wav),
            "ogg" => Ok(AudioFormat::Ogg),
            "aac" => Ok(AudioFormat::Aac),
            other => Err(format!("unknown audio format: {}", other)),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Synthesis models across the provider chain. Each provider accepts only
/// the subset it actually serves and rejects or substitutes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthesisModel {
    #[serde(rename = "simba-english")]
    SimbaEnglish,
    #[serde(rename = "simba-multilingual")]
    SimbaMultilingual,
    #[serde(rename = "simba-turbo")]
    SimbaTurbo,
    #[serde(rename = "eleven_multilingual_v2")]
    ElevenMultilingualV2,
    #[serde(rename = "eleven_turbo_v2")]
    ElevenTurboV2,
}

impl SynthesisModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisModel::SimbaEnglish => "simba-english",
            SynthesisModel::SimbaMultilingual => "simba-multilingual",
            SynthesisModel::SimbaTurbo => "simba-turbo",
            SynthesisModel::ElevenMultilingualV2 => "eleven_multilingual_v2",
            SynthesisModel::ElevenTurboV2 => "eleven_turbo_v2",
        }
    }
}

impl std::str::FromStr for SynthesisModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simba-english" => Ok(SynthesisModel::SimbaEnglish),
            "simba-multilingual" => Ok(SynthesisModel::SimbaMultilingual),
            "simba-turbo" => Ok(SynthesisModel::SimbaTurbo),
            "eleven_multilingual_v2" => Ok(SynthesisModel::ElevenMultilingualV2),
            "eleven_turbo_v2" => Ok(SynthesisModel::ElevenTurboV2),
            other => Err(format!("unknown synthesis model: {}", other)),
        }
    }
}

impl std::fmt::Display for SynthesisModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audio post-processing switches forwarded to providers that support them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizationFlags {
    pub loudness: bool,
    pub text: bool,
}

impl Default for NormalizationFlags {
    fn default() -> Self {
        Self {
            loudness: true,
            text: true,
        }
    }
}

/// A single synthesis job. Built once per request and never mutated;
/// every provider in the chain sees the same values.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub model: SynthesisModel,
    pub audio_format: AudioFormat,
    /// BCP 47 locale, e.g. "en-US"
    pub language: String,
    pub normalization: NormalizationFlags,
}

/// Outcome of a successful run through the fallback chain. The file at
/// `file_path` exists and is non-empty when this value is handed to the
/// caller; its lifecycle belongs to the caller from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub file_path: PathBuf,
    pub provider: ProviderTier,
}
