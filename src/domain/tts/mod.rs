pub mod dto;
pub mod error;
pub mod language;
pub mod service;
pub mod voice;

pub use dto::{
    AudioFormat, NormalizationFlags, ProviderTier, SynthesisModel, SynthesisRequest,
    SynthesisResult,
};
pub use error::{ProviderFailure, TtsError};
pub use language::{detect_language, LanguageCode};
pub use service::TtsService;
pub use voice::{filter_voices, Gender, Voice, VoiceFilter};
