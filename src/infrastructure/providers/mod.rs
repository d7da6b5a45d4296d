pub mod batching;
pub mod elevenlabs;
pub mod espeak;
pub mod speechify;
pub mod tts_provider;

pub use elevenlabs::ElevenLabsProvider;
pub use espeak::EspeakProvider;
pub use speechify::SpeechifyProvider;
pub use tts_provider::{TtsProvider, VoiceCatalog};
