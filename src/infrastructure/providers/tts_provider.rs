use crate::domain::tts::{AudioFormat, ProviderTier, SynthesisRequest, TtsError, Voice};
use async_trait::async_trait;

/// One backend in the fallback chain.
///
/// Implementations are responsible for:
/// - Validating the request against the backend's supported parameter sets
/// - Refusing to touch the network without a configured credential
/// - Handling provider-specific text length limitations (batch splitting,
///   merging audio chunks in order)
///
/// They return raw audio bytes and never write to disk; persisting the audio
/// is the orchestrator's job via the audio sink.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Fixed position in the fallback order
    fn tier(&self) -> ProviderTier;

    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// The format the returned bytes will actually be in. Remote backends
    /// honor the requested format; the offline backend always produces WAV.
    fn effective_format(&self, requested: AudioFormat) -> AudioFormat {
        requested
    }

    /// Synthesize the request into audio bytes.
    ///
    /// # Errors
    /// `InvalidParameter` for empty text or parameters outside the backend's
    /// supported sets, `MissingCredential` when no API key is configured,
    /// `ProviderUnavailable` for network or non-2xx failures.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError>;
}

/// Read-only access to a provider's voice inventory.
#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    /// Fetch the full, materialized voice list.
    ///
    /// # Errors
    /// Fails with `MissingCredential`/`ProviderUnavailable` under the same
    /// conditions as a synthesis call.
    async fn list_voices(&self) -> Result<Vec<Voice>, TtsError>;
}
