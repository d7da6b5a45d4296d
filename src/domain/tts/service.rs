use super::dto::{SynthesisRequest, SynthesisResult};
use super::error::{ProviderFailure, TtsError};
use crate::infrastructure::audio::AudioSink;
use crate::infrastructure::providers::TtsProvider;
use std::sync::Arc;

/// Runs the provider fallback chain for one synthesis request.
///
/// Providers are tried strictly in the order given at construction
/// (primary, secondary, tertiary). A tier-local failure is logged, recorded
/// and the next tier runs; there are no retries within a tier and no
/// parallel racing. A local I/O failure from a provider stops the chain, and
/// a sink failure after a successful provider call is fatal to the whole
/// request and never triggers tier advancement.
pub struct TtsService {
    providers: Vec<Arc<dyn TtsProvider>>,
    sink: AudioSink,
}

impl TtsService {
    pub fn new(providers: Vec<Arc<dyn TtsProvider>>, sink: AudioSink) -> Self {
        Self { providers, sink }
    }

    /// Synthesize the request, falling through the chain until a provider
    /// produces audio.
    ///
    /// # Errors
    /// `TtsError::Io` when the audio file cannot be written,
    /// `TtsError::AllProvidersFailed` with per-tier causes in tier order
    /// when every provider fails.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, TtsError> {
        let start_time = std::time::Instant::now();
        let mut failures: Vec<ProviderFailure> = Vec::new();

        for provider in &self.providers {
            tracing::info!(
                tier = %provider.tier(),
                provider = provider.name(),
                text_length = request.text.len(),
                "Attempting synthesis"
            );

            match provider.synthesize(request).await {
                Ok(bytes) if bytes.is_empty() => {
                    tracing::warn!(
                        tier = %provider.tier(),
                        provider = provider.name(),
                        "Provider returned empty audio, advancing to next tier"
                    );
                    failures.push(ProviderFailure {
                        tier: provider.tier(),
                        cause: "provider returned empty audio".to_string(),
                    });
                }
                Ok(bytes) => {
                    let format = provider.effective_format(request.audio_format);
                    let file_path = self.sink.save(&bytes, format)?;

                    let duration = start_time.elapsed();
                    tracing::info!(
                        tier = %provider.tier(),
                        provider = provider.name(),
                        path = %file_path.display(),
                        audio_size_bytes = bytes.len(),
                        tiers_attempted = failures.len() + 1,
                        latency_ms = duration.as_millis(),
                        "Synthesis succeeded"
                    );

                    return Ok(SynthesisResult {
                        file_path,
                        provider: provider.tier(),
                    });
                }
                Err(err) if err.is_tier_local() => {
                    tracing::warn!(
                        tier = %provider.tier(),
                        provider = provider.name(),
                        error = %err,
                        "Provider failed, advancing to next tier"
                    );
                    failures.push(ProviderFailure {
                        tier: provider.tier(),
                        cause: err.to_string(),
                    });
                }
                Err(err) => {
                    // Local I/O failures are not a remote-tier problem; a
                    // later provider would hit the same disk, so stop here
                    tracing::error!(
                        tier = %provider.tier(),
                        provider = provider.name(),
                        error = %err,
                        "Provider failed with a non-recoverable error, stopping the chain"
                    );
                    failures.push(ProviderFailure {
                        tier: provider.tier(),
                        cause: err.to_string(),
                    });
                    break;
                }
            }
        }

        tracing::error!(
            tiers_attempted = failures.len(),
            "All providers failed"
        );

        Err(TtsError::AllProvidersFailed(failures))
    }
}
