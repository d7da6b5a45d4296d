use super::tts_provider::TtsProvider;
use crate::domain::tts::{
    AudioFormat, LanguageCode, ProviderTier, SynthesisRequest, TtsError,
};
use async_trait::async_trait;
use tokio::process::Command;

/// Tertiary provider: local `espeak-ng` synthesis.
///
/// Offline and last in the chain, it takes only the text and a coarse
/// language hint; voice, model and format fine-tuning are ignored and the
/// output is always WAV. It fails only on empty text or a local I/O error
/// (binary missing, subprocess failure).
pub struct EspeakProvider {
    binary: String,
}

impl EspeakProvider {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }

    /// Check whether the configured binary can be spawned at all.
    /// Used by the readiness probe.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn language_hint(request: &SynthesisRequest) -> &'static str {
        LanguageCode::from_locale(&request.language)
            .unwrap_or(LanguageCode::English)
            .espeak_voice()
    }

    /// The `--` terminator keeps text starting with a dash from being
    /// parsed as an option
    fn command_args<'a>(voice: &'a str, text: &'a str) -> [&'a str; 5] {
        ["--stdout", "-v", voice, "--", text]
    }
}

#[async_trait]
impl TtsProvider for EspeakProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Tertiary
    }

    fn name(&self) -> &'static str {
        "espeak"
    }

    fn effective_format(&self, _requested: AudioFormat) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::InvalidParameter(
                "text must not be empty".to_string(),
            ));
        }

        let voice = Self::language_hint(request);

        tracing::info!(
            binary = %self.binary,
            voice = voice,
            text_length = request.text.len(),
            "Running espeak-ng"
        );

        let start_time = std::time::Instant::now();

        let output = Command::new(&self.binary)
            .args(Self::command_args(voice, &request.text))
            .output()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, binary = %self.binary, "Failed to spawn espeak-ng");
                TtsError::Io(e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                "espeak-ng exited with an error"
            );
            return Err(TtsError::Io(std::io::Error::other(format!(
                "espeak-ng exited with {}: {}",
                output.status, stderr
            ))));
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "espeak",
            voice = voice,
            latency_ms = duration.as_millis(),
            characters_count = request.text.len(),
            audio_size_bytes = output.stdout.len(),
            "TTS synthesis completed"
        );

        Ok(output.stdout)
    }
}
