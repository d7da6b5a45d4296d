use super::dto::ProviderTier;

/// What went wrong in one tier of the chain. Never persisted; it is logged
/// when the orchestrator advances and carried inside `AllProvidersFailed`
/// when the whole chain is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub tier: ProviderTier,
    pub cause: String,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tier, self.cause)
    }
}

/// Error taxonomy for the synthesis pipeline.
///
/// `MissingCredential`, `InvalidParameter` and `ProviderUnavailable` are
/// tier-local: the orchestrator records them and advances to the next
/// provider. `Io` and `AllProvidersFailed` terminate the request.
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("audio write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("all providers failed: {}", format_failures(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),
}

impl TtsError {
    /// Tier-local errors trigger fallback; everything else is fatal to the
    /// request.
    pub fn is_tier_local(&self) -> bool {
        matches!(
            self,
            TtsError::MissingCredential(_)
                | TtsError::InvalidParameter(_)
                | TtsError::ProviderUnavailable(_)
        )
    }
}

fn format_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
