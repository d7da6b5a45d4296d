use crate::domain::tts::TtsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Text too large: {0}")]
    PayloadTooLarge(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::InvalidParameter(msg) => AppError::BadRequest(msg),
            TtsError::MissingCredential(_)
            | TtsError::ProviderUnavailable(_)
            | TtsError::AllProvidersFailed(_) => AppError::ExternalService(err.to_string()),
            TtsError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error
        let status = self.status_code();
        tracing::error!(
            error = %self,
            status = %status.as_u16(),
            "Request failed"
        );

        // Create simplified error response
        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tts::ProviderFailure;
    use crate::domain::tts::ProviderTier;

    #[test]
    fn test_aggregated_failure_maps_to_bad_gateway() {
        let err = AppError::from(TtsError::AllProvidersFailed(vec![ProviderFailure {
            tier: ProviderTier::Primary,
            cause: "down".into(),
        }]));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_io_failure_maps_to_internal() {
        let err = AppError::from(TtsError::Io(std::io::Error::other("disk full")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_parameter_maps_to_bad_request() {
        let err = AppError::from(TtsError::InvalidParameter("empty text".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
