//! Vetgate error types

use std::time::Duration;

use crate::providers::cascade::AttemptRecord;

/// Vetgate error types
#[derive(Debug, thiserror::Error)]
pub enum VetgateError {
    // Caller-visible terminals
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no provider credential configured")]
    ProviderConfigMissing,

    /// Every model in the selected provider's cascade failed.
    #[error("all {} model(s) failed for provider '{provider}': {last_error}", .attempts.len())]
    CascadeExhausted {
        provider: String,
        attempts: Vec<AttemptRecord>,
        last_error: String,
    },

    // Per-attempt errors (recovered by advancing the cascade)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("unparsable model output: {0}")]
    Parse(String),

    // Local recoveries
    #[error("cache persistence failed: {0}")]
    Persistence(String),

    // Configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl VetgateError {
    /// Whether this error is one of the terminal errors a gateway caller
    /// can receive (`InvalidInput`, `ProviderConfigMissing`,
    /// `CascadeExhausted`).
    pub fn is_caller_visible(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::ProviderConfigMissing | Self::CascadeExhausted { .. }
        )
    }
}

/// Result type alias for Vetgate operations
pub type Result<T> = std::result::Result<T, VetgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_exhausted_message_carries_last_error() {
        let err = VetgateError::CascadeExhausted {
            provider: "openrouter".into(),
            attempts: vec![
                AttemptRecord::failed("m1", "HTTP error: boom"),
                AttemptRecord::failed("m2", "unparsable model output: missing field"),
            ],
            last_error: "unparsable model output: missing field".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("all 2 model(s)"));
        assert!(msg.contains("openrouter"));
        assert!(msg.ends_with("missing field"));
    }

    #[test]
    fn only_terminals_are_caller_visible() {
        assert!(VetgateError::InvalidInput("x".into()).is_caller_visible());
        assert!(VetgateError::ProviderConfigMissing.is_caller_visible());
        assert!(!VetgateError::EmptyResponse.is_caller_visible());
        assert!(!VetgateError::Persistence("down".into()).is_caller_visible());
    }
}
