use std::time::Duration;

use thiserror::Error;

/// A request to an external generation provider failed at the transport or
/// protocol level.
#[derive(Debug, Clone, Error)]
#[error("{provider} API error: {message}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Failure classes of the generation flow.
///
/// `AnalysisUnavailable` is recoverable (the flow continues with a fallback
/// prompt); everything else is terminal for the request.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("image analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    #[error("generation submit failed: {0}")]
    SubmissionFailed(ProviderError),

    #[error("generation did not reach a terminal state within {0:?}")]
    PollingTimeout(Duration),

    #[error("generation job failed: {0}")]
    JobFailed(String),

    #[error("failed to deliver generated artwork: {0}")]
    DeliveryFailed(String),

    #[error("generation cancelled")]
    Cancelled,
}

/// The provider API key could not be read from the secret store.
#[derive(Debug, Error)]
#[error("secret {name} unavailable: {message}")]
pub struct SecretUnavailable {
    pub name: String,
    pub message: String,
}
