use async_trait::async_trait;

use crate::error::ProviderError;
use crate::leonardo::LeonardoProvider;
use crate::replicate::ReplicateProvider;
use crate::types::{GenerationParams, JobStatus, ProviderKind};

/// An external image-generation provider with an asynchronous job lifecycle.
///
/// `submit` starts a job and returns the provider's opaque identifier;
/// `poll` reports the job's current status. Implementations must be safe to
/// poll repeatedly for the same identifier.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;

    async fn poll(&self, job_id: &str) -> Result<JobStatus, ProviderError>;
}

/// Build the configured provider. Provider choice is configuration, not code.
pub fn from_config(
    kind: ProviderKind,
    http: reqwest::Client,
    api_key: String,
) -> Box<dyn GenerationProvider> {
    match kind {
        ProviderKind::Leonardo => Box::new(LeonardoProvider::new(http, api_key)),
        ProviderKind::Replicate => Box::new(ReplicateProvider::new(http, api_key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_selects_the_provider_variant() {
        let http = reqwest::Client::new();
        let leonardo = from_config(ProviderKind::Leonardo, http.clone(), "k".into());
        let replicate = from_config(ProviderKind::Replicate, http, "k".into());
        assert_eq!(leonardo.name(), "leonardo");
        assert_eq!(replicate.name(), "replicate");
    }
}
