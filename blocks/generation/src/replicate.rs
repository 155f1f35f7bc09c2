use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::GenerationProvider;
use crate::types::{GenerationParams, JobStatus};

const REPLICATE_API_URL: &str = "https://api.replicate.com/v1/predictions";
// SDXL on Replicate
const REPLICATE_MODEL_VERSION: &str =
    "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

/// Replicate predictions API client.
pub struct ReplicateProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ReplicateProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: REPLICATE_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

#[derive(Serialize)]
struct CreatePredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
    num_outputs: u32,
}

#[derive(Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

fn status_of(prediction: &Prediction) -> Result<JobStatus, ProviderError> {
    match prediction.status.as_str() {
        "succeeded" => {
            let url = prediction
                .output
                .as_ref()
                .and_then(|urls| urls.first())
                .cloned()
                .ok_or_else(|| {
                    ProviderError::new("replicate", "succeeded prediction carries no output")
                })?;
            Ok(JobStatus::Complete { result_url: url })
        }
        "failed" | "canceled" => Ok(JobStatus::Failed {
            reason: prediction
                .error
                .clone()
                .unwrap_or_else(|| format!("prediction {}", prediction.status)),
        }),
        // starting / processing / queued
        _ => Ok(JobStatus::Pending),
    }
}

#[async_trait]
impl GenerationProvider for ReplicateProvider {
    fn name(&self) -> &'static str {
        "replicate"
    }

    async fn submit(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = CreatePredictionRequest {
            version: REPLICATE_MODEL_VERSION,
            input: PredictionInput {
                prompt,
                width: params.width,
                height: params.height,
                num_outputs: params.num_images,
            },
        };

        let response = self
            .http
            .post(&self.base_url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::new("replicate", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                "replicate",
                format!("submit returned HTTP {}: {}", status, body),
            ));
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| ProviderError::new("replicate", e.to_string()))?;

        Ok(prediction.id)
    }

    async fn poll(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, job_id))
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderError::new("replicate", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                "replicate",
                format!("poll returned HTTP {}: {}", status, body),
            ));
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| ProviderError::new("replicate", e.to_string()))?;

        status_of(&prediction)
    }
}
