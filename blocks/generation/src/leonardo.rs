use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::GenerationProvider;
use crate::types::{GenerationParams, JobStatus};

const LEONARDO_API_URL: &str = "https://cloud.leonardo.ai/api/v1/generations";
const LEONARDO_MODEL_ID: &str = "6bef9f1b-29cb-40c7-b9c3-32e6503d297d";

/// Leonardo.Ai generations API client.
pub struct LeonardoProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LeonardoProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: LEONARDO_API_URL.to_string(),
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
struct CreateGenerationRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "modelId")]
    model_id: &'a str,
    width: u32,
    height: u32,
    num_images: u32,
    public: bool,
}

#[derive(Deserialize)]
struct CreateGenerationResponse {
    #[serde(rename = "sdGenerationJob")]
    sd_generation_job: SdGenerationJob,
}

#[derive(Deserialize)]
struct SdGenerationJob {
    #[serde(rename = "generationId")]
    generation_id: String,
}

#[derive(Deserialize)]
struct GenerationStatusResponse {
    #[serde(default)]
    generations_v2: Vec<GenerationRecord>,
}

#[derive(Deserialize)]
struct GenerationRecord {
    status: String,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: String,
}

fn status_of(record: &GenerationRecord) -> Result<JobStatus, ProviderError> {
    match record.status.as_str() {
        "COMPLETE" => {
            let url = record
                .generated_images
                .first()
                .map(|img| img.url.clone())
                .ok_or_else(|| {
                    ProviderError::new("leonardo", "complete generation carries no images")
                })?;
            Ok(JobStatus::Complete { result_url: url })
        }
        "FAILED" => Ok(JobStatus::Failed {
            reason: "generation reported FAILED".to_string(),
        }),
        // PENDING and anything the API adds later keep us polling
        _ => Ok(JobStatus::Pending),
    }
}

#[async_trait]
impl GenerationProvider for LeonardoProvider {
    fn name(&self) -> &'static str {
        "leonardo"
    }

    async fn submit(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = CreateGenerationRequest {
            prompt,
            model_id: LEONARDO_MODEL_ID,
            width: params.width,
            height: params.height,
            num_images: params.num_images,
            public: params.public,
        };

        let response = self
            .http
            .post(&self.base_url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::new("leonardo", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                "leonardo",
                format!("submit returned HTTP {}: {}", status, body),
            ));
        }

        let created: CreateGenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new("leonardo", e.to_string()))?;

        Ok(created.sd_generation_job.generation_id)
    }

    async fn poll(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, job_id))
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderError::new("leonardo", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                "leonardo",
                format!("poll returned HTTP {}: {}", status, body),
            ));
        }

        let parsed: GenerationStatusResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new("leonardo", e.to_string()))?;

        match parsed.generations_v2.first() {
            Some(record) => status_of(record),
            // The job exists but has not materialized yet
            None => Ok(JobStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_response_parses_generation_id() {
        let json = r#"{"sdGenerationJob":{"generationId":"gen-123","apiCreditCost":11}}"#;
        let parsed: CreateGenerationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sd_generation_job.generation_id, "gen-123");
    }

    #[test]
    fn complete_status_yields_the_first_image_url() {
        let json = r#"{"generations_v2":[{"status":"COMPLETE","generated_images":[{"url":"https://cdn.example/a.jpg"},{"url":"https://cdn.example/b.jpg"}]}]}"#;
        let parsed: GenerationStatusResponse = serde_json::from_str(json).unwrap();
        let status = status_of(&parsed.generations_v2[0]).unwrap();
        assert_eq!(
            status,
            JobStatus::Complete {
                result_url: "https://cdn.example/a.jpg".to_string()
            }
        );
    }

    #[test]
    fn failed_status_is_terminal() {
        let json = r#"{"generations_v2":[{"status":"FAILED"}]}"#;
        let parsed: GenerationStatusResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            status_of(&parsed.generations_v2[0]).unwrap(),
            JobStatus::Failed { .. }
        ));
    }

    #[test]
    fn pending_and_unknown_statuses_keep_polling() {
        for status in ["PENDING", "SOMETHING_NEW"] {
            let record = GenerationRecord {
                status: status.to_string(),
                generated_images: vec![],
            };
            assert_eq!(status_of(&record).unwrap(), JobStatus::Pending);
        }
    }

    #[test]
    fn complete_without_images_is_a_provider_error() {
        let record = GenerationRecord {
            status: "COMPLETE".to_string(),
            generated_images: vec![],
        };
        assert!(status_of(&record).is_err());
    }
}
