use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;
use crate::poll;
use crate::prompt::{self, FALLBACK_PROMPT};
use crate::provider::GenerationProvider;
use crate::types::{DeliveryMode, GeneratedArtwork, GenerationConfig};

/// Run the whole generation flow for one uploaded image: derive a prompt,
/// submit a job, wait for it, deliver the result.
///
/// The job is submitted exactly once; once its identifier resolves to a
/// terminal state this function never re-submits it.
pub async fn generate_artwork(
    rekognition: &RekognitionClient,
    s3: &S3Client,
    http: &reqwest::Client,
    provider: &dyn GenerationProvider,
    config: &GenerationConfig,
    source_key: &str,
    user_id: &str,
    cancel: &CancellationToken,
) -> Result<GeneratedArtwork, GenerateError> {
    // Analysis is best-effort: any failure falls back to the fixed prompt
    let prompt = match prompt::derive_prompt(rekognition, &config.bucket_name, source_key).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("image analysis failed, using fallback prompt: {}", e);
            FALLBACK_PROMPT.to_string()
        }
    };

    let job_id = provider
        .submit(&prompt, &config.params)
        .await
        .map_err(GenerateError::SubmissionFailed)?;
    tracing::info!(
        provider = provider.name(),
        job_id,
        "generation job submitted"
    );

    let result_url = poll::await_completion(provider, &job_id, &config.poll, cancel).await?;

    let (artwork_ref, stored) = match config.delivery {
        DeliveryMode::Url => (result_url, false),
        DeliveryMode::Store => {
            let key = store_artwork(s3, http, &config.bucket_name, user_id, &result_url).await?;
            (key, true)
        }
    };

    Ok(GeneratedArtwork {
        prompt,
        artwork_ref,
        stored,
    })
}

/// Download the provider's result and persist it under the caller's folder.
async fn store_artwork(
    s3: &S3Client,
    http: &reqwest::Client,
    bucket: &str,
    user_id: &str,
    result_url: &str,
) -> Result<String, GenerateError> {
    let response = http
        .get(result_url)
        .send()
        .await
        .map_err(|e| GenerateError::DeliveryFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(GenerateError::DeliveryFailed(format!(
            "result download returned HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| GenerateError::DeliveryFailed(e.to_string()))?;

    let key = format!(
        "users/{}/processed/artwork-{}.jpg",
        user_id,
        uuid::Uuid::new_v4()
    );

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .content_type("image/jpeg")
        .body(ByteStream::from(bytes.to_vec()))
        .send()
        .await
        .map_err(|e| GenerateError::DeliveryFailed(format!("S3 put_object error: {}", e)))?;

    Ok(key)
}
