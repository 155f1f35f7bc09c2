use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_secretsmanager::Client as SecretsClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;
use crate::provider;
use crate::secrets;
use crate::service;
use crate::types::{GenerateArtworkPayload, GenerationConfig};

fn json_response(status: StatusCode, body: serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.to_string().into())
        .map_err(Box::new)?)
}

fn status_for(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::SubmissionFailed(_) | GenerateError::JobFailed(_) => {
            StatusCode::BAD_GATEWAY
        }
        GenerateError::PollingTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTTP Handler: POST /generate
///
/// The gateway authorizer already vetted the caller; `userId` in the body is
/// only used to name the stored output.
pub async fn generate_artwork_handler(
    rekognition: &RekognitionClient,
    secrets_client: &SecretsClient,
    s3: &S3Client,
    http: &reqwest::Client,
    config: &GenerationConfig,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: GenerateArtworkPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("invalid request body: {}", e)}),
            )
        }
    };

    let source_key = match payload.s3_key_to_analyze {
        Some(key) if !key.is_empty() => key,
        _ => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "missing parameter: s3KeyToAnalyze"}),
            )
        }
    };
    let user_id = payload.user_id.unwrap_or_else(|| "anonymous".to_string());

    let api_key = match secrets::fetch_api_key(secrets_client, &config.secret_name).await {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("{}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({"error": "configuration error: provider API key unavailable"}),
            );
        }
    };

    let provider = provider::from_config(config.provider, http.clone(), api_key);

    // API Gateway offers no disconnect signal; the token is wired for
    // embedded callers that have one
    let cancel = CancellationToken::new();

    match service::generate_artwork(
        rekognition,
        s3,
        http,
        provider.as_ref(),
        config,
        &source_key,
        &user_id,
        &cancel,
    )
    .await
    {
        Ok(artwork) => json_response(
            StatusCode::OK,
            serde_json::json!({
                "message": "artwork generated",
                "prompt_used": artwork.prompt,
                "artwork_ref": artwork.artwork_ref,
                "stored": artwork.stored,
            }),
        ),
        Err(e) => {
            tracing::error!("generation failed: {}", e);
            json_response(
                status_for(&e),
                serde_json::json!({"error": format!("artwork generation failed: {}", e)}),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn provider_failures_map_to_bad_gateway() {
        let submission =
            GenerateError::SubmissionFailed(ProviderError::new("leonardo", "HTTP 500"));
        let job = GenerateError::JobFailed("out of credits".to_string());
        assert_eq!(status_for(&submission), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&job), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err = GenerateError::PollingTimeout(Duration::from_secs(120));
        assert_eq!(status_for(&err), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn delivery_and_unexpected_failures_map_to_internal_error() {
        let delivery = GenerateError::DeliveryFailed("S3 put_object error".to_string());
        assert_eq!(status_for(&delivery), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_for(&GenerateError::Cancelled),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
