use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{UploadUrlPayload, UploadUrlResponse};
use super::service::{object_key_for, presign_upload, UPLOAD_URL_TTL_SECS};

/// HTTP Handler: POST /upload-url
///
/// The caller is already authenticated; `user_id` scopes the object key.
pub async fn create_upload_url_handler(
    client: &S3Client,
    bucket: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UploadUrlPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": format!("invalid request body: {}", e)})
                        .to_string()
                        .into(),
                )
                .map_err(Box::new)?)
        }
    };

    let file_name = match payload.file_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": "missing parameter: fileName"})
                        .to_string()
                        .into(),
                )
                .map_err(Box::new)?)
        }
    };
    let content_type = payload
        .file_type
        .unwrap_or_else(|| "image/jpeg".to_string());

    let s3_key = object_key_for(user_id, &file_name);

    match presign_upload(client, bucket, &s3_key, &content_type).await {
        Ok(upload_url) => {
            let response = UploadUrlResponse {
                message: "upload URL issued".to_string(),
                upload_url,
                s3_key,
                expires_in: UPLOAD_URL_TTL_SECS,
            };
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::to_string(&response)?.into())
                .map_err(Box::new)?)
        }
        Err(e) => {
            tracing::error!("presign failed for {}: {}", s3_key, e);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": "internal server error"})
                        .to_string()
                        .into(),
                )
                .map_err(Box::new)?)
        }
    }
}
