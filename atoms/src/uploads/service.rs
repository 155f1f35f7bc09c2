use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;

/// Presigned upload URLs expire after five minutes.
pub const UPLOAD_URL_TTL_SECS: u64 = 300;

/// Derive a caller-scoped, collision-free object key for an upload.
/// The extension comes from the final dot in the client's file name; a name
/// without one gets "bin".
pub fn object_key_for(user_id: &str, file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(stem, ext)| if stem.is_empty() || ext.is_empty() { "bin" } else { ext })
        .unwrap_or("bin");
    format!("users/{}/{}.{}", user_id, uuid::Uuid::new_v4(), extension)
}

/// Presign a `put_object` for the derived key.
pub async fn presign_upload(
    client: &S3Client,
    bucket: &str,
    key: &str,
    content_type: &str,
) -> Result<String, String> {
    let presigning = PresigningConfig::expires_in(Duration::from_secs(UPLOAD_URL_TTL_SECS))
        .map_err(|e| format!("presigning config error: {}", e))?;

    let presigned = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| format!("S3 presign error: {}", e))?;

    Ok(presigned.uri().to_string())
}
