use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UploadUrlPayload {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileType")]
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub message: String,
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
    #[serde(rename = "s3Key")]
    pub s3_key: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}
