use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::poll::PollSchedule;

#[derive(Debug, Deserialize)]
pub struct GenerateArtworkPayload {
    /// Key of the already-uploaded source image to analyze.
    #[serde(rename = "s3KeyToAnalyze")]
    pub s3_key_to_analyze: Option<String>,
    /// Used only to name the stored output, never for authorization.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Fixed parameters sent with every generation job.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
    pub public: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            num_images: 1,
            public: false,
        }
    }
}

/// Observed state of a generation job. Monotonic toward a terminal state:
/// once `Complete` or `Failed` is observed, polling stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Complete { result_url: String },
    Failed { reason: String },
}

/// Which external provider backs the generation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Leonardo,
    Replicate,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "leonardo" => Ok(ProviderKind::Leonardo),
            "replicate" => Ok(ProviderKind::Replicate),
            other => Err(format!("unknown generation provider: {}", other)),
        }
    }
}

/// How the finished artwork reaches the caller: the provider's result URL
/// as-is, or downloaded and stored under the caller's folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Url,
    Store,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "url" => Ok(DeliveryMode::Url),
            "store" => Ok(DeliveryMode::Store),
            other => Err(format!("unknown delivery mode: {}", other)),
        }
    }
}

/// Everything the generation flow needs beyond the injected clients.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub bucket_name: String,
    pub secret_name: String,
    pub provider: ProviderKind,
    pub delivery: DeliveryMode,
    pub params: GenerationParams,
    pub poll: PollSchedule,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedArtwork {
    pub prompt: String,
    /// Provider URL or S3 object key, depending on `stored`.
    pub artwork_ref: String,
    pub stored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("leonardo".parse::<ProviderKind>(), Ok(ProviderKind::Leonardo));
        assert_eq!("Replicate".parse::<ProviderKind>(), Ok(ProviderKind::Replicate));
        assert!("dalle".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn delivery_mode_parses_case_insensitively() {
        assert_eq!("url".parse::<DeliveryMode>(), Ok(DeliveryMode::Url));
        assert_eq!("STORE".parse::<DeliveryMode>(), Ok(DeliveryMode::Store));
        assert!("inline".parse::<DeliveryMode>().is_err());
    }

    #[test]
    fn generate_payload_reads_frontend_field_names() {
        let payload: GenerateArtworkPayload =
            serde_json::from_str(r#"{"s3KeyToAnalyze":"users/u/a.jpg","userId":"u"}"#).unwrap();
        assert_eq!(payload.s3_key_to_analyze.as_deref(), Some("users/u/a.jpg"));
        assert_eq!(payload.user_id.as_deref(), Some("u"));
    }
}
