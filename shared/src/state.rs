use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_secretsmanager::Client as SecretsClient;

/// All collaborator clients, constructed once in `main` and injected into
/// handlers. No module-level globals; tests substitute fakes at the trait
/// seams instead of replacing clients.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub rekognition_client: RekognitionClient,
    pub secrets_client: SecretsClient,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            dynamo_client: DynamoClient::new(config),
            s3_client: S3Client::new(config),
            rekognition_client: RekognitionClient::new(config),
            secrets_client: SecretsClient::new(config),
            http_client: reqwest::Client::new(),
        }
    }
}
