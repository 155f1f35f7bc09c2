use aws_sdk_secretsmanager::Client as SecretsClient;

use crate::error::SecretUnavailable;

/// Read the provider API key from Secrets Manager.
pub async fn fetch_api_key(
    client: &SecretsClient,
    secret_name: &str,
) -> Result<String, SecretUnavailable> {
    let response = client
        .get_secret_value()
        .secret_id(secret_name)
        .send()
        .await
        .map_err(|e| SecretUnavailable {
            name: secret_name.to_string(),
            message: e.to_string(),
        })?;

    match response.secret_string() {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(SecretUnavailable {
            name: secret_name.to_string(),
            message: "secret has no string value".to_string(),
        }),
    }
}
