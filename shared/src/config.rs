use std::env;
use std::time::Duration;

use generation_block::{
    DeliveryMode, GenerationConfig, GenerationParams, PollSchedule, ProviderKind,
};

/// Deployment configuration, read from the environment once per request.
/// Every knob has a default so local runs work without a full environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub table_name: String,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let table_name =
            env::var("DYNAMODB_TABLE_NAME").unwrap_or_else(|_| "atelier-users".to_string());
        let bucket_name =
            env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "atelier-user-images".to_string());
        let secret_name = env::var("EXTERNAL_SECRET_NAME")
            .unwrap_or_else(|_| "atelier/generation-api-key".to_string());

        let provider = parsed_var("GENERATION_PROVIDER", ProviderKind::Leonardo);
        let delivery = parsed_var("GENERATION_DELIVERY", DeliveryMode::Url);

        let poll = PollSchedule {
            initial_delay: duration_var("GENERATION_INITIAL_DELAY_SECS", 10),
            interval: duration_var("GENERATION_POLL_INTERVAL_SECS", 5),
            timeout: duration_var("GENERATION_TIMEOUT_SECS", 120),
        };

        Self {
            table_name,
            generation: GenerationConfig {
                bucket_name,
                secret_name,
                provider,
                delivery,
                params: GenerationParams::default(),
                poll,
            },
        }
    }
}

fn parsed_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("ignoring {}: {}", name, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn duration_var(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_vars_fall_back_to_defaults() {
        assert_eq!(
            duration_var("ATELIER_TEST_UNSET_DURATION", 7),
            Duration::from_secs(7)
        );
        assert_eq!(
            parsed_var("ATELIER_TEST_UNSET_PROVIDER", ProviderKind::Leonardo),
            ProviderKind::Leonardo
        );
    }

    #[test]
    fn set_vars_override_defaults() {
        env::set_var("ATELIER_TEST_SET_DURATION", "42");
        assert_eq!(
            duration_var("ATELIER_TEST_SET_DURATION", 7),
            Duration::from_secs(42)
        );

        env::set_var("ATELIER_TEST_SET_PROVIDER", "replicate");
        assert_eq!(
            parsed_var("ATELIER_TEST_SET_PROVIDER", ProviderKind::Leonardo),
            ProviderKind::Replicate
        );
    }

    #[test]
    fn garbage_values_fall_back_to_defaults() {
        env::set_var("ATELIER_TEST_BAD_DURATION", "soon");
        assert_eq!(
            duration_var("ATELIER_TEST_BAD_DURATION", 7),
            Duration::from_secs(7)
        );

        env::set_var("ATELIER_TEST_BAD_DELIVERY", "carrier-pigeon");
        assert_eq!(
            parsed_var("ATELIER_TEST_BAD_DELIVERY", DeliveryMode::Url),
            DeliveryMode::Url
        );
    }
}
