use std::collections::HashMap;

use atelier_atoms::users::CredentialStore;
use lambda_http::http::{HeaderMap, StatusCode};
use lambda_http::{Body, Response};

/// Outcome of pulling a bearer credential out of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenExtraction {
    /// No authorization value anywhere the gateway might have put it.
    Missing,
    /// A value was present but is not `Bearer <token>`.
    Malformed,
    Token(String),
}

/// Normalize a raw authorization value: trim, require a case-insensitive
/// `Bearer ` prefix, and return the trimmed remainder.
pub fn extract_bearer(raw: Option<&str>) -> TokenExtraction {
    let raw = match raw {
        Some(value) => value.trim(),
        None => return TokenExtraction::Missing,
    };
    if raw.is_empty() {
        return TokenExtraction::Missing;
    }

    match raw.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => {
            let token = raw[7..].trim();
            if token.is_empty() {
                TokenExtraction::Malformed
            } else {
                TokenExtraction::Token(token.to_string())
            }
        }
        _ => TokenExtraction::Malformed,
    }
}

/// Extract the bearer token from HTTP headers. `HeaderMap` lookups are
/// already case-insensitive.
pub fn bearer_from_headers(headers: &HeaderMap) -> TokenExtraction {
    let raw = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    extract_bearer(raw)
}

/// Extract the bearer token from a plain header mapping (the authorizer
/// event's headers), matching the header name under any casing.
pub fn bearer_from_header_map(headers: &HashMap<String, String>) -> TokenExtraction {
    let raw = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.as_str());
    extract_bearer(raw)
}

/// The authenticated caller, as seen by handlers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub s3_folder: String,
}

fn unauthorized(message: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": message}).to_string().into())
        .expect("static response")
}

fn internal_error() -> Response<Body> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"error": "internal server error"})
                .to_string()
                .into(),
        )
        .expect("static response")
}

/// Authenticate a handler request from its headers. On failure the caller
/// returns the prepared response as-is.
pub async fn authenticate_bearer_request(
    store: &dyn CredentialStore,
    headers: &HeaderMap,
) -> Result<AuthContext, Response<Body>> {
    let token = match bearer_from_headers(headers) {
        TokenExtraction::Token(token) => token,
        TokenExtraction::Missing => return Err(unauthorized("missing bearer token")),
        TokenExtraction::Malformed => return Err(unauthorized("malformed authorization header")),
    };

    match store.find_by_token(&token).await {
        Ok(Some(record)) => Ok(AuthContext {
            user_id: record.user_id,
            email: record.email,
            s3_folder: record.s3_folder,
        }),
        Ok(None) => Err(unauthorized("invalid token")),
        Err(e) => {
            tracing::error!("token lookup failed: {}", e);
            Err(internal_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_atoms::users::{service, MemoryCredentialStore};
    use lambda_http::http::header::HeaderValue;

    #[test]
    fn bearer_prefix_is_case_insensitive_and_whitespace_tolerant() {
        for raw in ["bearer abc", "Bearer abc", "  BEARER   abc  "] {
            assert_eq!(
                extract_bearer(Some(raw)),
                TokenExtraction::Token("abc".to_string()),
                "failed for {:?}",
                raw
            );
        }
    }

    #[test]
    fn missing_and_malformed_values_are_distinguished() {
        assert_eq!(extract_bearer(None), TokenExtraction::Missing);
        assert_eq!(extract_bearer(Some("   ")), TokenExtraction::Missing);
        assert_eq!(extract_bearer(Some("Token abc")), TokenExtraction::Malformed);
        assert_eq!(extract_bearer(Some("Bearer")), TokenExtraction::Malformed);
        assert_eq!(extract_bearer(Some("Bearer    ")), TokenExtraction::Malformed);
    }

    #[test]
    fn header_map_lookup_ignores_key_casing() {
        let mut headers = HashMap::new();
        headers.insert("AUTHORIZATION".to_string(), "Bearer abc".to_string());
        assert_eq!(
            bearer_from_header_map(&headers),
            TokenExtraction::Token("abc".to_string())
        );

        let empty = HashMap::new();
        assert_eq!(bearer_from_header_map(&empty), TokenExtraction::Missing);
    }

    #[tokio::test]
    async fn known_token_authenticates_and_unknown_does_not() {
        let store = MemoryCredentialStore::new();
        let issued = service::register(&store, "a@example.com", "alex", "pw")
            .await
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", issued.token)).unwrap(),
        );
        let ctx = authenticate_bearer_request(&store, &headers)
            .await
            .unwrap();
        assert_eq!(ctx.user_id, issued.user.user_id);

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer nope"));
        let resp = authenticate_bearer_request(&store, &headers)
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized_without_lookup() {
        let store = MemoryCredentialStore::new();
        let resp = authenticate_bearer_request(&store, &HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
