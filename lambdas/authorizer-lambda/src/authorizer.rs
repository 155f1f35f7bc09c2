use std::collections::HashMap;

use atelier_atoms::users::CredentialStore;
use atelier_shared::auth::{bearer_from_header_map, extract_bearer, TokenExtraction};
use serde::{Deserialize, Serialize};

/// Principal attached to deny decisions for absent, malformed or unknown
/// credentials.
pub const UNAUTHORIZED_PRINCIPAL: &str = "unauthorized";
/// Principal attached to deny decisions caused by a lookup failure. Lookup
/// errors never fail open.
pub const ERROR_PRINCIPAL: &str = "error";

/// Custom authorizer invocation. TOKEN-type events carry the credential in
/// `authorizationToken`; REQUEST-type events carry the raw header map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub method_arn: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Resource")]
    pub resource: String,
}

fn policy(principal_id: &str, effect: &str, resource: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal_id.to_string(),
        policy_document: PolicyDocument {
            version: "2012-10-17".to_string(),
            statement: vec![PolicyStatement {
                action: "execute-api:Invoke".to_string(),
                effect: effect.to_string(),
                resource: resource.to_string(),
            }],
        },
    }
}

/// Pull the credential from whichever location the gateway used. The
/// dedicated field wins when present; otherwise the header map is consulted
/// under any casing.
fn extract_token(request: &AuthorizerRequest) -> TokenExtraction {
    match extract_bearer(request.authorization_token.as_deref()) {
        TokenExtraction::Missing => match &request.headers {
            Some(headers) => bearer_from_header_map(headers),
            None => TokenExtraction::Missing,
        },
        other => other,
    }
}

/// Decide whether the presented credential belongs to a known user.
///
/// Read-only and idempotent: the gateway may cache allow decisions.
pub async fn authorize(
    store: &dyn CredentialStore,
    request: &AuthorizerRequest,
) -> AuthorizerResponse {
    let resource = request.method_arn.as_deref().unwrap_or("*");

    let token = match extract_token(request) {
        TokenExtraction::Token(token) => token,
        TokenExtraction::Missing | TokenExtraction::Malformed => {
            return policy(UNAUTHORIZED_PRINCIPAL, "Deny", resource);
        }
    };

    match store.find_by_token(&token).await {
        Ok(Some(record)) => policy(&record.user_id, "Allow", resource),
        Ok(None) => policy(UNAUTHORIZED_PRINCIPAL, "Deny", resource),
        Err(e) => {
            tracing::error!("credential lookup failed: {}", e);
            policy(ERROR_PRINCIPAL, "Deny", resource)
        }
    }
}
