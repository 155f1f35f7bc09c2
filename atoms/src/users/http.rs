use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{LoginPayload, RegisterPayload};
use super::service;
use super::store::CredentialStore;

fn json_response(status: StatusCode, body: serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.to_string().into())
        .map_err(Box::new)?)
}

/// HTTP Handler: POST /register
pub async fn register_handler(
    store: &dyn CredentialStore,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: RegisterPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("invalid request body: {}", e)}),
            )
        }
    };

    let (email, username, password) = match (payload.email, payload.username, payload.password) {
        (Some(e), Some(u), Some(p)) if !e.is_empty() && !u.is_empty() && !p.is_empty() => {
            (e, u, p)
        }
        _ => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "email, user and password are required"}),
            )
        }
    };

    match service::register(store, &email, &username, &password).await {
        Ok(issued) => json_response(
            StatusCode::CREATED,
            serde_json::json!({
                "message": "user registered",
                "token": issued.token,
                "user": issued.user,
            }),
        ),
        Err(e) if e == "email already registered" => {
            json_response(StatusCode::CONFLICT, serde_json::json!({"error": e}))
        }
        Err(e) => {
            tracing::error!("register failed: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({"error": "internal server error"}),
            )
        }
    }
}

/// HTTP Handler: POST /login
pub async fn login_handler(
    store: &dyn CredentialStore,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: LoginPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("invalid request body: {}", e)}),
            )
        }
    };

    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "email and password are required"}),
            )
        }
    };

    match service::login(store, &email, &password).await {
        Ok(issued) => json_response(
            StatusCode::OK,
            serde_json::json!({
                "message": "login successful",
                "token": issued.token,
                "user": issued.user,
            }),
        ),
        Err(e) if e == "invalid credentials" => {
            json_response(StatusCode::UNAUTHORIZED, serde_json::json!({"error": e}))
        }
        Err(e) => {
            tracing::error!("login failed: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({"error": "internal server error"}),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::store::MemoryCredentialStore;

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let store = MemoryCredentialStore::new();

        let body = br#"{"email":"a@example.com","user":"alex","password":"pw"}"#;
        let resp = register_handler(&store, body).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = login_handler(&store, br#"{"email":"a@example.com","password":"pw"}"#)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_missing_fields_is_bad_request() {
        let store = MemoryCredentialStore::new();
        let resp = register_handler(&store, br#"{"email":"a@example.com"}"#)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_bad_password_is_unauthorized() {
        let store = MemoryCredentialStore::new();
        register_handler(
            &store,
            br#"{"email":"a@example.com","user":"alex","password":"pw"}"#,
        )
        .await
        .unwrap();

        let resp = login_handler(&store, br#"{"email":"a@example.com","password":"no"}"#)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
