use std::sync::Arc;

use atelier_atoms::uploads;
use atelier_atoms::users::{self, DynamoCredentialStore};
use atelier_shared::{auth, cors, AppConfig, AppState};
use generation_block as generation;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};

/// Main Lambda handler - routes requests to the auth, upload and generation
/// endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!("API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(cors::with_cors_headers(resp));
    }

    let config = AppConfig::from_env();
    let store = DynamoCredentialStore::new(state.dynamo_client.clone(), config.table_name.as_str());

    if path.starts_with("/register") {
        return match method {
            &Method::POST => {
                cors::finalize_response(users::http::register_handler(&store, body).await)
            }
            _ => cors::finalize_response(method_not_allowed()),
        };
    }

    if path.starts_with("/login") {
        return match method {
            &Method::POST => {
                cors::finalize_response(users::http::login_handler(&store, body).await)
            }
            _ => cors::finalize_response(method_not_allowed()),
        };
    }

    // Upload URL issuance authenticates inline: the bearer token scopes the
    // object key to its owner
    if path.starts_with("/upload-url") {
        if method != &Method::POST {
            return cors::finalize_response(method_not_allowed());
        }

        let auth_ctx = match auth::authenticate_bearer_request(&store, event.headers()).await {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(cors::with_cors_headers(resp)),
        };

        return cors::finalize_response(
            uploads::http::create_upload_url_handler(
                &state.s3_client,
                &config.generation.bucket_name,
                &auth_ctx.user_id,
                body,
            )
            .await,
        );
    }

    // Generation runs behind the gateway's custom authorizer; the body's
    // userId only names the stored output
    if path.starts_with("/generate") {
        if method != &Method::POST {
            return cors::finalize_response(method_not_allowed());
        }

        return cors::finalize_response(
            generation::http::generate_artwork_handler(
                &state.rekognition_client,
                &state.secrets_client,
                &state.s3_client,
                &state.http_client,
                &config.generation,
                body,
            )
            .await,
        );
    }

    tracing::warn!("No route matched - Method: {} Path: {}", method, path);
    cors::finalize_response(not_found())
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
