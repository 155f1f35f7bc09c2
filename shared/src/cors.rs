use lambda_http::http::header::HeaderValue;
use lambda_http::{Body, Error, Response};

/// Decorate a response with the permissive CORS headers every endpoint
/// returns.
pub fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    resp
}

pub fn finalize_response(
    resp: Result<Response<Body>, Error>,
) -> Result<Response<Body>, Error> {
    resp.map(with_cors_headers)
}
