use std::sync::Arc;

use atelier_shared::AppState;
use lambda_http::{run, service_fn, Error};
use tracing_subscriber::EnvFilter;

mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        // Lambda log lines already carry timestamps
        .without_time()
        .init();

    let aws_config = aws_config::load_from_env().await;
    let state = Arc::new(AppState::new(&aws_config));

    run(service_fn(move |event| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
