use std::env;
use std::sync::Arc;

use atelier_atoms::users::DynamoCredentialStore;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing_subscriber::EnvFilter;

mod authorizer;
use authorizer::{authorize, AuthorizerRequest, AuthorizerResponse};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let aws_config = aws_config::load_from_env().await;
    let table_name =
        env::var("DYNAMODB_TABLE_NAME").unwrap_or_else(|_| "atelier-users".to_string());
    let store = Arc::new(DynamoCredentialStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        table_name,
    ));

    run(service_fn(move |event: LambdaEvent<AuthorizerRequest>| {
        let store = store.clone();
        async move {
            Ok::<AuthorizerResponse, Error>(authorize(store.as_ref(), &event.payload).await)
        }
    }))
    .await
}
