use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use trend_core::{Config, TrendFetcher};

/// The event carries no parameters; terms and window are fixed.
async fn function_handler(fetcher: &TrendFetcher, _event: Request) -> Result<Response<Body>, Error> {
    Ok(fetcher.handle().await.map(Body::from))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Built once per cold start and shared by every invocation.
    let config = Config::from_env()?;
    let fetcher = TrendFetcher::from_config(&config)?;

    run(service_fn(|event: Request| function_handler(&fetcher, event))).await
}
