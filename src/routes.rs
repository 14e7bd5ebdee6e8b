use axum::{body::Body, response::IntoResponse, routing::get, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use trend_core::TrendFetcher;

pub fn router(fetcher: TrendFetcher) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/trends", get(get_trends))
        .route("/trends", get(get_trends))
        .layer(cors)
        .layer(Extension(fetcher))
}

async fn get_trends(Extension(fetcher): Extension<TrendFetcher>) -> impl IntoResponse {
    fetcher.handle().await.map(Body::from)
}
