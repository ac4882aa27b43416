use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cryptopulse_backend::{build_router, config::AppConfig, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Point every upstream at the same base URL, each behind its own prefix
pub fn single_upstream_config(base_url: &str) -> AppConfig {
    AppConfig {
        upbit_base_url: format!("{}/upbit/v1", base_url),
        binance_base_url: format!("{}/binance/api/v3", base_url),
        coingecko_base_url: format!("{}/coingecko/api/v3", base_url),
        cryptocompare_base_url: format!("{}/cryptocompare/data/v2", base_url),
        reddit_base_url: format!("{}/reddit", base_url),
        fear_greed_base_url: format!("{}/alternative", base_url),
        ..AppConfig::default()
    }
}

/// Router wired so every upstream lives under the mock `server`
pub fn build_test_router(server: &mockito::ServerGuard) -> Router {
    let config = single_upstream_config(&server.url());
    build_router(AppState::from_config(&config))
}

/// Issue a GET and decode the JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}
