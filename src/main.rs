use cryptopulse_backend::{build_router, config::AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cryptopulse_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    tracing::info!(
        "Upstreams: upbit={} binance={} coingecko={} (api key: {})",
        config.upbit_base_url,
        config.binance_base_url,
        config.coingecko_base_url,
        config.coingecko_api_key.is_some()
    );

    let state = AppState::from_config(&config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener.local_addr().expect("Listener has no local address")
    );

    axum::serve(listener, app).await.expect("Server error");
}
