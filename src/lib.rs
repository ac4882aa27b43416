// src/lib.rs

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use services::{
    binance::BinanceService, coingecko::CoinGeckoService, exchange_rate::ExchangeRateResolver,
    feeds::FeedService, overview::OverviewService, premium::PremiumService, upbit::UpbitService,
};

#[derive(Clone)]
pub struct AppState {
    pub premium: PremiumService,
    pub feeds: FeedService,
    pub overview: OverviewService,
    pub coingecko: CoinGeckoService,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let coingecko = CoinGeckoService::new(
            config.coingecko_api_key.clone(),
            config.coingecko_base_url.clone(),
        );

        let premium = PremiumService::new(
            UpbitService::new(config.upbit_base_url.clone()),
            BinanceService::new(config.binance_base_url.clone()),
            ExchangeRateResolver::new(coingecko.clone(), config.rate_cache_ttl),
            config.kimchi_market_limit,
            config.premium_cache_ttl,
        );

        Self {
            premium,
            feeds: FeedService::from_config(config, coingecko.clone()),
            overview: OverviewService::new(config.fear_greed_base_url.clone(), coingecko.clone()),
            coingecko,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_cryptopulse))
        .route("/api/kimchi", get(handlers::premium::get_kimchi_premium))
        .route("/api/news", get(handlers::content::get_news))
        .route("/api/social", get(handlers::content::get_social_feed))
        .route("/api/overview", get(handlers::overview::get_market_overview))
        .route("/api/coins", get(handlers::coins::get_top_coins))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn hello_cryptopulse() -> &'static str {
    "Hello from CryptoPulse Backend!"
}

pub mod config;
pub mod error;

pub mod services {
    pub mod aggregator;
    pub mod binance;
    pub mod coingecko;
    pub mod content_tagging;
    pub mod exchange_rate;
    pub mod feeds;
    pub mod http;
    pub mod overview;
    pub mod premium;
    pub mod sources;
    pub mod upbit;
}

pub mod models;
pub mod handlers;
