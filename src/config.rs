use std::env;
use std::time::Duration;

pub const DEFAULT_UPBIT_BASE_URL: &str = "https://api.upbit.com/v1";
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com/api/v3";
pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CRYPTOCOMPARE_BASE_URL: &str = "https://min-api.cryptocompare.com/data/v2";
pub const DEFAULT_REDDIT_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_FEAR_GREED_BASE_URL: &str = "https://api.alternative.me";

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub upbit_base_url: String,
    pub binance_base_url: String,
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub cryptocompare_base_url: String,
    pub reddit_base_url: String,
    pub fear_greed_base_url: String,
    /// Number of KRW markets taken from the head of Upbit's market list
    pub kimchi_market_limit: usize,
    pub adapter_timeout: Duration,
    pub feed_cap: usize,
    pub premium_cache_ttl: Duration,
    pub rate_cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            upbit_base_url: DEFAULT_UPBIT_BASE_URL.to_string(),
            binance_base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            coingecko_api_key: None,
            cryptocompare_base_url: DEFAULT_CRYPTOCOMPARE_BASE_URL.to_string(),
            reddit_base_url: DEFAULT_REDDIT_BASE_URL.to_string(),
            fear_greed_base_url: DEFAULT_FEAR_GREED_BASE_URL.to_string(),
            kimchi_market_limit: 30,
            adapter_timeout: Duration::from_secs(8),
            feed_cap: 60,
            premium_cache_ttl: Duration::from_secs(30),
            rate_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            upbit_base_url: env::var("UPBIT_BASE_URL").unwrap_or(defaults.upbit_base_url),
            binance_base_url: env::var("BINANCE_BASE_URL").unwrap_or(defaults.binance_base_url),
            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .unwrap_or(defaults.coingecko_base_url),
            coingecko_api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            cryptocompare_base_url: env::var("CRYPTOCOMPARE_BASE_URL")
                .unwrap_or(defaults.cryptocompare_base_url),
            reddit_base_url: env::var("REDDIT_BASE_URL").unwrap_or(defaults.reddit_base_url),
            fear_greed_base_url: env::var("FEAR_GREED_BASE_URL")
                .unwrap_or(defaults.fear_greed_base_url),
            kimchi_market_limit: parse_var("KIMCHI_MARKET_LIMIT")
                .unwrap_or(defaults.kimchi_market_limit),
            adapter_timeout: parse_var("ADAPTER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.adapter_timeout),
            feed_cap: parse_var("FEED_CAP").unwrap_or(defaults.feed_cap),
            premium_cache_ttl: parse_var("PREMIUM_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.premium_cache_ttl),
            rate_cache_ttl: parse_var("RATE_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_cache_ttl),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}
