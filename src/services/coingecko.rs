use moka::future::Cache;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::overview::{GlobalStats, TrendingCoin};
use crate::services::http::{build_client, get_json};

const TOP_COINS_CACHE_KEY: &str = "coins_markets_usd_top100";

#[derive(Clone)]
pub struct CoinGeckoService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    top_coins_cache: Arc<Cache<&'static str, serde_json::Value>>,
}

/// `{ "tether": { "krw": 1391.2 } }`
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub project: Option<StatusProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusProject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdatesResponse {
    #[serde(default)]
    status_updates: Vec<StatusUpdate>,
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    thumb: String,
    #[serde(default)]
    score: u32,
    market_cap_rank: Option<u32>,
    #[serde(default)]
    data: Option<TrendingItemData>,
}

#[derive(Debug, Deserialize)]
struct TrendingItemData {
    #[serde(default)]
    price_change_percentage_24h: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    #[serde(default)]
    active_cryptocurrencies: Option<u64>,
    #[serde(default)]
    total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    #[serde(default)]
    market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    market_cap_change_percentage_24h_usd: Option<f64>,
}

impl From<GlobalData> for GlobalStats {
    fn from(data: GlobalData) -> Self {
        Self {
            total_market_cap: data.total_market_cap.get("usd").copied(),
            total_volume: data.total_volume.get("usd").copied(),
            btc_dominance: data.market_cap_percentage.get("btc").copied(),
            eth_dominance: data.market_cap_percentage.get("eth").copied(),
            market_cap_change_percentage_24h: data.market_cap_change_percentage_24h_usd,
            active_cryptos: data.active_cryptocurrencies,
        }
    }
}

impl CoinGeckoService {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(30))
            .build();

        Self {
            client: build_client(Duration::from_secs(10)),
            api_key,
            base_url,
            top_coins_cache: Arc::new(cache),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header("x-cg-pro-api-key", key),
            None => request,
        }
    }

    /// GET /simple/price for the given coin ids and quote currencies.
    pub async fn fetch_simple_price(
        &self,
        ids: &str,
        vs_currencies: &str,
    ) -> Result<SimplePriceResponse, FetchError> {
        let url = format!("{}/simple/price", self.base_url);
        let request = self
            .get(&url)
            .query(&[("ids", ids), ("vs_currencies", vs_currencies)]);

        get_json(request, &url).await
    }

    /// Project status updates, used as a secondary news feed.
    pub async fn fetch_status_updates(&self, per_page: u32) -> Result<Vec<StatusUpdate>, FetchError> {
        let url = format!("{}/status_updates", self.base_url);
        let request = self.get(&url).query(&[("per_page", per_page.to_string())]);

        let response: StatusUpdatesResponse = get_json(request, &url).await?;

        tracing::debug!("Fetched {} status updates from CoinGecko", response.status_updates.len());

        Ok(response.status_updates)
    }

    /// Top trending searches, first `limit` entries.
    pub async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingCoin>, FetchError> {
        let url = format!("{}/search/trending", self.base_url);
        let response: TrendingResponse = get_json(self.get(&url), &url).await?;

        let trending = response
            .coins
            .into_iter()
            .take(limit)
            .map(|entry| {
                let item = entry.item;
                let change = item
                    .data
                    .and_then(|d| d.price_change_percentage_24h.get("usd").copied())
                    .unwrap_or(0.0);

                TrendingCoin {
                    id: item.id,
                    name: item.name,
                    symbol: item.symbol,
                    thumb: item.thumb,
                    score: item.score,
                    market_cap_rank: item.market_cap_rank,
                    price_change_percentage_24h: change,
                }
            })
            .collect();

        Ok(trending)
    }

    pub async fn fetch_global(&self) -> Result<GlobalStats, FetchError> {
        let url = format!("{}/global", self.base_url);
        let response: GlobalResponse = get_json(self.get(&url), &url).await?;

        Ok(response.data.into())
    }

    /// Top 100 coins by market cap (USD, with 7d sparkline), passed through
    /// untouched. Cached for 30 seconds.
    pub async fn fetch_top_coins(&self) -> Result<serde_json::Value, FetchError> {
        if let Some(cached) = self.top_coins_cache.get(TOP_COINS_CACHE_KEY).await {
            tracing::debug!("Cache hit for {}", TOP_COINS_CACHE_KEY);
            return Ok(cached);
        }

        tracing::info!("Fetching top coins from CoinGecko");

        let url = format!("{}/coins/markets", self.base_url);
        let request = self.get(&url).query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", "100"),
            ("page", "1"),
            ("sparkline", "true"),
            ("price_change_percentage", "7d"),
        ]);

        let coins: serde_json::Value = get_json(request, &url).await?;

        self.top_coins_cache
            .insert(TOP_COINS_CACHE_KEY, coins.clone())
            .await;

        Ok(coins)
    }
}
