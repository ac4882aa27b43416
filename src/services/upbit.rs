//! Upbit (domestic, KRW market) ticker fetcher.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::models::ticker::TickerQuote;
use crate::services::http::{build_client, decode_each, get_json, null_as_default};

/// Market identifier prefix for KRW-quoted markets
pub const KRW_MARKET_PREFIX: &str = "KRW-";

#[derive(Debug, Deserialize)]
struct UpbitMarket {
    market: String,
}

#[derive(Debug, Deserialize)]
struct UpbitTicker {
    market: String,
    #[serde(default)]
    trade_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    signed_change_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    acc_trade_price_24h: f64,
}

#[derive(Clone)]
pub struct UpbitService {
    client: Client,
    base_url: String,
}

impl UpbitService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: build_client(Duration::from_secs(10)),
            base_url,
        }
    }

    /// Fetch tickers for the first `limit` KRW markets.
    ///
    /// "First" means Upbit's own market-list order, not market cap or
    /// volume. Both requests must succeed; the ticker request depends on
    /// the market list so there is no partial result.
    pub async fn fetch_domestic_tickers(&self, limit: usize) -> Result<Vec<TickerQuote>, FetchError> {
        let markets = self.fetch_krw_markets(limit).await?;

        if markets.is_empty() {
            info!("Upbit returned no KRW markets");
            return Ok(Vec::new());
        }

        let url = format!("{}/ticker", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("markets", markets.join(","))]);

        let raw: Vec<serde_json::Value> = get_json(request, &url).await?;
        let tickers: Vec<UpbitTicker> = decode_each(raw);

        let quotes: Vec<TickerQuote> = tickers
            .into_iter()
            .filter_map(|t| {
                let symbol = t.market.strip_prefix(KRW_MARKET_PREFIX).unwrap_or(&t.market);
                TickerQuote::new(
                    symbol,
                    t.trade_price,
                    t.signed_change_rate * 100.0,
                    t.acc_trade_price_24h,
                )
            })
            .collect();

        debug!("Fetched {} Upbit KRW tickers", quotes.len());

        Ok(quotes)
    }

    async fn fetch_krw_markets(&self, limit: usize) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/market/all", self.base_url);
        let request = self.client.get(&url).query(&[("is_details", "false")]);

        let markets: Vec<UpbitMarket> = get_json(request, &url).await?;

        Ok(markets
            .into_iter()
            .map(|m| m.market)
            .filter(|m| m.starts_with(KRW_MARKET_PREFIX))
            .take(limit)
            .collect())
    }
}
