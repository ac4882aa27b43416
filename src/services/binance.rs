//! Binance (global) all-symbol price ticker.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::models::ticker::TickerQuote;
use crate::services::http::{build_client, get_json};

// Binance API response for ticker prices
#[derive(Debug, Deserialize)]
struct BinanceTickerPrice {
    symbol: String,
    price: String,
}

#[derive(Clone)]
pub struct BinanceService {
    client: Client,
    base_url: String,
}

impl BinanceService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: build_client(Duration::from_secs(10)),
            base_url,
        }
    }

    /// Fetch the price ticker for every trading pair.
    ///
    /// Symbols are full pairs ("BTCUSDT"); quote filtering happens when the
    /// premium is computed. This endpoint carries no 24h change or volume,
    /// so both are reported as zero.
    pub async fn fetch_global_tickers(&self) -> Result<Vec<TickerQuote>, FetchError> {
        let url = format!("{}/ticker/price", self.base_url);
        let tickers: Vec<BinanceTickerPrice> = get_json(self.client.get(&url), &url).await?;

        let quotes: Vec<TickerQuote> = tickers
            .into_iter()
            .filter_map(|t| TickerQuote::new(t.symbol, t.price.parse::<f64>().ok(), 0.0, 0.0))
            .collect();

        debug!("Fetched {} Binance tickers", quotes.len());

        Ok(quotes)
    }
}
