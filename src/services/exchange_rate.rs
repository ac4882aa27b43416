//! USD→KRW rate resolution.
//!
//! Tether's KRW quote on CoinGecko stands in for the USD rate. Resolution
//! never fails: any upstream problem yields [`ExchangeRate::fallback`],
//! which is flagged so consumers can tell it apart from a live rate.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::ticker::ExchangeRate;
use crate::services::coingecko::{CoinGeckoService, SimplePriceResponse};

const RATE_PROXY_ID: &str = "tether";
const RATE_QUOTE: &str = "krw";

#[derive(Clone)]
pub struct ExchangeRateResolver {
    coingecko: CoinGeckoService,
    /// Only live rates are cached
    cache: Arc<Cache<&'static str, f64>>,
}

impl ExchangeRateResolver {
    pub fn new(coingecko: CoinGeckoService, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            coingecko,
            cache: Arc::new(cache),
        }
    }

    pub async fn resolve_usd_krw_rate(&self) -> ExchangeRate {
        if let Some(rate) = self.cache.get(RATE_QUOTE).await {
            debug!("Cache hit for USD/KRW rate: {}", rate);
            return ExchangeRate {
                usd_krw: rate,
                is_fallback: false,
            };
        }

        let resolved = match self.coingecko.fetch_simple_price(RATE_PROXY_ID, RATE_QUOTE).await {
            Ok(prices) => extract_rate(&prices),
            Err(e) => {
                warn!("USD/KRW rate lookup failed: {}", e);
                None
            }
        };

        match resolved {
            Some(rate) => {
                self.cache.insert(RATE_QUOTE, rate.usd_krw).await;
                rate
            }
            None => {
                let fallback = ExchangeRate::fallback();
                warn!("Using fallback USD/KRW rate {}", fallback.usd_krw);
                fallback
            }
        }
    }
}

fn extract_rate(prices: &SimplePriceResponse) -> Option<ExchangeRate> {
    let value = prices.get(RATE_PROXY_ID)?.get(RATE_QUOTE).copied()?;
    let rate = ExchangeRate::resolved(value);
    if rate.is_none() {
        warn!("Rejecting unusable USD/KRW rate {}", value);
    }
    rate
}
