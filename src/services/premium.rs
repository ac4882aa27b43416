//! Kimchi premium: Upbit KRW prices against Binance USDT prices converted
//! to KRW.

use chrono::Utc;
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::models::premium::{PremiumRecord, PremiumResponse};
use crate::models::ticker::{ExchangeRate, TickerQuote};
use crate::services::binance::BinanceService;
use crate::services::exchange_rate::ExchangeRateResolver;
use crate::services::upbit::UpbitService;

/// Quote currency the global leg is matched against
pub const GLOBAL_QUOTE: &str = "USDT";

const SNAPSHOT_CACHE_KEY: &str = "kimchi";

/// Join domestic and global quotes and rank them by premium, highest first.
///
/// A record is emitted for `S` only when `S` is in `domestic` and
/// `S + "USDT"` is in `global`. Pure: the same inputs always give the same
/// output in the same order (ties keep domestic order).
pub fn compute_premiums(
    domestic: &[TickerQuote],
    global: &[TickerQuote],
    rate: ExchangeRate,
) -> Vec<PremiumRecord> {
    let mut by_pair: HashMap<&str, &TickerQuote> = HashMap::with_capacity(global.len());
    for quote in global {
        by_pair.entry(quote.symbol.as_str()).or_insert(quote);
    }

    let mut records: Vec<PremiumRecord> = domestic
        .iter()
        .filter_map(|d| {
            let pair = format!("{}{}", d.symbol, GLOBAL_QUOTE);
            let g = by_pair.get(pair.as_str())?;

            let converted = g.price * rate.usd_krw;
            let premium = (d.price - converted) / converted * 100.0;

            Some(PremiumRecord {
                coin_id: d.symbol.to_lowercase(),
                symbol: d.symbol.clone(),
                name: d.symbol.clone(),
                domestic_price: d.price,
                global_price: g.price,
                global_price_converted: converted,
                premium_percent: round_2dp(premium),
                rate_used: rate.usd_krw,
                rate_is_fallback: rate.is_fallback,
                change_percent_24h: d.change_percent_24h,
                volume_24h: d.volume_24h,
            })
        })
        .collect();

    records.sort_by(|a, b| b.premium_percent.total_cmp(&a.premium_percent));
    records
}

/// Round to 2 decimals, halves away from zero.
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fetches both ticker sets and the rate concurrently, then computes the
/// premium table. Snapshots built on a live rate are cached briefly.
#[derive(Clone)]
pub struct PremiumService {
    upbit: UpbitService,
    binance: BinanceService,
    rates: ExchangeRateResolver,
    market_limit: usize,
    cache: Arc<Cache<&'static str, PremiumResponse>>,
}

impl PremiumService {
    pub fn new(
        upbit: UpbitService,
        binance: BinanceService,
        rates: ExchangeRateResolver,
        market_limit: usize,
        cache_ttl: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(cache_ttl)
            .build();

        Self {
            upbit,
            binance,
            rates,
            market_limit,
            cache: Arc::new(cache),
        }
    }

    pub async fn get_premiums(&self) -> Result<PremiumResponse, FetchError> {
        if let Some(cached) = self.cache.get(SNAPSHOT_CACHE_KEY).await {
            debug!("Cache hit for {}", SNAPSHOT_CACHE_KEY);
            return Ok(cached);
        }

        let (domestic, global, rate) = tokio::join!(
            self.upbit.fetch_domestic_tickers(self.market_limit),
            self.binance.fetch_global_tickers(),
            self.rates.resolve_usd_krw_rate()
        );
        let domestic = domestic?;
        let global = global?;

        let data = compute_premiums(&domestic, &global, rate);

        info!(
            "Computed {} premiums from {} Upbit / {} Binance tickers (rate {}, fallback: {})",
            data.len(),
            domestic.len(),
            global.len(),
            rate.usd_krw,
            rate.is_fallback
        );

        let response = PremiumResponse {
            data,
            exchange_rate: rate.usd_krw,
            rate_is_fallback: rate.is_fallback,
            updated_at: Utc::now(),
        };

        // only live-rate snapshots are cached
        if !rate.is_fallback {
            self.cache.insert(SNAPSHOT_CACHE_KEY, response.clone()).await;
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::coingecko::CoinGeckoService;
    use mockito::Matcher;

    fn quote(symbol: &str, price: f64) -> TickerQuote {
        TickerQuote::new(symbol, Some(price), 0.0, 0.0).unwrap()
    }

    fn live_rate(value: f64) -> ExchangeRate {
        ExchangeRate::resolved(value).unwrap()
    }

    #[test]
    fn test_single_pair_example() {
        let domestic = vec![quote("BTC", 50_000_000.0)];
        let global = vec![quote("BTCUSDT", 40_000.0)];

        let records = compute_premiums(&domestic, &global, live_rate(1300.0));

        assert_eq!(records.len(), 1);
        let btc = &records[0];
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.coin_id, "btc");
        assert_eq!(btc.global_price, 40_000.0);
        assert_eq!(btc.global_price_converted, 52_000_000.0);
        assert_eq!(btc.premium_percent, -3.85);
        assert_eq!(btc.rate_used, 1300.0);
        assert!(!btc.rate_is_fallback);
    }

    #[test]
    fn test_inner_join_drops_unmatched_symbols() {
        let domestic = vec![quote("BTC", 100.0), quote("KLAY", 200.0), quote("ETH", 300.0)];
        let global = vec![
            quote("BTCUSDT", 0.1),
            quote("ETHBTC", 0.05),
            quote("ETHUSDT", 0.2),
            quote("SOLUSDT", 1.0),
        ];

        let records = compute_premiums(&domestic, &global, live_rate(1000.0));
        let mut symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        symbols.sort();

        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[test]
    fn test_sorted_by_premium_descending() {
        let domestic = vec![
            quote("AAA", 1000.0), // 0%
            quote("BBB", 1100.0), // +10%
            quote("CCC", 900.0),  // -10%
            quote("DDD", 1050.0), // +5%
        ];
        let global = vec![
            quote("AAAUSDT", 1.0),
            quote("BBBUSDT", 1.0),
            quote("CCCUSDT", 1.0),
            quote("DDDUSDT", 1.0),
        ];

        let records = compute_premiums(&domestic, &global, live_rate(1000.0));
        let premiums: Vec<f64> = records.iter().map(|r| r.premium_percent).collect();

        assert_eq!(premiums, vec![10.0, 5.0, 0.0, -10.0]);
        assert!(records.windows(2).all(|w| w[0].premium_percent >= w[1].premium_percent));
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let domestic = vec![quote("X", 1010.0), quote("Y", 1010.0), quote("Z", 990.0)];
        let global = vec![quote("ZUSDT", 1.0), quote("YUSDT", 1.0), quote("XUSDT", 1.0)];

        let first = compute_premiums(&domestic, &global, live_rate(1000.0));
        let second = compute_premiums(&domestic, &global, live_rate(1000.0));

        assert_eq!(first, second);
        // X and Y tie; domestic order is kept
        assert_eq!(first[0].symbol, "X");
        assert_eq!(first[1].symbol, "Y");
    }

    #[test]
    fn test_fallback_rate_is_flagged_on_records() {
        let records = compute_premiums(
            &[quote("BTC", 1350.0)],
            &[quote("BTCUSDT", 1.0)],
            ExchangeRate::fallback(),
        );

        assert_eq!(records[0].rate_used, 1350.0);
        assert!(records[0].rate_is_fallback);
        assert_eq!(records[0].premium_percent, 0.0);
    }

    #[test]
    fn test_duplicate_global_symbol_uses_first() {
        let records = compute_premiums(
            &[quote("BTC", 2000.0)],
            &[quote("BTCUSDT", 1.0), quote("BTCUSDT", 2.0)],
            live_rate(1000.0),
        );

        assert_eq!(records[0].global_price, 1.0);
        assert_eq!(records[0].premium_percent, 100.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_2dp(1.005_000_1), 1.01);
        assert_eq!(round_2dp(-1.005_000_1), -1.01);
        assert_eq!(round_2dp(2.344), 2.34);
        assert_eq!(round_2dp(-3.846_153_846), -3.85);
    }

    #[test]
    fn test_empty_inputs_yield_empty_output() {
        assert!(compute_premiums(&[], &[quote("BTCUSDT", 1.0)], live_rate(1300.0)).is_empty());
        assert!(compute_premiums(&[quote("BTC", 1.0)], &[], live_rate(1300.0)).is_empty());
    }

    async fn ticker_servers() -> (mockito::ServerGuard, mockito::ServerGuard) {
        let mut upbit = mockito::Server::new_async().await;
        upbit
            .mock("GET", "/market/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"market":"KRW-BTC"}]"#)
            .create_async()
            .await;
        upbit
            .mock("GET", "/ticker")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"market":"KRW-BTC","trade_price":54000000}]"#)
            .create_async()
            .await;

        let mut binance = mockito::Server::new_async().await;
        binance
            .mock("GET", "/ticker/price")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"symbol":"BTCUSDT","price":"40000"}]"#)
            .create_async()
            .await;

        (upbit, binance)
    }

    fn service_for(
        upbit: &mockito::ServerGuard,
        binance: &mockito::ServerGuard,
        coingecko: &mockito::ServerGuard,
    ) -> PremiumService {
        let rates = ExchangeRateResolver::new(
            CoinGeckoService::new(None, coingecko.url()),
            Duration::from_secs(300),
        );
        PremiumService::new(
            UpbitService::new(upbit.url()),
            BinanceService::new(binance.url()),
            rates,
            30,
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_fallback_snapshot_is_not_cached() {
        let (upbit, binance) = ticker_servers().await;
        let mut coingecko = mockito::Server::new_async().await;
        let down = coingecko
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let service = service_for(&upbit, &binance, &coingecko);

        let first = service.get_premiums().await.unwrap();
        assert!(first.rate_is_fallback);
        assert_eq!(first.exchange_rate, 1350.0);

        down.remove_async().await;
        coingecko
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tether":{"krw":1300.0}}"#)
            .create_async()
            .await;

        let second = service.get_premiums().await.unwrap();
        assert!(!second.rate_is_fallback);
        assert_eq!(second.exchange_rate, 1300.0);
        assert_eq!(second.data[0].premium_percent, 3.85);
    }

    #[tokio::test]
    async fn test_live_snapshot_is_reused() {
        let (upbit, binance) = ticker_servers().await;
        let mut coingecko = mockito::Server::new_async().await;
        let rate_mock = coingecko
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tether":{"krw":1300.0}}"#)
            .expect(1)
            .create_async()
            .await;

        let service = service_for(&upbit, &binance, &coingecko);
        let first = service.get_premiums().await.unwrap();
        let second = service.get_premiums().await.unwrap();

        rate_mock.assert_async().await;
        assert_eq!(first.updated_at, second.updated_at);
    }
}
