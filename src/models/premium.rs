use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domestic vs. global price comparison for one asset listed on both exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumRecord {
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    /// Upbit price in KRW
    pub domestic_price: f64,
    /// Binance USDT price
    pub global_price: f64,
    /// Binance price converted to KRW with `rate_used`
    pub global_price_converted: f64,
    /// Rounded to 2 decimals
    pub premium_percent: f64,
    pub rate_used: f64,
    pub rate_is_fallback: bool,
    pub change_percent_24h: f64,
    pub volume_24h: f64,
}

/// Response for GET /api/kimchi
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumResponse {
    pub data: Vec<PremiumRecord>,
    pub exchange_rate: f64,
    pub rate_is_fallback: bool,
    pub updated_at: DateTime<Utc>,
}
