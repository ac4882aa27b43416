use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading of the fear/greed sentiment index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FearGreedData {
    pub value: u32,
    pub value_classification: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_until_update: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FearGreedSummary {
    pub current: FearGreedData,
    /// Most recent first
    pub history: Vec<FearGreedData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub thumb: String,
    pub score: u32,
    pub market_cap_rank: Option<u32>,
    pub price_change_percentage_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub btc_dominance: Option<f64>,
    pub eth_dominance: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub active_cryptos: Option<u64>,
}

/// Response for GET /api/overview. Parts whose upstream failed are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fear_greed: Option<FearGreedSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending: Option<Vec<TrendingCoin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalStats>,
}
