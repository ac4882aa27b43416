//! Market overview: fear/greed index, trending searches, global stats.
//!
//! The three lookups are independent; any that fails is left out of the
//! response instead of failing the call.

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::error::FetchError;
use crate::models::overview::{FearGreedData, FearGreedSummary, OverviewResponse};
use crate::services::coingecko::CoinGeckoService;
use crate::services::http::{build_client, get_json};

const FEAR_GREED_DAYS: u32 = 30;
const TRENDING_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    #[serde(default)]
    data: Vec<FearGreedRaw>,
}

// alternative.me reports every field as a string
#[derive(Debug, Deserialize)]
struct FearGreedRaw {
    value: String,
    value_classification: String,
    timestamp: String,
    #[serde(default)]
    time_until_update: Option<String>,
}

impl FearGreedRaw {
    fn parse(self) -> Option<FearGreedData> {
        let secs = self.timestamp.parse::<i64>().ok()?;

        Some(FearGreedData {
            value: self.value.parse().ok()?,
            value_classification: self.value_classification,
            timestamp: DateTime::from_timestamp(secs, 0)?,
            time_until_update: self.time_until_update,
        })
    }
}

#[derive(Clone)]
pub struct OverviewService {
    client: Client,
    fear_greed_base_url: String,
    coingecko: CoinGeckoService,
}

impl OverviewService {
    pub fn new(fear_greed_base_url: String, coingecko: CoinGeckoService) -> Self {
        Self {
            client: build_client(Duration::from_secs(10)),
            fear_greed_base_url,
            coingecko,
        }
    }

    pub async fn get_overview(&self) -> OverviewResponse {
        let (fear_greed, trending, global) = tokio::join!(
            self.fetch_fear_greed(),
            self.coingecko.fetch_trending(TRENDING_LIMIT),
            self.coingecko.fetch_global()
        );

        OverviewResponse {
            fear_greed: fear_greed
                .map_err(|e| warn!("Fear/greed index unavailable: {}", e))
                .ok()
                .flatten(),
            trending: trending
                .map_err(|e| warn!("Trending coins unavailable: {}", e))
                .ok(),
            global: global
                .map_err(|e| warn!("Global market stats unavailable: {}", e))
                .ok(),
        }
    }

    async fn fetch_fear_greed(&self) -> Result<Option<FearGreedSummary>, FetchError> {
        let url = format!("{}/fng/", self.fear_greed_base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("limit", FEAR_GREED_DAYS.to_string())]);

        let response: FearGreedResponse = get_json(request, &url).await?;

        let history: Vec<FearGreedData> = response
            .data
            .into_iter()
            .take(FEAR_GREED_DAYS as usize)
            .filter_map(FearGreedRaw::parse)
            .collect();

        Ok(history.first().cloned().map(|current| FearGreedSummary { current, history }))
    }
}
