//! CoinGecko project status updates, the secondary news feed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::SourceAdapter;
use crate::error::FetchError;
use crate::models::content::{ContentItem, ContentSignal, Platform, Sentiment};
use crate::services::coingecko::{CoinGeckoService, StatusUpdate};
use crate::services::content_tagging::{extract_related_assets, truncate_chars};

const PER_PAGE: u32 = 50;
const TITLE_CHARS: usize = 150;

#[derive(Clone)]
pub struct CoinGeckoStatusAdapter {
    coingecko: CoinGeckoService,
    timeout: Duration,
}

impl CoinGeckoStatusAdapter {
    pub fn new(coingecko: CoinGeckoService, timeout: Duration) -> Self {
        Self { coingecko, timeout }
    }
}

fn normalize(idx: usize, update: StatusUpdate) -> Option<ContentItem> {
    let published_at = DateTime::parse_from_rfc3339(update.created_at.as_deref()?)
        .ok()?
        .with_timezone(&Utc);
    let description = update.description.unwrap_or_default();
    let project = update.project;
    let project_id = project.as_ref().and_then(|p| p.id.clone()).unwrap_or_default();
    let author = project
        .and_then(|p| p.name)
        .unwrap_or_else(|| "CoinGecko".to_string());

    Some(ContentItem {
        id: format!("cg-{}", idx),
        source: "coingecko-status".to_string(),
        platform: Platform::News,
        author_handle: author.clone(),
        author,
        title: truncate_chars(&description, TITLE_CHARS).to_string(),
        related_assets: extract_related_assets(&description),
        content: description,
        url: format!("https://www.coingecko.com/en/coins/{}", project_id),
        image_url: None,
        published_at,
        categories: Vec::new(),
        signal: ContentSignal::Sentiment(Sentiment::Neutral),
        verified: false,
    })
}

#[async_trait]
impl SourceAdapter for CoinGeckoStatusAdapter {
    fn name(&self) -> &'static str {
        "coingecko-status"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn try_fetch(&self) -> Result<Vec<ContentItem>, FetchError> {
        let updates = self.coingecko.fetch_status_updates(PER_PAGE).await?;

        Ok(updates
            .into_iter()
            .take(PER_PAGE as usize)
            .enumerate()
            .filter_map(|(idx, update)| normalize(idx, update))
            .collect())
    }
}
