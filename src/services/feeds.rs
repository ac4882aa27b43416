//! News and social feeds assembled from the source adapters.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::content::ContentItem;
use crate::services::aggregator::FeedAggregator;
use crate::services::coingecko::CoinGeckoService;
use crate::services::sources::{
    CoinGeckoStatusAdapter, CryptoCompareAdapter, CryptoCompareFlavor, RedditHotAdapter,
    SourceAdapter,
};

#[derive(Clone)]
pub struct FeedService {
    news: FeedAggregator,
    social: FeedAggregator,
}

impl FeedService {
    pub fn new(news: FeedAggregator, social: FeedAggregator) -> Self {
        Self { news, social }
    }

    /// News: CryptoCompare first, CoinGecko status updates when it is empty.
    /// Social: Reddit plus two CryptoCompare views concurrently, a wider
    /// CryptoCompare pull when all three are empty.
    pub fn from_config(config: &AppConfig, coingecko: CoinGeckoService) -> Self {
        let timeout = config.adapter_timeout;
        let wire = |flavor| {
            Arc::new(
                CryptoCompareAdapter::new(config.cryptocompare_base_url.clone(), flavor)
                    .with_timeout(timeout),
            ) as Arc<dyn SourceAdapter>
        };

        let news = FeedAggregator::new("news", vec![wire(CryptoCompareFlavor::NewsWire)])
            .with_fallback(vec![
                Arc::new(CoinGeckoStatusAdapter::new(coingecko, timeout)) as Arc<dyn SourceAdapter>
            ])
            .with_cap(config.feed_cap);

        let social_fallback = CryptoCompareAdapter::new(
            config.cryptocompare_base_url.clone(),
            CryptoCompareFlavor::SocialFallback,
        )
        .with_timeout(timeout + Duration::from_secs(2));

        let social = FeedAggregator::new(
            "social",
            vec![
                Arc::new(RedditHotAdapter::new(config.reddit_base_url.clone(), timeout))
                    as Arc<dyn SourceAdapter>,
                wire(CryptoCompareFlavor::SocialWire),
                wire(CryptoCompareFlavor::Forum),
            ],
        )
        .with_fallback(vec![Arc::new(social_fallback) as Arc<dyn SourceAdapter>])
        .with_cap(config.feed_cap);

        Self::new(news, social)
    }

    pub async fn get_news(&self) -> Vec<ContentItem> {
        self.news.aggregate().await
    }

    pub async fn get_social_feed(&self) -> Vec<ContentItem> {
        self.social.aggregate().await
    }
}
