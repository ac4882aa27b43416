//! Fan-out / merge / fallback over a set of source adapters.

use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::content::ContentItem;
use crate::services::sources::SourceAdapter;

pub const DEFAULT_FEED_CAP: usize = 60;

/// Two-tier feed: every primary adapter runs concurrently and their items
/// are merged; the fallback tier is only consulted, one adapter at a time,
/// when the primary tier yields nothing.
#[derive(Clone)]
pub struct FeedAggregator {
    name: &'static str,
    primary: Vec<Arc<dyn SourceAdapter>>,
    fallback: Vec<Arc<dyn SourceAdapter>>,
    cap: usize,
}

impl FeedAggregator {
    pub fn new(name: &'static str, primary: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            name,
            primary,
            fallback: Vec::new(),
            cap: DEFAULT_FEED_CAP,
        }
    }

    pub fn with_fallback(mut self, fallback: Vec<Arc<dyn SourceAdapter>>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Newest-first items, at most `cap`. Empty when every source in both
    /// tiers came back empty.
    pub async fn aggregate(&self) -> Vec<ContentItem> {
        let results = join_all(self.primary.iter().map(|adapter| adapter.fetch())).await;

        for (adapter, items) in self.primary.iter().zip(&results) {
            debug!("[{}] {} contributed {} items", self.name, adapter.name(), items.len());
        }

        let merged = sort_and_cap(results.into_iter().flatten().collect(), self.cap);
        if !merged.is_empty() {
            info!("[{}] merged {} items from {} sources", self.name, merged.len(), self.primary.len());
            return merged;
        }

        if self.fallback.is_empty() {
            warn!("[{}] all primary sources empty and no fallback configured", self.name);
            return merged;
        }

        warn!("[{}] all primary sources empty, trying fallback tier", self.name);

        for adapter in &self.fallback {
            let items = adapter.fetch().await;
            if !items.is_empty() {
                info!("[{}] fallback {} returned {} items", self.name, adapter.name(), items.len());
                return sort_and_cap(items, self.cap);
            }
        }

        warn!("[{}] fallback tier empty as well, serving no items", self.name);
        Vec::new()
    }
}

/// Sort newest first (stable for equal timestamps) and truncate to `cap`.
pub fn sort_and_cap(mut items: Vec<ContentItem>, cap: usize) -> Vec<ContentItem> {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(cap);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::content::{ContentSignal, Engagement, Platform};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    fn item(id: String, minutes: i64) -> ContentItem {
        ContentItem {
            id,
            source: "fake".to_string(),
            platform: Platform::Twitter,
            author: "author".to_string(),
            author_handle: "@author".to_string(),
            title: "title".to_string(),
            content: "content".to_string(),
            url: "https://example.com".to_string(),
            image_url: None,
            published_at: base_time() + ChronoDuration::minutes(minutes),
            categories: vec![],
            signal: ContentSignal::Engagement(Engagement::default()),
            verified: false,
            related_assets: vec![],
        }
    }

    enum Behaviour {
        Items(Vec<ContentItem>),
        Fail,
        Hang,
    }

    struct FakeAdapter {
        name: &'static str,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl FakeAdapter {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                name,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        fn with_items(name: &'static str, count: usize, offset_minutes: i64) -> Arc<Self> {
            let items = (0..count)
                .map(|i| item(format!("{}-{}", name, i), offset_minutes + i as i64))
                .collect();
            Self::new(name, Behaviour::Items(items))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceAdapter for FakeAdapter {
        fn name(&self) -> &'static str {
            self.name
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(50)
        }

        async fn try_fetch(&self) -> Result<Vec<ContentItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Items(items) => Ok(items.clone()),
                Behaviour::Fail => Err(FetchError::Timeout(self.name.to_string())),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![item(format!("{}-late", self.name), 10_000)])
                }
            }
        }
    }

    fn adapters(list: Vec<Arc<FakeAdapter>>) -> Vec<Arc<dyn SourceAdapter>> {
        list.into_iter().map(|a| a as Arc<dyn SourceAdapter>).collect()
    }

    #[tokio::test]
    async fn test_failing_adapter_does_not_affect_others() {
        let failing = FakeAdapter::new("a", Behaviour::Fail);
        let healthy = FakeAdapter::with_items("b", 3, 0);

        let feed = FeedAggregator::new("test", adapters(vec![failing, healthy]));
        let items = feed.aggregate().await;

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b-2", "b-1", "b-0"]);
    }

    #[tokio::test]
    async fn test_hanging_adapter_is_cut_off_by_timeout() {
        let hanging = FakeAdapter::new("a", Behaviour::Hang);
        let healthy = FakeAdapter::with_items("b", 3, 0);

        let feed = FeedAggregator::new("test", adapters(vec![hanging, healthy]));
        let started = std::time::Instant::now();
        let items = feed.aggregate().await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.id.starts_with("b-")));
    }

    #[tokio::test]
    async fn test_merges_and_sorts_newest_first() {
        let early = FakeAdapter::with_items("early", 2, 0);
        let late = FakeAdapter::with_items("late", 2, 100);

        let feed = FeedAggregator::new("test", adapters(vec![early, late]));
        let items = feed.aggregate().await;

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["late-1", "late-0", "early-1", "early-0"]);
    }

    #[tokio::test]
    async fn test_cap_keeps_the_most_recent() {
        let a = FakeAdapter::with_items("a", 200, 0);
        let b = FakeAdapter::with_items("b", 150, 1000);
        let c = FakeAdapter::with_items("c", 150, 5000);

        let feed = FeedAggregator::new("test", adapters(vec![a, b, c]));
        let items = feed.aggregate().await;

        assert_eq!(items.len(), DEFAULT_FEED_CAP);
        assert!(items.iter().all(|i| i.id.starts_with("c-")));
        assert_eq!(items[0].id, "c-149");
        assert_eq!(items[59].id, "c-90");
        assert!(items.windows(2).all(|w| w[0].published_at >= w[1].published_at));
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_empty() {
        let empty = FakeAdapter::new("empty", Behaviour::Items(vec![]));
        let failing = FakeAdapter::new("failing", Behaviour::Fail);
        let fallback = FakeAdapter::with_items("fallback", 80, 0);

        let feed = FeedAggregator::new("test", adapters(vec![empty, failing]))
            .with_fallback(adapters(vec![fallback.clone()]));
        let items = feed.aggregate().await;

        assert_eq!(fallback.calls(), 1);
        assert_eq!(items.len(), DEFAULT_FEED_CAP);
        assert_eq!(items[0].id, "fallback-79");
    }

    #[tokio::test]
    async fn test_fallback_not_called_when_primary_has_items() {
        let healthy = FakeAdapter::with_items("b", 1, 0);
        let fallback = FakeAdapter::with_items("fallback", 5, 0);

        let feed = FeedAggregator::new("test", adapters(vec![healthy]))
            .with_fallback(adapters(vec![fallback.clone()]));
        let items = feed.aggregate().await;

        assert_eq!(items.len(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_tier_stops_at_first_non_empty() {
        let primary = FakeAdapter::new("primary", Behaviour::Fail);
        let first = FakeAdapter::new("first", Behaviour::Fail);
        let second = FakeAdapter::with_items("second", 2, 0);
        let third = FakeAdapter::with_items("third", 2, 0);

        let feed = FeedAggregator::new("test", adapters(vec![primary]))
            .with_fallback(adapters(vec![first.clone(), second.clone(), third.clone()]));
        let items = feed.aggregate().await;

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_total_outage_yields_empty_list() {
        let primary = FakeAdapter::new("primary", Behaviour::Fail);
        let fallback = FakeAdapter::new("fallback", Behaviour::Items(vec![]));

        let feed = FeedAggregator::new("test", adapters(vec![primary]))
            .with_fallback(adapters(vec![fallback.clone()]));

        assert!(feed.aggregate().await.is_empty());
        assert_eq!(fallback.calls(), 1);
    }

    #[test]
    fn test_sort_and_cap_is_stable_for_equal_timestamps() {
        let items = vec![item("x".into(), 0), item("y".into(), 0), item("z".into(), 1)];
        let sorted = sort_and_cap(items, 2);

        let ids: Vec<&str> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "x"]);
    }
}
