//! CryptoCompare news wire.
//!
//! One endpoint, four uses: the primary news feed, the wire re-shaped as
//! social posts, a forum-like subset of feeds, and the social fallback.
//! [`CryptoCompareFlavor`] carries what differs between them.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{from_unix_seconds, SourceAdapter, DEFAULT_ADAPTER_TIMEOUT};
use crate::error::FetchError;
use crate::models::content::{ContentItem, ContentSignal, Engagement, Platform};
use crate::services::content_tagging::{analyze_sentiment, extract_related_assets, truncate_chars};
use crate::services::http::{build_client, decode_each, get_json, null_as_default};

const NEWS_DESCRIPTION_CHARS: usize = 200;
const FALLBACK_BODY_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoCompareFlavor {
    /// Primary news feed, all publishers, with sentiment
    NewsWire,
    /// Major publishers presented as verified social posts
    SocialWire,
    /// Long-form publishers presented as forum threads
    Forum,
    /// All publishers, wider cap and timeout; used when every social source is empty
    SocialFallback,
}

impl CryptoCompareFlavor {
    pub fn name(self) -> &'static str {
        match self {
            Self::NewsWire => "cryptocompare-news",
            Self::SocialWire => "cryptocompare-social",
            Self::Forum => "cryptocompare-forum",
            Self::SocialFallback => "cryptocompare-fallback",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            Self::NewsWire => "cc",
            Self::SocialWire => "news",
            Self::Forum => "forum",
            Self::SocialFallback => "fallback",
        }
    }

    pub fn cap(self) -> usize {
        match self {
            Self::NewsWire => 50,
            Self::SocialWire => 20,
            Self::Forum => 10,
            Self::SocialFallback => 30,
        }
    }

    fn feeds(self) -> Option<&'static str> {
        match self {
            Self::SocialWire => Some("coindesk,cointelegraph,bitcoinist,decrypt"),
            Self::Forum => Some("bitcoinmagazine,theblock"),
            Self::NewsWire | Self::SocialFallback => None,
        }
    }

    pub fn default_timeout(self) -> Duration {
        match self {
            Self::SocialFallback => Duration::from_secs(10),
            _ => DEFAULT_ADAPTER_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(rename = "Data", default)]
    data: Vec<serde_json::Value>,
}

// Articles are decoded one by one; nulls read as empty
#[derive(Debug, Deserialize)]
struct NewsArticle {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    imageurl: String,
    #[serde(default)]
    published_on: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    categories: String,
}

#[derive(Clone)]
pub struct CryptoCompareAdapter {
    client: Client,
    base_url: String,
    flavor: CryptoCompareFlavor,
    timeout: Duration,
}

impl CryptoCompareAdapter {
    pub fn new(base_url: String, flavor: CryptoCompareFlavor) -> Self {
        Self {
            client: build_client(Duration::from_secs(15)),
            base_url,
            flavor,
            timeout: flavor.default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn normalize(&self, article: NewsArticle) -> Option<ContentItem> {
        let published_at = from_unix_seconds(article.published_on?)?;
        let raw_id = match &article.id {
            serde_json::Value::String(s) if !s.is_empty() => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let id = format!("{}-{}", self.flavor.id_prefix(), raw_id);
        let handle = format!("@{}", article.source.to_lowercase().replace(char::is_whitespace, ""));
        let full_text = format!("{} {}", article.title, article.body);

        let item = match self.flavor {
            CryptoCompareFlavor::NewsWire => {
                let mut description =
                    truncate_chars(&article.body, NEWS_DESCRIPTION_CHARS).to_string();
                if description.len() < article.body.len() {
                    description.push_str("...");
                }

                ContentItem {
                    id,
                    source: self.flavor.name().to_string(),
                    platform: Platform::News,
                    author_handle: article.source.clone(),
                    author: article.source,
                    title: article.title,
                    content: description,
                    url: article.url,
                    image_url: Some(article.imageurl).filter(|u| !u.is_empty()),
                    published_at,
                    categories: article
                        .categories
                        .split('|')
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect(),
                    signal: ContentSignal::Sentiment(analyze_sentiment(&full_text)),
                    verified: false,
                    related_assets: extract_related_assets(&full_text),
                }
            }
            CryptoCompareFlavor::SocialWire => ContentItem {
                id,
                source: self.flavor.name().to_string(),
                platform: Platform::Twitter,
                author: article.source,
                author_handle: handle,
                content: article.title.clone(),
                title: article.title,
                url: article.url,
                image_url: None,
                published_at,
                categories: Vec::new(),
                signal: ContentSignal::Engagement(Engagement::default()),
                verified: true,
                related_assets: extract_related_assets(&full_text),
            },
            CryptoCompareFlavor::Forum => ContentItem {
                id,
                source: self.flavor.name().to_string(),
                platform: Platform::Reddit,
                author_handle: article.source.clone(),
                author: article.source,
                content: article.title.clone(),
                related_assets: extract_related_assets(&article.title),
                title: article.title,
                url: article.url,
                image_url: None,
                published_at,
                categories: Vec::new(),
                signal: ContentSignal::Engagement(Engagement::default()),
                verified: false,
            },
            CryptoCompareFlavor::SocialFallback => {
                let content = if article.body.is_empty() {
                    article.title.clone()
                } else {
                    format!(
                        "{} — {}",
                        article.title,
                        truncate_chars(&article.body, FALLBACK_BODY_CHARS)
                    )
                };

                ContentItem {
                    id,
                    source: self.flavor.name().to_string(),
                    platform: Platform::Twitter,
                    author: article.source,
                    author_handle: handle,
                    title: article.title,
                    content,
                    url: article.url,
                    image_url: None,
                    published_at,
                    categories: Vec::new(),
                    signal: ContentSignal::Engagement(Engagement::default()),
                    verified: true,
                    related_assets: extract_related_assets(&full_text),
                }
            }
        };

        Some(item)
    }
}

#[async_trait]
impl SourceAdapter for CryptoCompareAdapter {
    fn name(&self) -> &'static str {
        self.flavor.name()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn try_fetch(&self) -> Result<Vec<ContentItem>, FetchError> {
        let url = format!("{}/news/", self.base_url);
        let mut query = vec![("lang", "EN"), ("sortOrder", "latest")];
        if let Some(feeds) = self.flavor.feeds() {
            query.push(("feeds", feeds));
        }

        let response: NewsResponse = get_json(self.client.get(&url).query(&query), &url).await?;

        let mut raw = response.data;
        raw.truncate(self.flavor.cap());

        Ok(decode_each::<NewsArticle>(raw)
            .into_iter()
            .filter_map(|article| self.normalize(article))
            .collect())
    }
}
