use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    News,
    Twitter,
    Reddit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub likes: u64,
    pub reposts: u64,
    pub comments: u64,
}

/// Adapter-specific quality signal attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentSignal {
    Sentiment(Sentiment),
    Engagement(Engagement),
}

/// One normalized piece of content from any news or social adapter.
///
/// `id` carries the adapter's namespace prefix (`reddit-`, `cc-`, ...), so
/// ids from different adapters never collide. Two adapters reporting the
/// same story still produce two items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    /// Name of the adapter that produced the item
    pub source: String,
    pub platform: Platform,
    pub author: String,
    pub author_handle: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub signal: ContentSignal,
    pub verified: bool,
    pub related_assets: Vec<String>,
}

impl ContentItem {
    pub fn sentiment(&self) -> Sentiment {
        match self.signal {
            ContentSignal::Sentiment(sentiment) => sentiment,
            ContentSignal::Engagement(_) => Sentiment::Neutral,
        }
    }

    pub fn engagement(&self) -> Engagement {
        match self.signal {
            ContentSignal::Engagement(engagement) => engagement,
            ContentSignal::Sentiment(_) => Engagement::default(),
        }
    }
}

/// News article as served by GET /api/news
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub sentiment: Sentiment,
}

impl From<ContentItem> for NewsItem {
    fn from(item: ContentItem) -> Self {
        let sentiment = item.sentiment();
        Self {
            id: item.id,
            title: item.title,
            description: item.content,
            url: item.url,
            source: item.author,
            image_url: item.image_url,
            published_at: item.published_at,
            categories: item.categories,
            sentiment,
        }
    }
}

/// Social post as served by GET /api/social
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub id: String,
    pub platform: Platform,
    pub author: String,
    pub author_handle: String,
    pub content: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub likes: u64,
    pub reposts: u64,
    pub comments: u64,
    pub verified: bool,
    pub related_coins: Vec<String>,
}

impl From<ContentItem> for SocialPost {
    fn from(item: ContentItem) -> Self {
        let engagement = item.engagement();
        Self {
            id: item.id,
            platform: item.platform,
            author: item.author,
            author_handle: item.author_handle,
            content: item.content,
            url: item.url,
            published_at: item.published_at,
            likes: engagement.likes,
            reposts: engagement.reposts,
            comments: engagement.comments,
            verified: item.verified,
            related_coins: item.related_assets,
        }
    }
}
