//! Reddit r/cryptocurrency hot listing (public JSON API).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{from_unix_seconds, SourceAdapter};
use crate::error::FetchError;
use crate::models::content::{ContentItem, ContentSignal, Engagement, Platform};
use crate::services::content_tagging::{extract_related_assets, truncate_chars};
use crate::services::http::{build_client, decode_each, get_json, null_as_default};

const LIMIT: usize = 25;
const SELFTEXT_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    selftext: String,
    #[serde(default, deserialize_with = "null_as_default")]
    permalink: String,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    ups: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    num_comments: i64,
}

#[derive(Clone)]
pub struct RedditHotAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RedditHotAdapter {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: build_client(Duration::from_secs(15)),
            base_url,
            timeout,
        }
    }
}

fn normalize(post: RedditPost) -> Option<ContentItem> {
    if post.id.is_empty() {
        return None;
    }
    let published_at = from_unix_seconds(post.created_utc?)?;

    let mut content = post.title.clone();
    if !post.selftext.is_empty() {
        content.push('\n');
        content.push_str(truncate_chars(&post.selftext, SELFTEXT_CHARS));
    }

    Some(ContentItem {
        id: format!("reddit-{}", post.id),
        source: "reddit-hot".to_string(),
        platform: Platform::Reddit,
        author_handle: format!("u/{}", post.author),
        author: post.author,
        related_assets: extract_related_assets(&format!("{} {}", post.title, post.selftext)),
        title: post.title,
        content,
        url: format!("https://reddit.com{}", post.permalink),
        image_url: None,
        published_at,
        categories: Vec::new(),
        signal: ContentSignal::Engagement(Engagement {
            likes: post.ups.max(0) as u64,
            reposts: 0,
            comments: post.num_comments.max(0) as u64,
        }),
        verified: false,
    })
}

#[async_trait]
impl SourceAdapter for RedditHotAdapter {
    fn name(&self) -> &'static str {
        "reddit-hot"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn try_fetch(&self) -> Result<Vec<ContentItem>, FetchError> {
        let url = format!("{}/r/cryptocurrency/hot.json", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("limit", LIMIT.to_string())]);

        let listing: Listing = get_json(request, &url).await?;

        let mut children = listing.data.children;
        children.truncate(LIMIT);

        Ok(decode_each::<ListingChild>(children)
            .into_iter()
            .filter_map(|child| normalize(child.data))
            .collect())
    }
}
