//! News and social source adapters.
//!
//! Every upstream gets one [`SourceAdapter`] implementation. Adapters only
//! report failures through [`SourceAdapter::try_fetch`]; callers use
//! [`SourceAdapter::fetch`], which bounds the call with the adapter's
//! timeout and turns every failure into an empty list.

pub mod coingecko_status;
pub mod cryptocompare;
pub mod reddit;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::content::ContentItem;

pub use coingecko_status::CoinGeckoStatusAdapter;
pub use cryptocompare::{CryptoCompareAdapter, CryptoCompareFlavor};
pub use reddit::RedditHotAdapter;

pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(8);

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable adapter name, used in logs and on each item's `source`
    fn name(&self) -> &'static str;

    fn timeout(&self) -> Duration {
        DEFAULT_ADAPTER_TIMEOUT
    }

    /// Raw upstream call. Implementations apply their own result cap.
    async fn try_fetch(&self) -> Result<Vec<ContentItem>, FetchError>;

    /// Fetch within `timeout()`. Never fails: timeouts and errors are logged
    /// and yield an empty list.
    async fn fetch(&self) -> Vec<ContentItem> {
        let outcome = match tokio::time::timeout(self.timeout(), self.try_fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.name().to_string())),
        };

        match outcome {
            Ok(items) => {
                debug!("{} returned {} items", self.name(), items.len());
                items
            }
            Err(e) => {
                warn!("{} failed, contributing no items: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Unix seconds to a UTC instant; `None` for out-of-range values.
pub(crate) fn from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}
