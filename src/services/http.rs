use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::error::FetchError;

/// Browser-like agent; Reddit rejects requests without one.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; CryptoPulse/1.0)";

/// Build an upstream HTTP client with a request timeout and compression.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
}

/// Send a GET request and decode the JSON body, mapping every failure mode
/// into a [`FetchError`] tagged with the URL.
pub async fn get_json<T>(request: reqwest::RequestBuilder, url: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    let response = request
        .header("accept", "application/json")
        .send()
        .await
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.json::<T>().await.map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Treat an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode each element on its own, dropping those that do not fit `T`.
pub fn decode_each<T>(values: Vec<serde_json::Value>) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect()
}
