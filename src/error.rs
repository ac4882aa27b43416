use thiserror::Error;

/// Failure talking to an upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} timed out")]
    Timeout(String),
}

impl FetchError {
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}
