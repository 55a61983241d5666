//! NASA APOD API client.
//!
//! The primary acquisition path: one round trip for `count` random entries.
//! It is fast but rate limited, so callers are expected to fall back to the
//! archive scraper when it is rejected or returns no images.
//!
//! # Architecture
//!
//! - [`ApodApi`]: Core trait defining the async request
//! - [`HttpApodApi`]: `reqwest`-backed implementation against the live API
//! - [`ApiReply`]: Distinguishes a decoded body from a non-success status, so
//!   the caller can treat a rejection as "fall back" rather than as an error

use crate::models::ApodPayload;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Outcome of an API request that reached the server.
#[derive(Debug)]
pub enum ApiReply {
    /// Success status with a decoded body.
    Entries(ApodPayload),
    /// The server answered with a non-success status.
    Rejected(StatusCode),
}

/// Trait for requesting APOD entries.
///
/// Transport and decode failures are returned as `Err`; a non-success status
/// is a regular [`ApiReply::Rejected`].
pub trait ApodApi {
    async fn request(&self, count: usize) -> Result<ApiReply, Box<dyn Error>>;
}

/// Build the APOD API URL for multiple entries.
///
/// # Examples
///
/// ```ignore
/// let url = build_apod_url("https://api.nasa.gov/planetary/apod", "DEMO_KEY", 9)?;
/// assert_eq!(url.as_str(), "https://api.nasa.gov/planetary/apod?api_key=DEMO_KEY&count=9");
/// ```
pub fn build_apod_url(endpoint: &str, api_key: &str, count: usize) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        endpoint,
        &[("api_key", api_key.to_string()), ("count", count.to_string())],
    )
}

/// APOD API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApodApi {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpApodApi {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

impl ApodApi for HttpApodApi {
    #[instrument(level = "info", skip(self))]
    async fn request(&self, count: usize) -> Result<ApiReply, Box<dyn Error>> {
        let t0 = Instant::now();
        let url = build_apod_url(&self.endpoint, &self.api_key, count)?;

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body_preview = %truncate_for_log(&body, 200),
                "APOD API rejected request"
            );
            return Ok(ApiReply::Rejected(status));
        }

        let payload: ApodPayload = resp.json().await?;
        let dt = t0.elapsed();
        match &payload {
            ApodPayload::Many(entries) => {
                info!(count = entries.len(), elapsed_ms = dt.as_millis() as u64, "APOD API returned entries")
            }
            ApodPayload::One(entry) => {
                debug!(date = %entry.date, elapsed_ms = dt.as_millis() as u64, "APOD API returned a single entry")
            }
        }
        Ok(ApiReply::Entries(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_apod_url() {
        let url = build_apod_url("https://api.nasa.gov/planetary/apod", "DEMO_KEY", 9).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.nasa.gov/planetary/apod?api_key=DEMO_KEY&count=9"
        );
    }

    #[test]
    fn test_build_apod_url_encodes_key() {
        let url = build_apod_url("https://api.nasa.gov/planetary/apod", "a b&c", 3).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("api_key".to_string(), "a b&c".to_string()));
        assert_eq!(pairs[1], ("count".to_string(), "3".to_string()));
    }

    #[test]
    fn test_build_apod_url_rejects_relative_endpoint() {
        assert!(build_apod_url("planetary/apod", "DEMO_KEY", 1).is_err());
    }
}
