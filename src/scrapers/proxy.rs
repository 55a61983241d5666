//! Network indirection for archive pages.
//!
//! Every archive request (listing and daily pages alike) goes through a
//! [`PageFetcher`]. The HTTP implementation can optionally wrap each target in
//! a raw-passthrough proxy such as `https://api.allorigins.win/raw?url=`.

use reqwest::Client;
use std::error::Error;
use tracing::{debug, instrument};

/// Fetches the raw text body of a URL.
pub trait PageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Wrap `target` in a proxy prefix, percent-encoding the target URL.
pub fn proxied_url(prefix: &str, target: &str) -> String {
    format!("{}{}", prefix, urlencoding::encode(target))
}

/// [`PageFetcher`] over HTTP, optionally through a passthrough proxy.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: Client,
    prefix: Option<String>,
}

impl ProxyFetcher {
    pub fn new(client: Client, prefix: Option<String>) -> Self {
        let prefix = prefix.filter(|p| !p.trim().is_empty());
        Self { client, prefix }
    }

    fn request_url(&self, url: &str) -> String {
        match &self.prefix {
            Some(prefix) => proxied_url(prefix, url),
            None => url.to_string(),
        }
    }
}

impl PageFetcher for ProxyFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let request_url = self.request_url(url);
        let resp = self.client.get(&request_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("Proxy fetch failed: {}", status).into());
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), "Fetched page body");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxied_url_encodes_target() {
        assert_eq!(
            proxied_url(
                "https://api.allorigins.win/raw?url=",
                "https://apod.nasa.gov/apod/archivepixFull.html"
            ),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fapod.nasa.gov%2Fapod%2FarchivepixFull.html"
        );
    }

    #[test]
    fn test_direct_fetch_without_prefix() {
        let fetcher = ProxyFetcher::new(Client::new(), None);
        assert_eq!(
            fetcher.request_url("https://apod.nasa.gov/apod/ap230105.html"),
            "https://apod.nasa.gov/apod/ap230105.html"
        );
    }

    #[test]
    fn test_blank_prefix_means_direct() {
        let fetcher = ProxyFetcher::new(Client::new(), Some("  ".to_string()));
        assert_eq!(fetcher.request_url("https://x/y"), "https://x/y");
    }

    #[test]
    fn test_prefix_is_applied() {
        let fetcher = ProxyFetcher::new(Client::new(), Some("https://proxy/?u=".to_string()));
        assert_eq!(fetcher.request_url("https://x/y"), "https://proxy/?u=https%3A%2F%2Fx%2Fy");
    }
}
