//! Runtime configuration.
//!
//! Settings come from an optional YAML file and are then overridden by CLI
//! flags (which can themselves come from environment variables). Every key is
//! optional in the file; missing keys take the defaults below.
//!
//! ```yaml
//! api_endpoint: https://api.nasa.gov/planetary/apod
//! api_key: YOUR_KEY
//! archive_listing_url: https://apod.nasa.gov/apod/archivepixFull.html
//! archive_base_url: https://apod.nasa.gov/apod/
//! proxy: https://api.allorigins.win/raw?url=
//! noise_patterns: [logo, icon, spacer]
//! request_timeout_secs: 30
//! ```

use crate::cli::Cli;
use crate::scrapers::archive::{ArchiveSource, DEFAULT_BASE_URL, DEFAULT_LISTING_URL, NoiseFilter};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";
/// NASA's shared, heavily rate limited key.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_endpoint: String,
    pub api_key: String,
    pub archive_listing_url: String,
    pub archive_base_url: String,
    /// Passthrough proxy prefix; the target URL is appended percent-encoded.
    pub proxy: Option<String>,
    pub noise_patterns: Vec<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            archive_listing_url: DEFAULT_LISTING_URL.to_string(),
            archive_base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            noise_patterns: vec!["logo".into(), "icon".into(), "spacer".into()],
            request_timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document, filling missing keys with defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Apply CLI overrides on top of file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(key) = cli.api_key.as_ref().filter(|k| !k.is_empty()) {
            self.api_key = key.clone();
        }
        if let Some(proxy) = &cli.proxy {
            self.proxy = Some(proxy.clone());
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the archive scrape settings, validating the base URL.
    ///
    /// The base is treated as a directory: a missing trailing slash is added
    /// so relative daily-page links resolve inside it.
    pub fn archive_source(&self) -> Result<ArchiveSource, url::ParseError> {
        let mut base_url = Url::parse(&self.archive_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(ArchiveSource::new(
            self.archive_listing_url.clone(),
            base_url,
            NoiseFilter::new(&self.noise_patterns),
        ))
    }
}

/// Load configuration from `path`, or defaults when no path is given.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    let Some(path) = path else {
        debug!("No config file given; using defaults");
        return Ok(AppConfig::default());
    };

    let raw = fs::read_to_string(path).await?;
    let config = AppConfig::from_yaml(&raw)?;
    info!(config_path = path, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::archive::parse_archive_list;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.proxy.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("api_key: abc123\nnoise_patterns: [banner]\n").unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.noise_patterns, vec!["banner".to_string()]);
        assert_eq!(config.archive_listing_url, DEFAULT_LISTING_URL);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "apod_gallery",
            "--api-key",
            "from-cli",
            "--proxy",
            "https://api.allorigins.win/raw?url=",
        ]);
        let config = AppConfig::from_yaml("api_key: from-file\n")
            .unwrap()
            .merge_cli(&cli);

        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.proxy.as_deref(), Some("https://api.allorigins.win/raw?url="));
    }

    #[test]
    fn test_archive_source_uses_noise_patterns() {
        let config = AppConfig::from_yaml("noise_patterns: [banner]\n").unwrap();
        let source = config.archive_source().unwrap();
        assert!(source.noise.is_noise("top_BANNER.gif"));
        assert!(!source.noise.is_noise("logo.png"));
    }

    #[test]
    fn test_archive_base_without_trailing_slash_is_a_directory() {
        let config = AppConfig::from_yaml("archive_base_url: https://apod.nasa.gov/apod\n").unwrap();
        let source = config.archive_source().unwrap();
        assert_eq!(source.base_url.as_str(), "https://apod.nasa.gov/apod/");

        let urls = parse_archive_list(r#"<a href="ap230101.html">Jan 1</a>"#, &source.base_url);
        assert_eq!(urls, vec!["https://apod.nasa.gov/apod/ap230101.html"]);
    }

    #[test]
    fn test_archive_source_rejects_bad_base() {
        let config = AppConfig::from_yaml("archive_base_url: not a url\n").unwrap();
        assert!(config.archive_source().is_err());
    }

    #[tokio::test]
    async fn test_load_config_without_path() {
        let config = load_config(None).await.unwrap();
        assert_eq!(config.api_key, DEFAULT_API_KEY);
    }
}
