//! APOD archive scraper.
//!
//! Used when the API is rate limited or returns no images. The archive at
//! [apod.nasa.gov](https://apod.nasa.gov/apod/archivepixFull.html) lists every
//! daily page oldest first; each daily page is loosely structured HTML holding
//! one image, a bold title, and a few paragraphs of explanation.
//!
//! # URL Pattern
//!
//! Daily pages are linked relatively as `apYYMMDD.html` and resolved against
//! the archive base, e.g. `https://apod.nasa.gov/apod/ap240930.html`.

use crate::models::{Item, PLACEHOLDER_TITLE};
use crate::scrapers::proxy::PageFetcher;
use crate::utils::collapse_whitespace;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://apod.nasa.gov/apod/archivepixFull.html";
pub const DEFAULT_BASE_URL: &str = "https://apod.nasa.gov/apod/";

/// Paragraphs at or below this many characters are treated as captions or
/// page chrome, not explanation.
const MIN_EXPLANATION_PARAGRAPH_CHARS: usize = 30;

// ASCII digits only; `\d` would also match other Unicode digit classes.
static DAILY_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ap[0-9]+\.html$").unwrap());
static DAILY_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ap([0-9]{2})([0-9]{2})([0-9]{2})\.html$").unwrap());

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static BOLD_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("b").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Heuristic for skipping site chrome images (logos, icons, spacers).
///
/// Matching is a case-insensitive substring test on the image `src`. The
/// pattern list is best-effort and can be replaced from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
    patterns: Vec<String>,
}

impl NoiseFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_noise(&self, src: &str) -> bool {
        let src = src.to_lowercase();
        self.patterns.iter().any(|p| src.contains(p.as_str()))
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(["logo", "icon", "spacer"])
    }
}

/// Where and how to scrape the archive.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    /// The listing page enumerating every daily page.
    pub listing_url: String,
    /// Base that relative daily-page links resolve against.
    pub base_url: Url,
    pub noise: NoiseFilter,
}

impl ArchiveSource {
    pub fn new(listing_url: impl Into<String>, base_url: Url, noise: NoiseFilter) -> Self {
        Self {
            listing_url: listing_url.into(),
            base_url,
            noise,
        }
    }
}

impl Default for ArchiveSource {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            noise: NoiseFilter::default(),
        }
    }
}

/// Parse the archive listing and return daily page URLs, newest first.
///
/// Only hrefs of the exact form `ap<digits>.html` are kept. Repeats are
/// dropped (first occurrence wins) before the list is reversed, since the
/// archive lists oldest first.
pub fn parse_archive_list(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let hrefs: Vec<&str> = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| DAILY_LINK_RE.is_match(href))
        .unique()
        .collect();

    hrefs
        .into_iter()
        .rev()
        .filter_map(|href| base_url.join(href).ok())
        .map(|url| url.to_string())
        .collect()
}

/// Derive `YYYY-MM-DD` from a daily page URL ending in `apYYMMDD.html`.
///
/// Two-digit years below 50 are 20xx, the rest 19xx. Anything that does not
/// match yields an empty string.
pub fn derive_date_from_url(page_url: &str) -> String {
    let filename = page_url.rsplit('/').next().unwrap_or_default();
    let Some(caps) = DAILY_FILENAME_RE.captures(filename) else {
        return String::new();
    };

    let (yy, mm, dd) = (&caps[1], &caps[2], &caps[3]);
    let century = match yy.parse::<u32>() {
        Ok(y) if y < 50 => "20",
        Ok(_) => "19",
        Err(_) => return String::new(),
    };
    format!("{century}{yy}-{mm}-{dd}")
}

/// Extract an [`Item`] from one daily page.
///
/// Returns `None` when the page has no `<img>` at all, or when the chosen
/// image has no `src` that resolves against `page_url`.
pub fn parse_daily_page(html: &str, page_url: &str, noise: &NoiseFilter) -> Option<Item> {
    let document = Html::parse_document(html);

    let images: Vec<_> = document.select(&IMG_SELECTOR).collect();
    let chosen = images
        .iter()
        .find(|img| {
            img.value()
                .attr("src")
                .is_some_and(|src| !src.is_empty() && !noise.is_noise(src))
        })
        .or_else(|| images.first())?;

    let raw_src = chosen.value().attr("src").map(str::trim).filter(|s| !s.is_empty())?;
    let image_url = Url::parse(page_url).ok()?.join(raw_src).ok()?.to_string();

    let bold_title = document
        .select(&BOLD_SELECTOR)
        .next()
        .map(|b| b.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let title = if !bold_title.is_empty() {
        bold_title
    } else {
        document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|t| collapse_whitespace(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
    };

    let explanation = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| t.chars().count() > MIN_EXPLANATION_PARAGRAPH_CHARS)
        .join("\n\n");

    Some(Item {
        image_url,
        hd_url: None,
        title,
        date: derive_date_from_url(page_url),
        explanation,
    })
}

/// Fetch and parse a single daily page.
#[instrument(level = "debug", skip(fetcher, noise))]
async fn fetch_daily_page<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    noise: &NoiseFilter,
) -> Result<Option<Item>, Box<dyn std::error::Error>> {
    let html = fetcher.fetch_text(url).await?;
    Ok(parse_daily_page(&html, url, noise))
}

/// Scrape up to `count` recent items from the archive, newest first.
///
/// Daily pages are fetched one at a time. A page that fails to fetch or
/// yields no usable image is logged and skipped. If the listing itself cannot
/// be fetched the result is empty.
#[instrument(level = "info", skip(fetcher, source), fields(listing = %source.listing_url))]
pub async fn fetch_from_archive<F: PageFetcher>(
    fetcher: &F,
    source: &ArchiveSource,
    count: usize,
) -> Vec<Item> {
    let listing = match fetcher.fetch_text(&source.listing_url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Archive fetch failed");
            return Vec::new();
        }
    };

    let daily_urls: Vec<String> = parse_archive_list(&listing, &source.base_url)
        .into_iter()
        .take(count)
        .collect();
    info!(count = daily_urls.len(), "Indexed archive daily pages");
    debug!(urls = ?daily_urls, "Archive URLs");

    let items: Vec<Item> = stream::iter(daily_urls)
        .then(|url| async move {
            match fetch_daily_page(fetcher, &url, &source.noise).await {
                Ok(Some(item)) if item.is_renderable() => {
                    debug!(%url, title = %item.title, "Parsed daily page");
                    Some(item)
                }
                Ok(_) => {
                    warn!(%url, "Daily page produced no usable image");
                    None
                }
                Err(e) => {
                    warn!(error = %e, %url, "Failed to fetch/parse daily page");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = items.len(), "Scraped archive items");
    items
}
