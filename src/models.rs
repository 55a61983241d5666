//! Data models for APOD entries and the gallery items built from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ApodEntry`]: A raw record as returned by the NASA APOD API
//! - [`ApodPayload`]: The API body, which is either one entry or a list of them
//! - [`Item`]: The normalized unit rendered by the gallery and the detail view
//! - [`GallerySnapshot`]: One completed fetch cycle, serialized to JSON
//!
//! The API models keep the API's snake_case field names so they deserialize
//! without renaming.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when neither the page nor the API provides one.
pub const PLACEHOLDER_TITLE: &str = "NASA APOD";

/// A single record as returned by the APOD API.
///
/// Every field defaults so that partial records (older entries lack `hdurl`,
/// videos sometimes lack `url`) still deserialize.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApodEntry {
    /// The entry's date in `YYYY-MM-DD` format.
    #[serde(default)]
    pub date: String,
    /// The entry's title.
    #[serde(default)]
    pub title: String,
    /// Standard resolution media URL.
    #[serde(default)]
    pub url: Option<String>,
    /// High definition image URL, present only for images.
    #[serde(default)]
    pub hdurl: Option<String>,
    /// Media kind discriminator: `"image"`, `"video"`, or something else.
    #[serde(default)]
    pub media_type: String,
    /// Descriptive text supplied by the API.
    #[serde(default)]
    pub explanation: String,
    /// Copyright holder, when the image is not public domain.
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub service_version: Option<String>,
}

impl ApodEntry {
    /// Whether this entry declares itself an image.
    pub fn is_image(&self) -> bool {
        self.media_type == "image"
    }
}

/// Body of a successful APOD API response.
///
/// With `count` the API answers with an array; without it a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApodPayload {
    Many(Vec<ApodEntry>),
    One(ApodEntry),
}

impl ApodPayload {
    /// Normalize to a sequence: a single entry becomes a one-element vector.
    pub fn into_entries(self) -> Vec<ApodEntry> {
        match self {
            ApodPayload::Many(entries) => entries,
            ApodPayload::One(entry) => vec![entry],
        }
    }
}

/// A renderable gallery item, produced by either acquisition path.
///
/// # Invariant
///
/// An item is only handed to the rendering layer when [`Item::is_renderable`]
/// holds, i.e. `image_url` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Item {
    /// Absolute URL of the gallery image.
    pub image_url: String,
    /// Full resolution URL, only known on the API path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    /// Title, or [`PLACEHOLDER_TITLE`] when none could be found.
    pub title: String,
    /// `YYYY-MM-DD`, or empty when undeterminable.
    pub date: String,
    /// Long-form description; may be empty.
    #[serde(default)]
    pub explanation: String,
}

impl Item {
    pub fn is_renderable(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// Alt text for the image: the title, or the placeholder when blank.
    pub fn alt_text(&self) -> &str {
        if self.title.trim().is_empty() {
            PLACEHOLDER_TITLE
        } else {
            &self.title
        }
    }

    /// The source the detail view should display: HD when available.
    pub fn detail_image_url(&self) -> &str {
        self.hd_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.image_url)
    }
}

impl From<ApodEntry> for Item {
    fn from(entry: ApodEntry) -> Self {
        let url = entry.url.filter(|u| !u.is_empty());
        let hd_url = entry.hdurl.filter(|u| !u.is_empty());
        let image_url = url.or_else(|| hd_url.clone()).unwrap_or_default();

        Item {
            image_url,
            hd_url,
            title: entry.title,
            date: entry.date,
            explanation: entry.explanation,
        }
    }
}

/// Which acquisition path produced a set of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    Api,
    Archive,
}

impl fmt::Display for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemSource::Api => f.write_str("api"),
            ItemSource::Archive => f.write_str("archive"),
        }
    }
}

/// The result of one completed fetch cycle, as written to the JSON output.
#[derive(Debug, Deserialize, Serialize)]
pub struct GallerySnapshot {
    /// The local date the cycle ran, in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time the cycle ran.
    pub local_time: String,
    /// Where the items came from.
    pub source: ItemSource,
    /// The rendered items, in display order.
    pub items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_single_object_normalizes_to_one_entry() {
        let json = r#"{
            "date": "2024-09-30",
            "title": "Comet Tsuchinshan-ATLAS",
            "url": "https://apod.nasa.gov/apod/image/2409/comet_1024.jpg",
            "media_type": "image",
            "explanation": "A comet rises before dawn."
        }"#;

        let payload: ApodPayload = serde_json::from_str(json).unwrap();
        let entries = payload.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Comet Tsuchinshan-ATLAS");
        assert!(entries[0].is_image());
    }

    #[test]
    fn test_payload_array_keeps_order() {
        let json = r#"[
            {"date": "2024-01-01", "title": "First", "media_type": "image", "url": "https://a/1.jpg"},
            {"date": "2024-01-02", "title": "Second", "media_type": "video", "url": "https://youtube.com/embed/x"}
        ]"#;

        let entries = serde_json::from_str::<ApodPayload>(json)
            .unwrap()
            .into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert!(!entries[1].is_image());
    }

    #[test]
    fn test_item_from_entry_falls_back_to_hdurl() {
        let entry = ApodEntry {
            title: "Only HD".to_string(),
            hdurl: Some("https://apod.nasa.gov/apod/image/hd.jpg".to_string()),
            media_type: "image".to_string(),
            ..Default::default()
        };

        let item = Item::from(entry);
        assert_eq!(item.image_url, "https://apod.nasa.gov/apod/image/hd.jpg");
        assert!(item.is_renderable());
    }

    #[test]
    fn test_item_from_entry_without_urls_is_not_renderable() {
        let entry = ApodEntry {
            title: "Nothing".to_string(),
            url: Some(String::new()),
            media_type: "image".to_string(),
            ..Default::default()
        };

        assert!(!Item::from(entry).is_renderable());
    }

    #[test]
    fn test_detail_image_url_prefers_hd() {
        let item = Item {
            image_url: "https://a/small.jpg".to_string(),
            hd_url: Some("https://a/big.jpg".to_string()),
            title: "T".to_string(),
            date: String::new(),
            explanation: String::new(),
        };
        assert_eq!(item.detail_image_url(), "https://a/big.jpg");

        let item = Item { hd_url: None, ..item };
        assert_eq!(item.detail_image_url(), "https://a/small.jpg");
    }

    #[test]
    fn test_alt_text_placeholder() {
        let item = Item {
            image_url: "https://a/x.jpg".to_string(),
            hd_url: None,
            title: "  ".to_string(),
            date: String::new(),
            explanation: String::new(),
        };
        assert_eq!(item.alt_text(), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = GallerySnapshot {
            local_date: "2025-05-06".to_string(),
            local_time: "20:30:00".to_string(),
            source: ItemSource::Archive,
            items: vec![],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("2025-05-06"));
        assert!(json.contains(r#""source":"archive""#));
    }
}
