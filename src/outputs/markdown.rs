//! Markdown rendering of a gallery snapshot.
//!
//! The page has two parts: a gallery listing every item with its image, title
//! and date, and a details section holding the full-resolution image and the
//! explanation. Each gallery title links to its details anchor, standing in
//! for click-to-detail.

use crate::models::{GallerySnapshot, Item};
use crate::utils::slugify_title;
use std::collections::HashMap;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Build unique anchors for each item, suffixing repeats with `-2`, `-3`, ...
fn anchors(items: &[Item]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    items
        .iter()
        .map(|item| {
            let mut base = slugify_title(item.alt_text());
            if !item.date.is_empty() {
                base = format!("{}-{}", base, item.date);
            }
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            if *n == 1 { base } else { format!("{}-{}", base, n) }
        })
        .collect()
}

/// Convert a [`GallerySnapshot`] into a Markdown document.
pub fn gallery_to_markdown(snapshot: &GallerySnapshot) -> String {
    let anchors = anchors(&snapshot.items);
    let mut md = String::new();

    md.push_str(&format!("# Astronomy Picture of the Day: {}\n\n", snapshot.local_date));
    md.push_str(&format!(
        "_{} items from the {} at {}_\n\n",
        snapshot.items.len(),
        snapshot.source,
        snapshot.local_time
    ));

    md.push_str("## Gallery\n\n");
    for (item, anchor) in snapshot.items.iter().zip(&anchors) {
        md.push_str(&format!("![{}]({})\n\n", item.alt_text(), item.image_url));
        md.push_str(&format!("### [{}](#{})\n\n", item.title, anchor));
        if !item.date.is_empty() {
            md.push_str(&format!("**{}**\n\n", item.date));
        }
    }

    md.push_str("## Details\n\n");
    for (item, anchor) in snapshot.items.iter().zip(&anchors) {
        md.push_str(&format!("<a id=\"{}\"></a>\n\n", anchor));
        md.push_str(&format!("### {}\n\n", item.title));
        if !item.date.is_empty() {
            md.push_str(&format!("**{}**\n\n", item.date));
        }
        md.push_str(&format!(
            "[![{}]({})]({})\n\n",
            item.alt_text(),
            item.image_url,
            item.detail_image_url()
        ));
        if !item.explanation.is_empty() {
            md.push_str(&item.explanation);
            md.push_str("\n\n");
        }
    }

    md
}

/// Write the Markdown gallery to `{markdown_output_dir}/{local_date}_gallery.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_gallery(
    snapshot: &GallerySnapshot,
    markdown_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!(
        "{}/{}_gallery.md",
        markdown_output_dir.trim_end_matches('/'),
        snapshot.local_date
    );
    fs::write(&path, gallery_to_markdown(snapshot)).await?;
    info!(%path, "Wrote Markdown gallery");
    Ok(path)
}
