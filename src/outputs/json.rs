//! JSON output of a completed gallery cycle.
//!
//! # Output Structure
//!
//! Files are organized by date:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── gallery.json
//! ```
//!
//! A later run on the same day replaces the file, matching the gallery
//! itself, which is replaced wholesale each cycle.

use crate::models::GallerySnapshot;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`GallerySnapshot`] to `{json_output_dir}/{local_date}/gallery.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_gallery(
    snapshot: &GallerySnapshot,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        snapshot.local_date
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/gallery.json", full_json_dir);
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, items = snapshot.items.len(), "Wrote JSON gallery file");

    Ok(output_json_filename)
}
