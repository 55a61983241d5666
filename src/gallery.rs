//! Primary fetch with archive fallback.
//!
//! One call to [`fetch_apod`] is one fetch-and-render cycle:
//!
//! 1. The API is asked for `count` entries and filtered to images
//! 2. If it rejected the request or produced no images, the archive is
//!    scraped for the same count
//! 3. The outcome is rendered through a [`GalleryView`]
//!
//! The API is one round trip but rate limited; the archive costs `1 + count`
//! round trips, so it only runs when needed. Unexpected failures anywhere in
//! the cycle degrade to [`GalleryState::Failed`] rather than an error.

use crate::api::{ApiReply, ApodApi};
use crate::models::{Item, ItemSource};
use crate::scrapers::archive::{ArchiveSource, fetch_from_archive};
use crate::scrapers::proxy::PageFetcher;
use std::error::Error;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

pub const LOADING_MESSAGE: &str = "Loading Space Images...";
pub const EMPTY_MESSAGE: &str = "No image results returned from archive.";
pub const FAILED_MESSAGE: &str = "Error loading images.";

/// What the gallery currently shows. Each cycle replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryState {
    Loading,
    Items { source: ItemSource, items: Vec<Item> },
    /// Neither path produced a renderable item.
    Empty,
    /// Something unexpected went wrong; details are in the log.
    Failed,
}

impl GalleryState {
    pub fn items(&self) -> &[Item] {
        match self {
            GalleryState::Items { items, .. } => items,
            _ => &[],
        }
    }
}

/// Rendering collaborator for the gallery.
pub trait GalleryView {
    fn render(&mut self, state: &GalleryState);
}

/// Run one fetch-and-render cycle for `count` items.
///
/// The final state is rendered into `view` and also returned so callers can
/// persist it.
#[instrument(level = "info", skip(api, fetcher, archive, view))]
pub async fn fetch_apod<A, F, V>(
    count: usize,
    api: &A,
    fetcher: &F,
    archive: &ArchiveSource,
    view: &mut V,
) -> GalleryState
where
    A: ApodApi,
    F: PageFetcher,
    V: GalleryView,
{
    let t0 = Instant::now();
    view.render(&GalleryState::Loading);

    let state = match acquire(count, api, fetcher, archive).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Error fetching APOD (API + archive fallback)");
            GalleryState::Failed
        }
    };

    info!(
        items = state.items().len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Gallery cycle complete"
    );
    view.render(&state);
    state
}

async fn acquire<A, F>(
    count: usize,
    api: &A,
    fetcher: &F,
    archive: &ArchiveSource,
) -> Result<GalleryState, Box<dyn Error>>
where
    A: ApodApi,
    F: PageFetcher,
{
    match api.request(count).await? {
        ApiReply::Entries(payload) => {
            let entries = payload.into_entries();
            let total = entries.len();
            let images: Vec<Item> = entries
                .into_iter()
                .filter(|entry| entry.is_image())
                .map(Item::from)
                .filter(Item::is_renderable)
                .collect();

            if !images.is_empty() {
                info!(count = images.len(), total, "Rendering APOD items from API");
                return Ok(GalleryState::Items {
                    source: ItemSource::Api,
                    items: images,
                });
            }
            info!(total, "API returned no image entries");
        }
        ApiReply::Rejected(status) => {
            warn!(%status, "NASA API responded with non-success status");
        }
    }

    warn!("Falling back to archive scraping");
    let items = fetch_from_archive(fetcher, archive, count).await;
    if items.is_empty() {
        Ok(GalleryState::Empty)
    } else {
        Ok(GalleryState::Items {
            source: ItemSource::Archive,
            items,
        })
    }
}
