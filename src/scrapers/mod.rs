//! Archive scraping for when the APOD API is unavailable.
//!
//! The scraper follows the same two-phase pattern as any listing-driven
//! crawl:
//!
//! 1. **Indexing**: Parse the archive listing for daily page URLs
//! 2. **Fetching**: Download each daily page and extract an item from it
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`archive`] | Listing and daily page extraction, plus the sequential scrape |
//! | [`proxy`] | [`proxy::PageFetcher`] and its HTTP implementation |
//!
//! Daily pages are fetched strictly one at a time. Failed fetches are logged
//! and skipped without failing the batch.

pub mod archive;
pub mod proxy;
