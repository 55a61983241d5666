//! # APOD Gallery
//!
//! Fetches NASA Astronomy Picture of the Day entries and renders them as a
//! gallery, with a detail view for any single entry.
//!
//! ## Features
//!
//! - Requests recent entries from the NASA APOD API and keeps the images
//! - Falls back to scraping the APOD HTML archive when the API is rate
//!   limited or returns no images
//! - Prints the gallery to the terminal and optionally writes JSON and
//!   Markdown gallery files
//!
//! ## Usage
//!
//! ```sh
//! apod_gallery -n 9 -j ./json -m ./markdown --detail 1
//! ```
//!
//! ## Architecture
//!
//! 1. **Primary**: One API request for `count` entries, filtered to images
//! 2. **Fallback**: Parse the archive listing, then fetch daily pages one at a
//!    time and extract image, title, date and explanation
//! 3. **Render**: Terminal gallery, optional file outputs, optional detail view

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::io::IsTerminal;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod detail;
mod gallery;
mod models;
mod outputs;
mod scrapers;
mod utils;

use api::HttpApodApi;
use cli::Cli;
use config::load_config;
use detail::{DetailView, Dismiss, read_dismissal};
use gallery::{GalleryState, fetch_apod};
use models::GallerySnapshot;
use outputs::{json, markdown, terminal::TerminalView};
use scrapers::proxy::ProxyFetcher;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("apod_gallery starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(count = args.count, ?args.json_output_dir, ?args.markdown_output_dir, "Parsed CLI arguments");

    // ---- Load config ----
    let config = load_config(args.config.as_deref()).await?.merge_cli(&args);
    let archive = config.archive_source()?;
    info!(
        endpoint = %config.api_endpoint,
        listing = %archive.listing_url,
        proxied = config.proxy.is_some(),
        "Configuration resolved"
    );

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable (fix perms or choose a different path)");
            return Err(e);
        }
    }

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .build()?;
    let api = HttpApodApi::new(client.clone(), config.api_endpoint.clone(), config.api_key.clone());
    let fetcher = ProxyFetcher::new(client, config.proxy.clone());

    // ---- Fetch and render ----
    let mut view = TerminalView::stdout();
    let state = fetch_apod(args.count as usize, &api, &fetcher, &archive, &mut view).await;

    if let GalleryState::Items { source, items } = &state {
        let now = Local::now();
        let snapshot = GallerySnapshot {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            source: *source,
            items: items.clone(),
        };

        if let Some(dir) = &args.json_output_dir {
            if let Err(e) = json::write_gallery(&snapshot, dir).await {
                error!(error = %e, "Failed to write JSON gallery");
            }
        }
        if let Some(dir) = &args.markdown_output_dir {
            if let Err(e) = markdown::write_gallery(&snapshot, dir).await {
                error!(error = %e, "Failed to write Markdown gallery");
            }
        }
    }

    // ---- Detail view ----
    if let Some(n) = args.detail {
        let mut detail = DetailView::new();
        match n.checked_sub(1).and_then(|i| state.items().get(i)) {
            Some(item) => {
                detail.open(item.clone());
                if let Some(text) = detail.render() {
                    println!("\n{}", text);
                }
                // Only wait for a key when someone is at the terminal.
                let reason = if std::io::stdin().is_terminal() {
                    println!("Press Enter to close (Esc then Enter to cancel)");
                    read_dismissal(tokio::io::BufReader::new(tokio::io::stdin())).await
                } else {
                    Dismiss::CloseButton
                };
                detail.close(reason);
            }
            None => warn!(requested = n, available = state.items().len(), "No gallery item to show details for"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = state.items().len(),
        "Execution complete"
    );

    Ok(())
}
