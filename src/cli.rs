//! Command-line interface definitions for the APOD gallery.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and the proxy can also be provided via environment variables.

use clap::Parser;

/// Command-line arguments for the APOD gallery.
///
/// # Examples
///
/// ```sh
/// # Nine entries, printed to the terminal
/// apod_gallery
///
/// # With a personal API key and gallery files written out
/// apod_gallery --api-key YOUR_KEY -j ./json -m ./markdown
///
/// # Scrape through a passthrough proxy and open the third item's details
/// apod_gallery --proxy 'https://api.allorigins.win/raw?url=' --detail 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of entries to request
    #[arg(short = 'n', long, default_value_t = 9, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub count: u16,

    /// NASA API key (defaults to the shared DEMO_KEY)
    #[arg(long, env = "NASA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Passthrough proxy prefix for archive pages; the target URL is appended percent-encoded
    #[arg(long, env = "APOD_PROXY")]
    pub proxy: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for the JSON gallery file
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown gallery file
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Show the detail view for this gallery item (1-based)
    #[arg(long)]
    pub detail: Option<usize>,
}
