//! Gallery renderers and file outputs.
//!
//! # Submodules
//!
//! - [`terminal`]: The live [`GalleryView`](crate::gallery::GalleryView) printed to stdout
//! - [`json`]: Writes a [`GallerySnapshot`](crate::models::GallerySnapshot) for API consumption
//! - [`markdown`]: Renders a snapshot as a gallery page with per-item details
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── gallery.json
//!
//! markdown_output_dir/
//! └── 2025-05-06_gallery.md
//! ```

pub mod json;
pub mod markdown;
pub mod terminal;
