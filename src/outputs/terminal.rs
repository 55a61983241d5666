//! Terminal rendering of the gallery.

use crate::gallery::{EMPTY_MESSAGE, FAILED_MESSAGE, GalleryState, GalleryView, LOADING_MESSAGE};
use crate::models::Item;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::warn;

/// Format the gallery as numbered entries with title, date and image URL.
pub fn format_state(state: &GalleryState) -> String {
    match state {
        GalleryState::Loading => format!("🔭 {LOADING_MESSAGE}\n"),
        GalleryState::Empty => format!("{EMPTY_MESSAGE}\n"),
        GalleryState::Failed => format!("{FAILED_MESSAGE}\n"),
        GalleryState::Items { source, items } => {
            let mut out = String::new();
            let _ = writeln!(out, "{} items ({})", items.len(), source);
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(out);
                out.push_str(&format_item(i + 1, item));
            }
            out
        }
    }
}

fn format_item(number: usize, item: &Item) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{number}] {}", item.title);
    if !item.date.is_empty() {
        let _ = writeln!(out, "    {}", item.date);
    }
    let _ = writeln!(out, "    {}", item.image_url);
    out
}

/// [`GalleryView`] that writes each render to a sink (stdout by default).
pub struct TerminalView<W: Write = io::Stdout> {
    out: W,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> GalleryView for TerminalView<W> {
    fn render(&mut self, state: &GalleryState) {
        let text = format_state(state);
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write gallery to terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSource;

    fn item(title: &str, date: &str) -> Item {
        Item {
            image_url: format!("https://apod.nasa.gov/apod/image/{}.jpg", title.to_lowercase()),
            hd_url: None,
            title: title.to_string(),
            date: date.to_string(),
            explanation: "Not shown in the gallery.".to_string(),
        }
    }

    #[test]
    fn test_items_are_numbered_without_explanation() {
        let state = GalleryState::Items {
            source: ItemSource::Archive,
            items: vec![item("Orion", "2023-01-05"), item("Undated", "")],
        };

        let text = format_state(&state);
        assert!(text.starts_with("2 items (archive)\n"));
        assert!(text.contains("[1] Orion\n    2023-01-05\n    https://apod.nasa.gov/apod/image/orion.jpg\n"));
        assert!(text.contains("[2] Undated\n    https://apod.nasa.gov/apod/image/undated.jpg\n"));
        assert!(!text.contains("Not shown"));
    }

    #[test]
    fn test_placeholder_messages() {
        assert!(format_state(&GalleryState::Loading).contains(LOADING_MESSAGE));
        assert_eq!(format_state(&GalleryState::Empty), format!("{EMPTY_MESSAGE}\n"));
        assert_eq!(format_state(&GalleryState::Failed), format!("{FAILED_MESSAGE}\n"));
    }

    #[test]
    fn test_view_writes_each_render() {
        let mut buf = Vec::new();
        {
            let mut view = TerminalView::new(&mut buf);
            view.render(&GalleryState::Loading);
            view.render(&GalleryState::Empty);
        }

        let written = String::from_utf8(buf).unwrap();
        assert!(written.contains(LOADING_MESSAGE));
        assert!(written.ends_with(&format!("{EMPTY_MESSAGE}\n")));
    }
}
