//! Detail view for a single gallery item.
//!
//! The currently displayed item is held explicitly in [`DetailView`] rather
//! than in ambient state. Opening replaces whatever was shown; any dismissal
//! clears it so the full-resolution image is no longer referenced.

use crate::models::Item;
use std::fmt::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// How the detail view was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    /// Explicit close action (Enter, or end of input).
    CloseButton,
    /// Cancellation keypress.
    Escape,
}

impl Dismiss {
    /// Map a key name (or the raw ESC byte) to a dismissal.
    pub fn from_key(key: &str) -> Option<Self> {
        matches!(key, "Escape" | "Esc" | "\u{1b}").then_some(Dismiss::Escape)
    }
}

/// Wait for one line of input and map it to a dismissal.
///
/// ESC followed by Enter cancels; anything else, including end of input,
/// counts as the close action.
pub async fn read_dismissal<R: AsyncBufRead + Unpin>(mut input: R) -> Dismiss {
    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line).await {
        warn!(error = %e, "Failed to read dismissal input");
        return Dismiss::CloseButton;
    }
    Dismiss::from_key(line.trim_end_matches(['\r', '\n'])).unwrap_or(Dismiss::CloseButton)
}

#[derive(Debug, Default)]
pub struct DetailView {
    current: Option<Item>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, item: Item) {
        debug!(title = %item.title, "Opening detail view");
        self.current = Some(item);
    }

    /// Close the view, returning the item that was displayed, if any.
    pub fn close(&mut self, reason: Dismiss) -> Option<Item> {
        debug!(?reason, open = self.current.is_some(), "Closing detail view");
        self.current.take()
    }

    /// Render the open item as text, or `None` when closed.
    pub fn render(&self) -> Option<String> {
        let item = self.current.as_ref()?;
        let mut out = String::new();

        let _ = writeln!(out, "{}", item.title);
        if !item.date.is_empty() {
            let _ = writeln!(out, "{}", item.date);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Image: {}", item.detail_image_url());
        let _ = writeln!(out, "Alt:   {}", item.alt_text());
        if !item.explanation.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", item.explanation);
        }
        Some(out)
    }
}
