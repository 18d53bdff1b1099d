//! Rich-paste gating for the post editor.
//!
//! A paste is only converted when its `text/html` payload carries structural
//! formatting. Everything else, including plain-text pastes, is left to the
//! editor's default behavior.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::service::TurndownService;

/// Clipboard format holding the HTML flavor of a paste
pub const HTML_MIME: &str = "text/html";

/// Opening tags that mark a payload as rich
static RICH_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:h[1-3]|strong|em|ul|ol|blockquote|code|pre)[\s/>]")
        .expect("rich tag pattern is valid")
});

/// Read access to the formats of a clipboard payload
pub trait ClipboardData {
    /// The payload for a MIME type, if the clipboard has it
    fn get_data(&self, mime: &str) -> Option<String>;
}

impl ClipboardData for HashMap<String, String> {
    fn get_data(&self, mime: &str) -> Option<String> {
        self.get(mime).cloned()
    }
}

impl ClipboardData for HashMap<&str, &str> {
    fn get_data(&self, mime: &str) -> Option<String> {
        self.get(mime).map(|data| data.to_string())
    }
}

/// Whether HTML contains formatting worth converting: a heading up to `h3`,
/// `strong`, `em`, a list, a blockquote, or code.
pub fn has_rich_formatting(html: &str) -> bool {
    RICH_TAG.is_match(html)
}

/// What the editor should do with a paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Cancel the default paste and insert this Markdown at the cursor
    Insert(String),
    /// Let the editor paste as usual
    PassThrough,
}

impl PasteOutcome {
    /// Apply the outcome to editor text at a byte cursor position.
    ///
    /// Returns the new text and the cursor position just after the inserted
    /// Markdown, or `None` for [`PasteOutcome::PassThrough`]. A cursor past
    /// the end or inside a character is moved back to the nearest boundary.
    pub fn splice_into(&self, text: &str, cursor: usize) -> Option<(String, usize)> {
        let PasteOutcome::Insert(markdown) = self else {
            return None;
        };

        let mut at = cursor.min(text.len());
        while !text.is_char_boundary(at) {
            at -= 1;
        }

        let mut out = String::with_capacity(text.len() + markdown.len());
        out.push_str(&text[..at]);
        out.push_str(markdown);
        out.push_str(&text[at..]);
        Some((out, at + markdown.len()))
    }
}

/// Decides, per paste event, whether to convert the clipboard HTML
#[derive(Clone)]
pub struct PasteHandler {
    service: Arc<TurndownService>,
    enabled: bool,
}

impl PasteHandler {
    /// Handler using the editor's default converter, enabled
    pub fn new() -> Self {
        Self::with_service(Arc::new(TurndownService::editor()))
    }

    /// Handler sharing an existing converter
    pub fn with_service(service: Arc<TurndownService>) -> Self {
        Self {
            service,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn conversion on or off
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip conversion and return the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Decide what to do with a paste.
    ///
    /// Converts only when conversion is enabled, the clipboard has non-blank
    /// HTML with rich formatting, and the result is non-empty and differs
    /// from the input.
    pub fn handle(&self, clipboard: &dyn ClipboardData) -> PasteOutcome {
        if !self.enabled {
            return PasteOutcome::PassThrough;
        }

        let Some(html) = clipboard.get_data(HTML_MIME) else {
            return PasteOutcome::PassThrough;
        };
        if html.trim().is_empty() || !has_rich_formatting(&html) {
            return PasteOutcome::PassThrough;
        }

        let markdown = self.service.html_to_markdown(&html);
        if markdown.is_empty() || markdown == html {
            tracing::debug!(len = html.len(), "paste left unconverted");
            return PasteOutcome::PassThrough;
        }

        PasteOutcome::Insert(markdown)
    }
}

impl Default for PasteHandler {
    fn default() -> Self {
        Self::new()
    }
}
