//! # pastedown
//!
//! Convert rich HTML pasted into a post editor to Markdown.
//!
//! Conversion runs in stages: the raw clipboard HTML is sanitized, parsed into
//! a [`Node`] tree, walked by a layered rule registry (CommonMark, then GFM,
//! then the editor's own overrides) and finally post-processed. Code blocks
//! without a language class get a label from [`detect_language`].
//!
//! ## Design
//!
//! Rules are resolved by registration order: the last registered rule whose
//! filter matches a node handles it. Custom rules added with
//! [`TurndownService::add_rule`] therefore always override the built-in
//! layers.
//!
//! The conversion entry points fail open. If anything goes wrong, the
//! original HTML is handed back so a paste never loses content.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! let markdown = pastedown::html_to_markdown(
//!     "<h1>Title</h1><p><strong>Bold</strong> and <em>italic</em></p>",
//! );
//! assert_eq!(markdown, "# Title\n\n**Bold** and *italic*");
//! ```
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use pastedown::{Node, TurndownService};
//!
//! let service = TurndownService::editor();
//!
//! let mut del = Node::element("del");
//! del.add_child(Node::text("gone"));
//!
//! assert_eq!(service.turndown_node(&del), "~~gone~~");
//! ```

#[cfg(feature = "html")]
pub mod html;
mod language;
pub mod node;
#[cfg(feature = "html")]
mod paste;
mod postprocess;
mod rules;
mod sanitize;
mod service;
mod utilities;

#[cfg(feature = "html")]
pub use html::{parse_html, parse_html_with_depth};
pub use language::{detect_language, language_from_class, LanguageLabel};
pub use node::{Element, Node, NodeRef};
#[cfg(feature = "html")]
pub use paste::{has_rich_formatting, ClipboardData, PasteHandler, PasteOutcome, HTML_MIME};
pub use postprocess::{label_code_fences, post_process};
pub use rules::{Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use sanitize::{sanitize, sanitize_preserving_pre, NOISE_ATTRIBUTES};
pub use service::{editor, gfm, TurndownOptions, TurndownService, DEFAULT_MAX_DEPTH};
pub use utilities::{escape_markdown, is_block, BLOCK_ELEMENTS};

#[cfg(feature = "html")]
use once_cell::sync::Lazy;

/// Error type for pastedown operations
#[derive(Debug, thiserror::Error)]
pub enum TurndownError {
    #[error("input of {len} bytes exceeds the {limit} byte limit")]
    InputTooLarge { len: usize, limit: usize },

    #[error("elements nest deeper than the {limit} level limit")]
    TooDeep { limit: usize },

    #[error("conversion error: {0}")]
    Conversion(String),
}

pub type Result<T> = std::result::Result<T, TurndownError>;

#[cfg(feature = "html")]
static EDITOR: Lazy<TurndownService> = Lazy::new(TurndownService::editor);

/// Convert pasted HTML to Markdown with the editor's default configuration.
///
/// Returns an empty string for empty input and the original HTML unchanged if
/// conversion fails.
#[cfg(feature = "html")]
pub fn html_to_markdown(html: &str) -> String {
    EDITOR.html_to_markdown(html)
}
