//! HTML parsing support.
//!
//! This module parses HTML strings with scraper (html5ever) and converts them
//! to the [`Node`] tree used by the rule engine. html5ever tolerates malformed
//! markup; the only failure is nesting deeper than the configured limit.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;
use crate::service::DEFAULT_MAX_DEPTH;
use crate::{Result, TurndownError};

/// Parse an HTML fragment into a Node tree, nesting at most
/// [`DEFAULT_MAX_DEPTH`] elements deep.
///
/// The returned root is the synthetic `html` element html5ever wraps around
/// a fragment; comments and doctypes are dropped.
///
/// # Example
///
/// ```rust
/// use pastedown::{parse_html, TurndownService};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>").unwrap();
///
/// let service = TurndownService::editor();
/// let markdown = service.turndown_node(&node);
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Result<Node> {
    parse_html_with_depth(html, DEFAULT_MAX_DEPTH)
}

/// Parse an HTML fragment, failing with [`TurndownError::TooDeep`] when
/// elements nest more than `max_depth` levels below the root.
pub fn parse_html_with_depth(html: &str, max_depth: usize) -> Result<Node> {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element(), 0, max_depth)
}

/// Convert a scraper ElementRef to our Node structure.
///
/// Recursion stops at `max_depth`, which bounds both this call and every
/// later walk over the returned tree.
fn scraper_to_node(element: ElementRef, depth: usize, max_depth: usize) -> Result<Node> {
    if depth > max_depth {
        return Err(TurndownError::TooDeep { limit: max_depth });
    }

    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element, depth + 1, max_depth)?);
                }
            }
            _ => {}
        }
    }

    Ok(node)
}
