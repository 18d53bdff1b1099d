//! TurndownService - the main entry point for HTML to Markdown conversion.

#[cfg(feature = "html")]
use std::any::Any;
#[cfg(feature = "html")]
use std::panic::{self, AssertUnwindSafe};

use crate::node::{Node, NodeRef};
use crate::postprocess::{label_code_fences, post_process};
use crate::rules::{editor_rules, gfm_rules, Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown, is_block};
#[cfg(feature = "html")]
use crate::{Result, TurndownError};

/// Deepest element nesting [`TurndownService::turndown`] accepts by default
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Tags dropped with their content by the editor service
const NOISE_TAGS: &[&str] = &["script", "style", "template", "noscript", "title", "meta", "link"];

/// Options for TurndownService
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TurndownOptions {
    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Alt text for images that have none
    pub default_image_alt: String,

    /// Keep whitespace inside `<pre>` when sanitizing. Off by default, which
    /// flattens multi-line code pasted as HTML onto one line.
    pub preserve_preformatted: bool,

    /// Largest HTML input, in bytes, that will be converted. Larger inputs
    /// are returned unconverted. `None` means no limit.
    pub max_input_len: Option<usize>,

    /// Label unlabelled fenced code blocks with a detected language
    pub detect_code_language: bool,

    /// Deepest element nesting that will be converted. Deeper inputs are
    /// returned unconverted instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            hr: "---".to_string(),
            bullet_list_marker: '-',
            fence: "```".to_string(),
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            default_image_alt: "image".to_string(),
            preserve_preformatted: false,
            max_input_len: None,
            detect_code_language: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The main service for converting HTML to Markdown.
///
/// Rules are added while the service is being built. Once built it is only
/// read, so one instance can be shared across threads.
pub struct TurndownService {
    options: TurndownOptions,
    rules: Rules,
}

impl TurndownService {
    /// Create a new TurndownService with default options and CommonMark rules.
    ///
    /// Use [`TurndownService::editor`] for the full paste pipeline.
    pub fn new() -> Self {
        Self::with_options(TurndownOptions::default())
    }

    /// Create a TurndownService with custom options and CommonMark rules
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// The post editor's converter: CommonMark, then GFM, then the editor
    /// overrides, with script/style noise removed.
    pub fn editor() -> Self {
        Self::editor_with_options(TurndownOptions::default())
    }

    /// The post editor's converter with custom options
    pub fn editor_with_options(options: TurndownOptions) -> Self {
        let mut service = Self::with_options(options);
        service
            .use_plugin(gfm)
            .use_plugin(editor)
            .remove(Filter::tags(NOISE_TAGS));
        service
    }

    /// Add a custom rule. It takes precedence over every rule added before it.
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    /// Get the rule registry
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Convert HTML to Markdown, falling back to the input on any failure.
    ///
    /// Empty input, or input that is empty once sanitized, yields an empty
    /// string. If conversion fails or panics the original HTML is returned
    /// unchanged, so pasted content is never lost.
    #[cfg(feature = "html")]
    pub fn html_to_markdown(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        match self.turndown_guarded(html) {
            Ok(markdown) => markdown,
            Err(err) => {
                tracing::warn!(error = %err, len = html.len(), "HTML to Markdown conversion failed, keeping original HTML");
                html.to_string()
            }
        }
    }

    /// Convert HTML to Markdown
    #[cfg(feature = "html")]
    pub fn turndown(&self, html: &str) -> Result<String> {
        if let Some(limit) = self.options.max_input_len {
            if html.len() > limit {
                return Err(TurndownError::InputTooLarge {
                    len: html.len(),
                    limit,
                });
            }
        }

        let clean = if self.options.preserve_preformatted {
            crate::sanitize::sanitize_preserving_pre(html)
        } else {
            crate::sanitize::sanitize(html)
        };
        if clean.is_empty() {
            return Ok(String::new());
        }

        tracing::debug!(input_len = html.len(), sanitized_len = clean.len(), "converting HTML");
        let root = crate::html::parse_html_with_depth(&clean, self.options.max_depth)?;
        Ok(self.turndown_node(&root))
    }

    /// [`TurndownService::turndown`] with panics from rules turned into errors
    #[cfg(feature = "html")]
    fn turndown_guarded(&self, html: &str) -> Result<String> {
        panic::catch_unwind(AssertUnwindSafe(|| self.turndown(html))).unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(panic = %message, "conversion rule panicked");
            Err(TurndownError::Conversion(message))
        })
    }

    /// Convert a node tree to Markdown
    pub fn turndown_node(&self, root: &Node) -> String {
        let raw = match root {
            Node::Text(text) => escape_markdown(collapse_whitespace(text).trim()),
            Node::Element(_) => self.process_node(&NodeRef::new(root)),
        };

        let markdown = post_process(&raw);
        if self.options.detect_code_language {
            label_code_fences(&markdown)
        } else {
            markdown
        }
    }

    /// Process children of an element
    fn process_children(&self, parent: &NodeRef) -> String {
        let children: Vec<&Node> = parent.children().collect();
        let preformatted = parent.in_pre() || parent.tag_name() == "pre";
        let mut result = String::new();
        let mut element_index = 0;

        for (i, child) in children.iter().enumerate() {
            match child {
                Node::Text(text) if preformatted => result.push_str(text),
                Node::Text(text) => {
                    let collapsed = collapse_whitespace(text);
                    let mut text = collapsed.as_str();

                    // Whitespace next to block boundaries carries no meaning
                    let after_block = match i.checked_sub(1) {
                        Some(prev) => is_block_element(children[prev]),
                        None => is_block(parent.tag_name()),
                    };
                    let before_block = match children.get(i + 1) {
                        Some(next) => is_block_element(next),
                        None => is_block(parent.tag_name()),
                    };
                    if after_block {
                        text = text.trim_start();
                    }
                    if before_block {
                        text = text.trim_end();
                    }

                    if !text.is_empty() {
                        result.push_str(&escape_markdown(text));
                    }
                }
                Node::Element(_) => {
                    let child_ref = NodeRef::child(child, parent, element_index);
                    element_index += 1;
                    result.push_str(&self.process_node(&child_ref));
                }
            }
        }

        result
    }

    /// Process a single element
    fn process_node(&self, node: &NodeRef) -> String {
        if self.rules.should_remove(node, &self.options) {
            return String::new();
        }

        // Process children first
        let content = self.process_children(node);

        match self.rules.for_node(node, &self.options) {
            Some(rule) => {
                if tracing::enabled!(tracing::Level::TRACE) {
                    let name = self.rules.name_for_node(node, &self.options);
                    tracing::trace!(tag = node.tag_name(), rule = ?name, "applying rule");
                }
                rule.replace(node, &content, &self.options)
            }
            // Default: return content as-is
            None => content,
        }
    }
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Plugin registering the GitHub Flavored Markdown rules
pub fn gfm(service: &mut TurndownService) {
    for (key, rule) in gfm_rules() {
        service.add_rule(key, rule);
    }
}

/// Plugin registering the post editor's overriding rules
pub fn editor(service: &mut TurndownService) {
    for (key, rule) in editor_rules() {
        service.add_rule(key, rule);
    }
}

fn is_block_element(node: &Node) -> bool {
    node.is_element() && is_block(node.tag_name())
}

#[cfg(feature = "html")]
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "rule panicked".to_string()
    }
}
