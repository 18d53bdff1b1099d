//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "caption", "center", "dd", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "html", "isindex", "li",
    "main", "menu", "nav", "noframes", "noscript", "ol", "output", "p", "pre",
    "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Markdown escapes applied to text nodes, in order. Anchored patterns only
/// apply at the start of a text run.
static ESCAPES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\\", r"\\"),
        (r"\*", r"\*"),
        (r"^-", r"\-"),
        (r"^\+ ", r"\+ "),
        (r"^(=+)", r"\${1}"),
        (r"^(#{1,6}) ", r"\${1} "),
        (r"`", r"\`"),
        (r"^~~~", r"\~~~"),
        (r"\[", r"\["),
        (r"\]", r"\]"),
        (r"^>", r"\>"),
        (r"_", r"\_"),
        (r"^(\d+)\. ", r"${1}\. "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let re = Regex::new(pattern).expect("markdown escape pattern is valid");
        (re, replacement)
    })
    .collect()
});

/// Escape markdown special characters in a run of text
pub fn escape_markdown(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

static NEWLINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline run pattern is valid"));

/// Squeeze runs of three or more newlines down to a single blank line
pub fn squeeze_newlines(s: &str) -> String {
    NEWLINE_RUN.replace_all(s, "\n\n").into_owned()
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Escape brackets in image alt text as character references. Backslash
/// escapes would be undone by post-processing.
pub fn escape_alt(alt: &str) -> String {
    alt.replace('[', "&#91;").replace(']', "&#93;")
}

/// Escape double quotes in a link or image title
pub fn escape_title(title: &str) -> String {
    title.replace('"', "\\\"")
}

/// Indent every line after the first by `width` spaces. Blank lines stay blank.
pub fn indent_continuation(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap inline content in a delimiter, keeping surrounding whitespace outside
/// of it. Blank content yields an empty string.
pub fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{}{}{}{}{}", leading, delimiter, trimmed, delimiter, trailing)
}

/// Pick a code fence that cannot be closed by a run inside `code`
pub fn fence_for(code: &str, fence: &str) -> String {
    let Some(fence_char) = fence.chars().next() else {
        return "```".to_string();
    };
    let longest_run = code
        .chars()
        .fold((0usize, 0usize), |(max, current), c| {
            if c == fence_char {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0;

    if longest_run >= fence.chars().count() {
        fence_char.to_string().repeat(longest_run + 1)
    } else {
        fence.to_string()
    }
}
