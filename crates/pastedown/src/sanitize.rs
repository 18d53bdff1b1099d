//! Pre-parse cleanup of pasted HTML.
//!
//! Rich-text editors decorate clipboard HTML with bookkeeping attributes and
//! comments. They are stripped with plain pattern removal before the parser
//! runs; nothing here builds a DOM.

use once_cell::sync::Lazy;
use regex::Regex;

/// Editor-injected attributes removed before parsing
pub const NOISE_ATTRIBUTES: &[&str] = &["data-block-id", "contenteditable", "spellcheck"];

static NOISE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<String> = NOISE_ATTRIBUTES.iter().map(|name| regex::escape(name)).collect();
    let pattern = format!(r#"(?i)\s(?:{})=(?:"[^"]*"|'[^']*')"#, names.join("|"));
    Regex::new(&pattern).expect("noise attribute pattern is valid")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static PRE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b.*?</pre\s*>").expect("pre block pattern is valid"));

/// Clean raw clipboard HTML.
///
/// Removes noise attributes and comments, collapses every whitespace run to a
/// single space and trims the result. Whitespace inside `<pre>` is collapsed
/// as well; see [`sanitize_preserving_pre`] for the variant that keeps it.
pub fn sanitize(raw: &str) -> String {
    clean(raw, false)
}

/// Like [`sanitize`], but `<pre>…</pre>` regions keep their whitespace.
pub fn sanitize_preserving_pre(raw: &str) -> String {
    clean(raw, true)
}

fn clean(raw: &str, preserve_pre: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let without_noise = NOISE_ATTRIBUTE.replace_all(raw, "");
    let collapsed = if preserve_pre {
        collapse_outside_pre(&without_noise)
    } else {
        WHITESPACE.replace_all(&without_noise, " ").into_owned()
    };

    COMMENT.replace_all(&collapsed, "").trim().to_string()
}

fn collapse_outside_pre(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for block in PRE_BLOCK.find_iter(html) {
        out.push_str(&WHITESPACE.replace_all(&html[last..block.start()], " "));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&WHITESPACE.replace_all(&html[last..], " "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   \n\t "), "");
    }

    #[test]
    fn test_strips_noise_attributes() {
        let raw = r#"<p data-block-id="abc-1" class="x" contenteditable="true" spellcheck='false'>Hi</p>"#;
        assert_eq!(sanitize(raw), r#"<p class="x">Hi</p>"#);
    }

    #[test]
    fn test_noise_attributes_are_case_insensitive() {
        let raw = r#"<div contentEditable="false">x</div>"#;
        assert_eq!(sanitize(raw), "<div>x</div>");
    }

    #[test]
    fn test_keeps_similar_attribute_names() {
        let raw = r#"<p data-block-idx="1">x</p>"#;
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_strips_comments() {
        let raw = "<!--StartFragment--><p>a</p><!-- multi\nline --><p>b</p><!--EndFragment-->";
        assert_eq!(sanitize(raw), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_collapses_whitespace_everywhere() {
        let raw = "<p>a\n\n   b</p>\n<pre><code>x\n    y</code></pre>";
        assert_eq!(sanitize(raw), "<p>a b</p> <pre><code>x y</code></pre>");
    }

    #[test]
    fn test_preserving_pre() {
        let raw = "<p>a\n\n   b</p>\n<pre><code>x\n    y</code></pre>\n<p>c   d</p>";
        assert_eq!(
            sanitize_preserving_pre(raw),
            "<p>a b</p> <pre><code>x\n    y</code></pre> <p>c d</p>"
        );
    }
}
