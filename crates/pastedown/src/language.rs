//! Language detection for code blocks.
//!
//! A coarse keyword heuristic used to label fenced code blocks that carry no
//! `language-*` class, so the Markdown renderer can still highlight them.
//! It is a best-effort label, not a classifier.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language-(\w+)").expect("language class pattern is valid"));

/// Keywords, statement openers and builtin calls that mark Python source
const PYTHON_MARKERS: &[&str] = &[
    "print(", "def ", "import ", "from ", "class ", "lambda ", "if __name__",
    "async def ", "await ", "try:", "except ", "with ", "for ", "while ",
    "return ", "yield ", "raise ", "isinstance(", "type(", "len(", "str(",
    "int(", "float(", "list(", "dict(", "set(", "tuple(", "range(", "map(",
    "filter(", "zip(", "#",
];

const CPP_MARKERS: &[&str] = &["#include", "std::", "cout", "cin"];

const JAVASCRIPT_MARKERS: &[&str] = &["console.log", "function ", "const ", "let "];

const JAVA_MARKERS: &[&str] = &["public class", "system.out.println"];

const HTML_MARKERS: &[&str] = &["<html", "<!doctype"];

/// Language label attached to a fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageLabel {
    Python,
    Cpp,
    JavaScript,
    Java,
    Html,
    Css,
    /// Unknown language
    Text,
}

impl LanguageLabel {
    /// Info string used after the opening fence
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLabel::Python => "python",
            LanguageLabel::Cpp => "cpp",
            LanguageLabel::JavaScript => "javascript",
            LanguageLabel::Java => "java",
            LanguageLabel::Html => "html",
            LanguageLabel::Css => "css",
            LanguageLabel::Text => "text",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != LanguageLabel::Text
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the language of a code snippet.
///
/// Checks run in a fixed order and the first hit wins. Python goes first and
/// claims any snippet containing `#`, so `#include` sources come out as Python
/// too; C++ is only recognised through its other markers.
pub fn detect_language(code: &str) -> LanguageLabel {
    let lower = code.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has_any(PYTHON_MARKERS) {
        LanguageLabel::Python
    } else if has_any(CPP_MARKERS) {
        LanguageLabel::Cpp
    } else if has_any(JAVASCRIPT_MARKERS) {
        LanguageLabel::JavaScript
    } else if has_any(JAVA_MARKERS) {
        LanguageLabel::Java
    } else if has_any(HTML_MARKERS) {
        LanguageLabel::Html
    } else if lower.contains('{') && (lower.contains("color:") || lower.contains("background:")) {
        LanguageLabel::Css
    } else {
        LanguageLabel::Text
    }
}

/// Extract the language name from a `class` attribute such as
/// `"hljs language-rust"`.
pub fn language_from_class(class: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
