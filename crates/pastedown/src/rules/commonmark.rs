//! CommonMark rules for HTML to Markdown conversion.
//!
//! These are the base layer. Everything registered later can override them.

use super::{Filter, Rule};
use crate::language::language_from_class;
use crate::utilities::{
    clean_attribute, escape_alt, escape_title, fence_for, indent_continuation, squeeze_newlines,
    wrap_inline,
};

/// Create all CommonMark rules in registration order
pub fn commonmark_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("paragraph", paragraph_rule()),
        ("lineBreak", line_break_rule()),
        ("heading", heading_rule()),
        ("blockquote", blockquote_rule()),
        ("list", list_rule()),
        ("listItem", list_item_rule()),
        ("fencedCodeBlock", fenced_code_block_rule()),
        ("horizontalRule", horizontal_rule()),
        ("inlineLink", inline_link_rule()),
        ("emphasis", emphasis_rule()),
        ("strong", strong_rule()),
        ("code", code_rule()),
        ("image", image_rule()),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::new(
        Filter::tags(&["h1", "h2", "h3", "h4", "h5", "h6"]),
        |node, content, _| {
            let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

            let content = content.trim();
            if content.is_empty() {
                return String::new();
            }

            format!("\n\n{} {}\n\n", "#".repeat(level), content)
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = squeeze_newlines(content.trim());
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::new(Filter::tags(&["ul", "ol"]), |node, content, _| {
        let content = content.trim();

        if node.parent_tag() == Some("li") {
            // Nested lists hang off the parent item; it indents them
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let prefix = match node.parent() {
            Some(parent) if parent.tag_name() == "ol" => {
                let start = parent
                    .attr("start")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                format!("{}. ", start + node.index())
            }
            _ => format!("{} ", options.bullet_list_marker),
        };

        let content = indent_continuation(content.trim(), prefix.len());
        format!("{}{}\n", prefix, content)
    })
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            tag == "pre" && node.element_children().any(|c| c.tag_name() == "code")
        }),
        |node, _, options| {
            let Some(code_node) = node.element_children().find(|c| c.tag_name() == "code") else {
                return String::new();
            };

            let code_content = code_node.text_content();
            let language = code_node
                .attr("class")
                .and_then(language_from_class)
                .unwrap_or("");

            let fence = fence_for(&code_content, &options.fence);
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code_content.trim_end_matches('\n'),
                fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            let title = clean_attribute(node.attr("title"));

            if href.is_empty() && title.is_empty() {
                return content.to_string();
            }

            let title_part = if title.is_empty() {
                String::new()
            } else {
                format!(" \"{}\"", escape_title(&title))
            };

            format!("[{}]({}{})", content.trim(), href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::new(Filter::tags(&["em", "i"]), |_, content, options| {
        wrap_inline(content, &options.em_delimiter.to_string())
    })
}

fn strong_rule() -> Rule {
    Rule::new(Filter::tags(&["strong", "b"]), |_, content, options| {
        wrap_inline(content, &options.strong_delimiter)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            // Match <code> that is NOT inside <pre>
            tag == "code" && !node.in_pre()
        }),
        |node, _, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }

            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);

            // Pad when the content itself starts or ends with a backtick
            if content.starts_with('`') || content.ends_with('`') {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        let title = clean_attribute(node.attr("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", escape_title(&title))
        };

        format!("![{}]({}{})", escape_alt(&alt), src, title_part)
    })
}
