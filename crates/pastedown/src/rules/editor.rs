//! Post editor rules, registered on top of CommonMark and GFM.
//!
//! They override the lower layers for strikethrough, task list items, code
//! blocks, blockquotes and images.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule};
use crate::language::language_from_class;
use crate::node::Node;
use crate::utilities::{
    clean_attribute, escape_alt, escape_title, fence_for, indent_continuation, squeeze_newlines,
    wrap_inline,
};

/// Leftover `[x] ` / `[ ] ` marker at the start of a task item's content
static CHECKBOX_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[[ xX]\]\s*").expect("checkbox state pattern is valid"));

/// Create all editor rules in registration order
pub fn editor_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("strikethrough", strikethrough_rule()),
        ("taskList", task_list_rule()),
        ("codeBlock", code_block_rule()),
        ("blockquote", blockquote_rule()),
        ("image", image_rule()),
    ]
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags(&["del", "s"], |_, content, _| wrap_inline(content, "~~"))
}

fn is_checkbox(node: &Node) -> bool {
    node.tag_name() == "input"
        && node
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
}

fn task_list_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "li" && node.node.find_descendant(is_checkbox).is_some()),
        |node, content, _| {
            let checked = node
                .node
                .find_descendant(is_checkbox)
                .is_some_and(|checkbox| checkbox.has_attr("checked"));
            let text = CHECKBOX_STATE.replace(content, "");
            let text = indent_continuation(text.trim(), 2);

            format!("- [{}] {}\n", if checked { "x" } else { " " }, text)
        },
    )
}

fn code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            tag == "pre" && node.children().next().is_some_and(|c| c.tag_name() == "code")
        }),
        |node, content, options| {
            let Some(code) = node.children().next() else {
                return content.to_string();
            };

            // Detection for unlabelled blocks happens after conversion
            let language = code
                .attr("class")
                .and_then(language_from_class)
                .unwrap_or("");
            let code = code.text_content();
            let code = code.strip_suffix('\n').unwrap_or(&code);
            let fence = fence_for(code, &options.fence);

            format!("\n\n{}{}\n{}\n{}\n\n", fence, language, code, fence)
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = squeeze_newlines(content.trim());
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn image_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "img" && node.has_attr("src")),
        |node, _, options| {
            let alt = clean_attribute(node.attr("alt"));
            let alt = escape_alt(if alt.is_empty() {
                options.default_image_alt.as_str()
            } else {
                alt.as_str()
            });
            let src = clean_attribute(node.attr("src"));
            let title = clean_attribute(node.attr("title"));

            if title.is_empty() {
                format!("![{}]({})", alt, src)
            } else {
                format!("![{}]({} \"{}\")", alt, src, escape_title(&title))
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::node::Node;
    use crate::{TurndownOptions, TurndownService};

    fn convert(node: &Node) -> String {
        TurndownService::editor().turndown_node(node)
    }

    fn el(tag: &str, text: &str) -> Node {
        Node::element(tag).with_child(Node::text(text))
    }

    fn checkbox(checked: bool) -> Node {
        let mut attrs = vec![("type", "checkbox")];
        if checked {
            attrs.push(("checked", ""));
        }
        Node::element_with_attrs("input", attrs)
    }

    #[test]
    fn test_strikethrough_overrides_gfm() {
        assert_eq!(convert(&el("del", "x")), "~~x~~");
        assert_eq!(convert(&el("s", "x")), "~~x~~");
        // <strike> is only covered by the GFM layer
        assert_eq!(convert(&el("strike", "x")), "~x~");
    }

    #[test]
    fn test_task_items() {
        let ul = Node::element("ul")
            .with_child(Node::element("li").with_child(checkbox(true)).with_child(Node::text(" Done")))
            .with_child(Node::element("li").with_child(checkbox(false)).with_child(Node::text("Todo")));
        assert_eq!(convert(&ul), "- [x] Done\n- [ ] Todo");
    }

    #[test]
    fn test_task_item_with_nested_checkbox() {
        let li = Node::element("li").with_child(
            Node::element("label")
                .with_child(checkbox(true))
                .with_child(Node::text("Wrapped")),
        );
        let ul = Node::element("ul").with_child(li);
        assert_eq!(convert(&ul), "- [x] Wrapped");
    }

    #[test]
    fn test_code_block_language_from_class() {
        let pre = Node::element("pre").with_child(
            Node::element_with_attrs("code", vec![("class", "language-python")])
                .with_child(Node::text("print(1)")),
        );
        assert_eq!(convert(&pre), "```python\nprint(1)\n```");
    }

    #[test]
    fn test_code_block_is_verbatim() {
        let pre = Node::element("pre").with_child(
            Node::element_with_attrs("code", vec![("class", "language-text")])
                .with_child(Node::text("a  *b*\n  [c]_d_")),
        );
        assert_eq!(convert(&pre), "```text\na  *b*\n  [c]_d_\n```");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let quote = Node::element("blockquote")
            .with_child(el("p", "First"))
            .with_child(el("p", "Second"));
        assert_eq!(convert(&quote), "> First\n> \n> Second");
    }

    #[test]
    fn test_image_default_alt() {
        let img = Node::element_with_attrs("img", vec![("src", "x.png")]);
        assert_eq!(convert(&img), "![image](x.png)");

        let titled = Node::element_with_attrs(
            "img",
            vec![("src", "x.png"), ("alt", ""), ("title", "Cover")],
        );
        assert_eq!(convert(&titled), "![image](x.png \"Cover\")");
    }

    #[test]
    fn test_image_custom_default_alt() {
        let options = TurndownOptions {
            default_image_alt: "photo".to_string(),
            ..Default::default()
        };
        let service = TurndownService::editor_with_options(options);
        let img = Node::element_with_attrs("img", vec![("src", "x.png")]);
        assert_eq!(service.turndown_node(&img), "![photo](x.png)");
    }

    #[test]
    fn test_image_alt_brackets_are_escaped() {
        let img = Node::element_with_attrs("img", vec![("src", "a.png"), ("alt", "x]y")]);
        assert_eq!(convert(&img), "![x&#93;y](a.png)");

        let titled = Node::element_with_attrs(
            "img",
            vec![("src", "a.png"), ("alt", "[1]"), ("title", "say \"hi\"")],
        );
        assert_eq!(convert(&titled), r#"![&#91;1&#93;](a.png "say \"hi\"")"#);
    }
}
