//! GitHub Flavored Markdown rules: strikethrough, task list checkboxes and
//! pipe tables.

use super::{Filter, Rule};
use crate::node::NodeRef;

/// Create all GFM rules in registration order
pub fn gfm_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("strikethrough", strikethrough_rule()),
        ("taskListItems", task_list_items_rule()),
        ("tableCell", table_cell_rule()),
        ("tableRow", table_row_rule()),
        ("tableCaption", table_caption_rule()),
        ("table", table_rule()),
    ]
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags(&["del", "s", "strike"], |_, content, _| format!("~{}~", content))
}

fn task_list_items_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            tag == "input"
                && node
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
                && node.parent_tag() == Some("li")
        }),
        |node, _, _| {
            if node.has_attr("checked") {
                "[x] ".to_string()
            } else {
                "[ ] ".to_string()
            }
        },
    )
}

fn table_cell_rule() -> Rule {
    Rule::for_tags(&["th", "td"], |node, content, _| {
        let prefix = if node.is_first_child() { "| " } else { " " };
        let cell = content.trim().replace('\n', " ").replace('|', "\\|");
        format!("{}{} |", prefix, cell)
    })
}

fn table_row_rule() -> Rule {
    Rule::for_tag("tr", |node, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        let mut row = format!("\n{}", content);
        if is_heading_row(node) {
            row.push('\n');
            row.push_str(&separator_row(node));
        }
        row
    })
}

fn table_caption_rule() -> Rule {
    Rule::for_tag("caption", |_, content, _| format!("{}\n\n", content.trim()))
}

fn table_rule() -> Rule {
    Rule::for_tag("table", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", content)
    })
}

/// A row is the heading row when it opens a `thead`, or when it is the very
/// first row of a table that has no `thead`.
fn is_heading_row(row: &NodeRef) -> bool {
    let Some(parent) = row.parent() else {
        return false;
    };

    let first_row = parent
        .element_children()
        .position(|c| c.tag_name() == "tr")
        == Some(row.index());
    if !first_row {
        return false;
    }

    match parent.tag_name() {
        "thead" => true,
        "table" => !has_thead(parent),
        "tbody" => match parent.parent() {
            Some(table) if table.tag_name() == "table" => {
                // Only the first section holding rows can open the table
                !has_thead(table)
                    && table
                        .element_children()
                        .take(parent.index())
                        .all(|c| !matches!(c.tag_name(), "tbody" | "tr"))
            }
            _ => false,
        },
        _ => false,
    }
}

fn has_thead(table: &NodeRef) -> bool {
    table.element_children().any(|c| c.tag_name() == "thead")
}

fn separator_row(row: &NodeRef) -> String {
    let mut separator = String::from("|");
    for cell in row
        .element_children()
        .filter(|c| matches!(c.tag_name(), "th" | "td"))
    {
        let border = match cell.attr("align").map(|a| a.trim().to_lowercase()).as_deref() {
            Some("left") => ":--",
            Some("right") => "--:",
            Some("center") => ":-:",
            _ => "---",
        };
        separator.push(' ');
        separator.push_str(border);
        separator.push_str(" |");
    }
    separator
}
