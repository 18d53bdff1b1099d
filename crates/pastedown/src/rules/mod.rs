//! Rule system for HTML to Markdown conversion.
//!
//! Rules form a layered registry: for a given node the most recently
//! registered rule whose filter matches wins. Base rules are registered
//! first, plugins and custom rules after them, so later layers override
//! earlier ones without forking them.
//!
//! Precedence follows registration order only, never filter specificity.
//! Two custom rules with overlapping filters silently shadow each other: the
//! one added last handles every node both accept.

mod commonmark;
mod editor;
mod gfm;
mod rule;

pub use commonmark::commonmark_rules;
pub use editor::editor_rules;
pub use gfm::gfm_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::service::TurndownOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// All conversion rules keyed by name, in registration order
    rules: IndexMap<String, Rule>,
    /// Remove rules (drop the node and its subtree)
    remove_rules: Vec<Filter>,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        let mut rules = Self::empty();
        for (key, rule) in commonmark_rules() {
            rules.add(key, rule);
        }
        rules
    }

    /// Create a registry with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
            remove_rules: Vec::new(),
        }
    }

    /// Register a rule on top of the existing ones.
    ///
    /// Re-registering a key replaces the old rule and moves it to the top.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.rules.shift_remove(key);
        self.rules.insert(key.to_string(), rule);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Number of registered conversion rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Find the winning rule for a node: the last registered one that matches
    pub fn for_node<'a>(&'a self, node: &NodeRef, options: &TurndownOptions) -> Option<&'a Rule> {
        self.rules
            .values()
            .rev()
            .find(|rule| rule.filter.matches(node, options))
    }

    /// Name of the winning rule for a node, mostly useful for tracing
    pub fn name_for_node(&self, node: &NodeRef, options: &TurndownOptions) -> Option<&str> {
        self.rules
            .iter()
            .rev()
            .find(|(_, rule)| rule.filter.matches(node, options))
            .map(|(key, _)| key.as_str())
    }

    /// Check if a node should be removed
    pub fn should_remove(&self, node: &NodeRef, options: &TurndownOptions) -> bool {
        // Don't remove if a conversion rule matches
        if self.for_node(node, options).is_some() {
            return false;
        }

        self.remove_rules
            .iter()
            .any(|filter| filter.matches(node, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn replace_with(rules: &Rules, node: &Node, content: &str) -> Option<String> {
        let options = TurndownOptions::default();
        let node_ref = NodeRef::new(node);
        rules
            .for_node(&node_ref, &options)
            .map(|rule| rule.replace(&node_ref, content, &options))
    }

    #[test]
    fn test_last_registered_match_wins() {
        let mut rules = Rules::empty();
        rules.add("first", Rule::for_tag("del", |_, c, _| format!("~{}~", c)));
        rules.add("second", Rule::for_tag("del", |_, c, _| format!("~~{}~~", c)));

        let del = Node::element("del");
        assert_eq!(replace_with(&rules, &del, "x").as_deref(), Some("~~x~~"));
    }

    #[test]
    fn test_non_matching_later_rule_does_not_shadow() {
        let mut rules = Rules::empty();
        rules.add("del", Rule::for_tag("del", |_, c, _| format!("~{}~", c)));
        rules.add("s", Rule::for_tag("s", |_, c, _| format!("-{}-", c)));

        let del = Node::element("del");
        assert_eq!(replace_with(&rules, &del, "x").as_deref(), Some("~x~"));
    }

    #[test]
    fn test_readding_key_moves_rule_to_top() {
        let mut rules = Rules::empty();
        rules.add("a", Rule::for_tag("del", |_, _, _| "a".to_string()));
        rules.add("b", Rule::for_tag("del", |_, _, _| "b".to_string()));
        rules.add("a", Rule::for_tag("del", |_, _, _| "a2".to_string()));

        let del = Node::element("del");
        assert_eq!(replace_with(&rules, &del, "").as_deref(), Some("a2"));
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_specificity_is_ignored() {
        let mut rules = Rules::empty();
        rules.add(
            "checked-li",
            Rule::new(
                Filter::predicate(|tag, node, _| tag == "li" && node.has_attr("data-checked")),
                |_, _, _| "specific".to_string(),
            ),
        );
        rules.add("any-li", Rule::for_tag("li", |_, _, _| "generic".to_string()));

        let li = Node::element_with_attrs("li", vec![("data-checked", "true")]);
        assert_eq!(replace_with(&rules, &li, "").as_deref(), Some("generic"));
    }

    #[test]
    fn test_unknown_tag_has_no_rule() {
        let rules = Rules::new();
        let span = Node::element("span");
        assert!(replace_with(&rules, &span, "x").is_none());
    }

    #[test]
    fn test_should_remove() {
        let options = TurndownOptions::default();
        let mut rules = Rules::new();
        rules.remove(Filter::tags(&["script", "p"]));

        let script = Node::element("script");
        let p = Node::element("p");
        assert!(rules.should_remove(&NodeRef::new(&script), &options));
        // A conversion rule takes precedence over removal
        assert!(!rules.should_remove(&NodeRef::new(&p), &options));
    }

    #[test]
    fn test_rule_names_for_tracing() {
        let options = TurndownOptions::default();
        let rules = Rules::new();
        let h2 = Node::element("h2");
        assert_eq!(rules.name_for_node(&NodeRef::new(&h2), &options), Some("heading"));
    }
}
