//! Rule and Filter types for HTML conversion.

use crate::node::NodeRef;
use crate::service::TurndownOptions;

/// Type alias for replacement functions.
///
/// Arguments are the node, the already converted content of its children and
/// the service options.
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync>;

/// Type alias for filter predicates. The first argument is the lowercase tag.
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node. Text nodes never match.
    pub fn matches(&self, node: &NodeRef, options: &TurndownOptions) -> bool {
        if !node.is_element() {
            return false;
        }
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => tag == t.as_str(),
            Filter::TagNames(tags) => tags.iter().any(|t| t.as_str() == tag),
            Filter::Predicate(f) => f(tag, node, options),
        }
    }
}

/// A rule defines how to convert a matched HTML element to Markdown
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef, content: &str, options: &TurndownOptions) -> String {
        (self.replacement)(node, content, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_tag_filters() {
        let options = TurndownOptions::default();
        let del = Node::element("DEL");
        let del_ref = NodeRef::new(&del);

        assert!(Filter::tag("del").matches(&del_ref, &options));
        assert!(Filter::tags(&["s", "DEL"]).matches(&del_ref, &options));
        assert!(!Filter::tag("s").matches(&del_ref, &options));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let options = TurndownOptions::default();
        let text = Node::text("del");
        let text_ref = NodeRef::new(&text);

        assert!(!Filter::predicate(|_, _, _| true).matches(&text_ref, &options));
    }

    #[test]
    fn test_predicate_receives_lowercase_tag() {
        let options = TurndownOptions::default();
        let img = Node::element_with_attrs("IMG", vec![("src", "a.png")]);
        let img_ref = NodeRef::new(&img);
        let filter = Filter::predicate(|tag, node, _| tag == "img" && node.has_attr("src"));

        assert!(filter.matches(&img_ref, &options));
    }

    #[test]
    fn test_rule_replace() {
        let options = TurndownOptions::default();
        let rule = Rule::for_tag("del", |_, content, _| format!("~~{}~~", content));
        let del = Node::element("del");

        assert_eq!(rule.replace(&NodeRef::new(&del), "x", &options), "~~x~~");
    }
}
