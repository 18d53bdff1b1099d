//! DOM node structure for HTML to Markdown conversion.
//!
//! The rule engine works against this small closed tree instead of a
//! specific parser's types. Any HTML parser can map its output onto [`Node`];
//! the bundled adapter lives in [`crate::html`].

use indexmap::IndexMap;

/// A node of the converted tree: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name, e.g. `"div"`
    pub tag: String,
    /// Attributes in source order, names lowercased
    pub attrs: IndexMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Node::Element(Element {
            tag: tag_name.to_lowercase(),
            ..Element::default()
        })
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Node::Element(Element {
            tag: tag_name.to_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            children: Vec::new(),
        })
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Node::Text(content.to_string())
    }

    /// Builder form of [`Node::add_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Lowercase tag name, or `"#text"` for text nodes
    pub fn tag_name(&self) -> &str {
        match self {
            Node::Element(el) => &el.tag,
            Node::Text(_) => "#text",
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element(el) => el
                .attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            Node::Text(_) => None,
        }
    }

    /// Check if an attribute exists (boolean attributes carry an empty value)
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let children: &[Node] = match self {
            Node::Element(el) => &el.children,
            Node::Text(_) => &[],
        };
        children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node. Text nodes cannot hold children; the call is ignored.
    pub fn add_child(&mut self, child: Node) {
        if let Node::Element(el) = self {
            el.children.push(child);
        }
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Node::Element(el) = self {
            el.attrs.insert(name.to_lowercase(), value.to_string());
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Find the first descendant element (depth-first) matching the predicate
    pub fn find_descendant<F>(&self, predicate: F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool + Copy,
    {
        for child in self.element_children() {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }
}

/// A reference to a node with its traversal context.
///
/// Parents are reachable through the chain of views built during the walk, so
/// the tree itself never stores back pointers.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
    index: usize,
    in_pre: bool,
}

impl<'a> NodeRef<'a> {
    /// Create a root view without parent context
    pub fn new(node: &'a Node) -> Self {
        Self {
            node,
            parent: None,
            index: 0,
            in_pre: false,
        }
    }

    /// Create a view of `node`, the element child number `index` of `parent`
    pub fn child(node: &'a Node, parent: &'a NodeRef<'a>, index: usize) -> Self {
        Self {
            node,
            parent: Some(parent),
            index,
            in_pre: parent.in_pre || parent.tag_name() == "pre",
        }
    }

    pub fn parent(&self) -> Option<&'a NodeRef<'a>> {
        self.parent
    }

    /// Get the parent tag name if known
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent.map(|p| p.node.tag_name())
    }

    /// Position among the parent's element children
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this is the first element child of its parent
    pub fn is_first_child(&self) -> bool {
        self.index == 0
    }

    /// Whether this node sits inside a `<pre>` element
    pub fn in_pre(&self) -> bool {
        self.in_pre
    }

    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.tag_name(), "#text");
        assert_eq!(node.text_content(), "Hello World");
    }

    #[test]
    fn test_attributes() {
        let node = Node::element_with_attrs(
            "a",
            vec![("HREF", "https://example.com"), ("title", "Example")],
        );
        assert_eq!(node.attr("href"), Some("https://example.com"));
        assert_eq!(node.attr("Title"), Some("Example"));
        assert_eq!(node.attr("class"), None);
    }

    #[test]
    fn test_boolean_attribute() {
        let node = Node::element_with_attrs("input", vec![("type", "checkbox"), ("checked", "")]);
        assert!(node.has_attr("checked"));
        assert!(!node.has_attr("disabled"));
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut node = Node::element("img");
        node.set_attr("src", "a.png");
        node.set_attr("SRC", "b.png");
        assert_eq!(node.attr("src"), Some("b.png"));
    }

    #[test]
    fn test_children() {
        let parent = Node::element("div")
            .with_child(Node::text("Hello"))
            .with_child(Node::element("span"))
            .with_child(Node::text("World"));

        assert_eq!(parent.children().count(), 3);
        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_text_content() {
        let div = Node::element("div")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("span").with_child(Node::text("World")));

        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_find_descendant() {
        let li = Node::element("li").with_child(
            Node::element("label").with_child(Node::element_with_attrs(
                "input",
                vec![("type", "checkbox")],
            )),
        );
        let found = li.find_descendant(|n| n.tag_name() == "input");
        assert_eq!(found.and_then(|n| n.attr("type")), Some("checkbox"));
    }

    #[test]
    fn test_node_ref_context() {
        let code = Node::element("code").with_child(Node::text("x"));
        let pre = Node::element("pre").with_child(code.clone());
        let ul = Node::element("ul");

        let pre_ref = NodeRef::new(&pre);
        let code_ref = NodeRef::child(&code, &pre_ref, 0);
        assert!(code_ref.in_pre());
        assert_eq!(code_ref.parent_tag(), Some("pre"));

        let ul_ref = NodeRef::new(&ul);
        let li = Node::element("li");
        let li_ref = NodeRef::child(&li, &ul_ref, 2);
        let inner = Node::element("ol");
        let inner_ref = NodeRef::child(&inner, &li_ref, 0);
        let item = Node::element("li");
        let item_ref = NodeRef::child(&item, &inner_ref, 0);
        assert_eq!(li_ref.index(), 2);
        assert!(!li_ref.is_first_child());
        assert!(item_ref.is_first_child());
        assert_eq!(item_ref.parent_tag(), Some("ol"));
        assert_eq!(inner_ref.parent().map(|p| p.tag_name()), Some("li"));
    }
}
