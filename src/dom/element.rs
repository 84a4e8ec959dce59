use std::collections::HashMap;
use std::fmt::Write as _;

/// Tags that never carry a closing tag in serialized HTML
const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Structural tags counted when judging whether a candidate container has
/// enough internal structure to be real content
const STRUCTURAL_TAGS: [&str; 10] = ["p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "span", "li"];

/// A child of an element: either a nested element or a run of text
#[derive(Debug, Clone, PartialEq)]
pub enum ChildNode {
    Element(ElementNode),
    Text(String),
}

/// An element in the parsed page tree
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Lowercased HTML tag name (e.g. "div", "h2")
    pub tag_name: String,

    /// Element attributes (id, class, style, ...)
    pub attributes: HashMap<String, String>,

    /// Child nodes in document order, text runs interleaved with elements
    pub children: Vec<ChildNode>,
}

impl ElementNode {
    /// Create a new element with no attributes or children
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: set an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(ChildNode::Text(text.into()));
        self
    }

    /// Builder method: append an element child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(ChildNode::Element(child));
        self
    }

    /// Append an element child
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(ChildNode::Element(child));
    }

    /// Get attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Element ID, if any
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Class names in declaration order
    pub fn class_names(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Check tag name, case-insensitively
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Child elements only, skipping text runs
    pub fn child_elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|c| match c {
            ChildNode::Element(el) => Some(el),
            ChildNode::Text(_) => None,
        })
    }

    /// Full subtree text with runs joined by single spaces and trimmed,
    /// the content-density proxy used by the locator
    pub fn subtree_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        normalize_whitespace(&out)
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                ChildNode::Text(t) => {
                    out.push_str(t);
                    out.push(' ');
                }
                ChildNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Length in characters of the trimmed subtree text
    pub fn text_len(&self) -> usize {
        self.subtree_text().chars().count()
    }

    /// Count descendant elements with structural tags (paragraphs, headings,
    /// divs, spans), the plausibility gate for container candidates
    pub fn structural_child_count(&self) -> usize {
        let mut count = 0;
        for el in self.child_elements() {
            if STRUCTURAL_TAGS.contains(&el.tag_name.as_str()) {
                count += 1;
            }
            count += el.structural_child_count();
        }
        count
    }

    /// True when the element's class or id contains any of the given
    /// lowercase substrings
    pub fn attr_matches_any(&self, needles: &[&str]) -> bool {
        let haystacks = [self.attr("class"), self.attr("id")];
        haystacks.iter().flatten().any(|value| {
            let lower = value.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    }

    /// True when the subtree has no text (other than whitespace) and no
    /// element children
    pub fn is_empty_shell(&self) -> bool {
        self.children.iter().all(|c| match c {
            ChildNode::Text(t) => t.trim().is_empty(),
            ChildNode::Element(_) => false,
        })
    }

    /// Serialize children only
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_child(&mut out, child);
        }
        out
    }

    /// Serialize the element including its own tag
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

fn write_child(out: &mut String, child: &ChildNode) {
    match child {
        ChildNode::Text(t) => out.push_str(&escape_text(t)),
        ChildNode::Element(el) => write_element(out, el),
    }
}

fn write_element(out: &mut String, el: &ElementNode) {
    let _ = write!(out, "<{}", el.tag_name);
    // Stable attribute order keeps serialization deterministic
    let mut attrs: Vec<_> = el.attributes.iter().collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
    }
    out.push('>');
    if VOID_TAGS.contains(&el.tag_name.as_str()) {
        return;
    }
    for child in &el.children {
        write_child(out, child);
    }
    let _ = write!(out, "</{}>", el.tag_name);
}

/// Escape text content for HTML output
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape an attribute value for HTML output
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Collapse internal whitespace runs to single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
