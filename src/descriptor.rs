//! Serializable element descriptors
//!
//! A descriptor is a re-locatable reference to an element captured during
//! visual selection. The page may change between capture and extraction
//! (navigation, re-render), so the descriptor carries several redundant
//! handles and resolution tries them as an ordered chain of strategies:
//! id lookup, then structural path, then text-prefix scan. First success
//! wins; when every strategy fails the element is gone.

use crate::dom::{NodePath, PageDom};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on the captured text snippet, in characters
pub const TEXT_SNIPPET_MAX: usize = 200;

/// Upper bound on the captured inner-HTML snippet, in characters
pub const HTML_SNIPPET_MAX: usize = 1000;

/// One level of a structural path: tag plus index among the parent's
/// element children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathStep {
    pub tag: String,
    pub index: usize,
}

/// A serializable, re-locatable reference to a page element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Lowercased tag name of the captured element
    pub tag_name: String,

    /// Element id, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Class names in declaration order
    #[serde(default)]
    pub class_names: Vec<String>,

    /// Leading subtree text, at most [`TEXT_SNIPPET_MAX`] characters
    pub text_snippet: String,

    /// Leading inner HTML, at most [`HTML_SNIPPET_MAX`] characters
    #[serde(rename = "innerHTMLSnippet")]
    pub inner_html_snippet: String,

    /// Positional path from the document root, usable when id and text
    /// lookups fail
    pub structural_path: Vec<PathStep>,
}

/// Capture a descriptor for the element at `path`, or None when the path
/// does not resolve
pub fn capture(dom: &PageDom, path: &NodePath) -> Option<ElementDescriptor> {
    let el = dom.get(path)?;
    let mut structural_path = Vec::with_capacity(path.depth());
    let mut prefix = NodePath::root();
    for &step in path.steps() {
        prefix = prefix.child(step);
        let level = dom.get(&prefix)?;
        structural_path.push(PathStep {
            tag: level.tag_name.clone(),
            index: step,
        });
    }

    Some(ElementDescriptor {
        tag_name: el.tag_name.clone(),
        id: el.id().map(str::to_string).filter(|id| !id.is_empty()),
        class_names: el.class_names(),
        text_snippet: truncate_chars(&el.subtree_text(), TEXT_SNIPPET_MAX),
        inner_html_snippet: truncate_chars(&el.inner_html(), HTML_SNIPPET_MAX),
        structural_path,
    })
}

/// A single resolution strategy: pure lookup from descriptor to path
type Strategy = fn(&PageDom, &ElementDescriptor) -> Option<NodePath>;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("id", by_id),
    ("structural path", by_structural_path),
    ("text prefix", by_text_prefix),
];

/// Re-locate the element a descriptor refers to.
///
/// Strategies are tried in order; the first that produces a node wins.
pub fn resolve(dom: &PageDom, descriptor: &ElementDescriptor) -> Option<NodePath> {
    for (name, strategy) in STRATEGIES {
        if let Some(path) = strategy(dom, descriptor) {
            log::debug!("descriptor resolved by {name}");
            return Some(path);
        }
    }
    None
}

fn by_id(dom: &PageDom, descriptor: &ElementDescriptor) -> Option<NodePath> {
    let wanted = descriptor.id.as_deref().filter(|id| !id.is_empty())?;
    dom.iter().find(|(_, el)| el.id() == Some(wanted)).map(|(path, _)| path)
}

fn by_structural_path(dom: &PageDom, descriptor: &ElementDescriptor) -> Option<NodePath> {
    if descriptor.structural_path.is_empty() {
        return None;
    }
    let mut path = NodePath::root();
    for step in &descriptor.structural_path {
        path = path.child(step.index);
        let el = dom.get(&path)?;
        if !el.is_tag(&step.tag) {
            return None;
        }
    }
    // the path must land on the kind of element that was captured
    if !dom.get(&path)?.is_tag(&descriptor.tag_name) {
        return None;
    }
    Some(path)
}

fn by_text_prefix(dom: &PageDom, descriptor: &ElementDescriptor) -> Option<NodePath> {
    let snippet = descriptor.text_snippet.trim();
    if snippet.is_empty() {
        return None;
    }
    dom.iter()
        .find(|(_, el)| el.is_tag(&descriptor.tag_name) && el.subtree_text().starts_with(snippet))
        .map(|(path, _)| path)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
