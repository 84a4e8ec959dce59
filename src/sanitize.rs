//! Export sanitization
//!
//! Produces an export-ready copy of a subtree with interactive, decorative,
//! and non-content nodes removed. The live tree is never mutated: the input
//! is cloned and the clone is pruned.

use crate::dom::{ChildNode, ElementNode};

/// Tags removed outright, regardless of attributes
const REMOVED_TAGS: [&str; 15] = [
    "script", "style", "meta", "link", "iframe", "noscript", "img", "svg", "picture", "button",
    "input", "select", "textarea", "form", "canvas",
];

/// Semantic chrome removed outright
const CHROME_TAGS: [&str; 3] = ["nav", "header", "footer"];

/// Class/id substrings denoting non-content blocks
const NOISE_PATTERNS: [&str; 19] = [
    "ads",
    "banner",
    "advertisement",
    "social",
    "share",
    "navigation",
    "menu",
    "breadcrumb",
    "sidebar",
    "related",
    "widget",
    "cookie",
    "popup",
    "modal",
    "overlay",
    "spacer",
    "tooltip",
    "icon",
    "fa-",
];

/// What the sanitizer strips. The defaults cover the target site's ads,
/// navigation, social widgets, and layout chrome.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    pub removed_tags: Vec<String>,
    pub noise_patterns: Vec<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            removed_tags: REMOVED_TAGS
                .iter()
                .chain(CHROME_TAGS.iter())
                .map(|t| t.to_string())
                .collect(),
            noise_patterns: NOISE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl SanitizePolicy {
    fn removes(&self, el: &ElementNode) -> bool {
        if self.removed_tags.iter().any(|t| el.is_tag(t)) {
            return true;
        }
        let needles: Vec<&str> = self.noise_patterns.iter().map(String::as_str).collect();
        el.attr_matches_any(&needles)
    }
}

/// Return a cleaned copy of `node` with the default policy.
///
/// Idempotent: sanitizing an already-sanitized subtree changes nothing.
/// The root itself is always retained, even when it ends up empty.
pub fn sanitize(node: &ElementNode) -> ElementNode {
    sanitize_with(node, &SanitizePolicy::default())
}

/// Return a cleaned copy of `node` under an explicit policy
pub fn sanitize_with(node: &ElementNode, policy: &SanitizePolicy) -> ElementNode {
    let mut clone = node.clone();
    remove_denylisted(&mut clone, policy);
    // Denylist removal can leave empty wrapper shells behind; prune them
    // until nothing more falls out.
    while remove_empty_shells(&mut clone) > 0 {}
    clone
}

fn remove_denylisted(el: &mut ElementNode, policy: &SanitizePolicy) {
    el.children.retain(|child| match child {
        ChildNode::Element(child_el) => !policy.removes(child_el),
        ChildNode::Text(_) => true,
    });
    for child in &mut el.children {
        if let ChildNode::Element(child_el) = child {
            remove_denylisted(child_el, policy);
        }
    }
}

fn remove_empty_shells(el: &mut ElementNode) -> usize {
    let mut removed = 0;
    el.children.retain(|child| match child {
        ChildNode::Element(child_el) => {
            // br/hr are intentionally empty and stay
            if child_el.is_empty_shell() && !child_el.is_tag("br") && !child_el.is_tag("hr") {
                removed += 1;
                false
            } else {
                true
            }
        }
        ChildNode::Text(_) => true,
    });
    for child in &mut el.children {
        if let ChildNode::Element(child_el) = child {
            removed += remove_empty_shells(child_el);
        }
    }
    removed
}
