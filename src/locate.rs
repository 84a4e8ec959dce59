//! Content-container discovery
//!
//! Legal-document pages bury the document text inside deeply nested,
//! inconsistently classed wrappers, so no single CSS selector finds it
//! reliably. The locator instead scores ancestor candidates by a cheap
//! content-density proxy (trimmed subtree text length) gated by structural
//! plausibility checks, with progressively weaker fallbacks so that a result
//! is always produced.

use crate::dom::{NodePath, PageDom};

/// Class/id substrings that indicate a content-bearing wrapper
const CONTENT_ATTR_PATTERNS: [&str; 6] =
    ["content", "document", "article", "main", "inteiro", "teor"];

/// Tags scanned for marker text, mirroring the labels the target site uses
const MARKER_TAGS: [&str; 10] = ["h1", "h2", "h3", "h4", "h5", "h6", "span", "strong", "b", "div"];

/// Search strictness: generic for arbitrary content blocks, document-grade
/// for whole-document blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Generic,
    DocumentGrade,
}

/// Thresholds driving container discovery
///
/// The defaults are tuned empirically to the target site's markup; they are
/// parameters rather than invariants and should not be assumed to generalize.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Minimum subtree text length for a scored ancestor candidate
    pub min_text_len: usize,
    /// Structural child count a candidate must exceed when it lacks a
    /// content-indicating class or id
    pub min_structural_children: usize,
    /// Minimum text length in the document-wide containment scan
    pub scan_min_text_len: usize,
    /// Minimum text length in the relaxed final ancestor walk
    pub relaxed_min_text_len: usize,
}

impl LocatorConfig {
    pub fn generic() -> Self {
        Self {
            min_text_len: 100,
            min_structural_children: 3,
            scan_min_text_len: 500,
            relaxed_min_text_len: 200,
        }
    }

    pub fn document_grade() -> Self {
        Self {
            min_text_len: 1000,
            min_structural_children: 10,
            scan_min_text_len: 5000,
            relaxed_min_text_len: 5000,
        }
    }

    pub fn for_mode(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Generic => Self::generic(),
            SearchMode::DocumentGrade => Self::document_grade(),
        }
    }
}

/// Find the element that best represents the logical content block enclosing
/// `start`.
///
/// Four stages, each weaker than the last:
/// 1. scored ancestor walk: largest subtree text above the mode floor that
///    also looks like content (class/id pattern or enough structural
///    children); a strictly larger text length replaces the current best
/// 2. document-wide scan for an element containing both `start` and the
///    marker phrase, above a stricter text floor
/// 3. relaxed ancestor walk on text length alone
/// 4. `start` itself
///
/// Never fails: absence of a good container degrades to a worse but
/// non-null result.
pub fn find_container(
    dom: &PageDom,
    start: &NodePath,
    config: &LocatorConfig,
    marker_text: Option<&str>,
) -> NodePath {
    // Stage 1: scored ancestor walk
    let mut best: Option<(NodePath, usize)> = None;
    for ancestor in start.ancestors() {
        let Some(el) = dom.get(&ancestor) else { continue };
        let text_len = el.text_len();
        if text_len <= config.min_text_len {
            continue;
        }
        let looks_like_content = el.attr_matches_any(&CONTENT_ATTR_PATTERNS)
            || el.structural_child_count() > config.min_structural_children;
        if !looks_like_content {
            continue;
        }
        if best.as_ref().map_or(true, |(_, len)| text_len > *len) {
            best = Some((ancestor, text_len));
        }
    }
    if let Some((path, len)) = best {
        log::debug!("container found by scored ancestor walk ({} chars)", len);
        return path;
    }

    // Stage 2: document-wide containment scan anchored on the marker phrase.
    // The page shell (html/body) is skipped so the scan cannot degenerate
    // into selecting the whole page.
    if let Some(marker) = marker_text {
        let needle = marker.to_lowercase();
        for (path, el) in dom.iter() {
            if path.is_root() || el.is_tag("body") || el.is_tag("head") {
                continue;
            }
            if !path.contains(start) {
                continue;
            }
            let text = el.subtree_text();
            if text.chars().count() > config.scan_min_text_len
                && text.to_lowercase().contains(&needle)
            {
                log::debug!("container found by document-wide scan");
                return path;
            }
        }
    }

    // Stage 3: relaxed ancestor walk, text length alone
    for ancestor in start.ancestors() {
        if let Some(el) = dom.get(&ancestor) {
            if el.text_len() > config.relaxed_min_text_len {
                log::debug!("container found by relaxed ancestor walk");
                return ancestor;
            }
        }
    }

    // Stage 4: degrade to the starting element
    start.clone()
}

/// Move from a located marker label to the node its content hangs off:
/// the next non-empty element sibling, else the parent, else the nearest
/// `div`/`article`/`section` ancestor, else the marker itself.
pub fn anchor_from_marker(dom: &PageDom, marker: &NodePath) -> NodePath {
    if let Some(sibling) = dom.next_sibling(marker) {
        if dom.get(&sibling).is_some_and(|el| !el.is_empty_shell()) {
            return sibling;
        }
    }
    if let Some(parent) = marker.parent() {
        if !parent.is_root() && dom.get(&parent).is_some_and(|el| !el.is_empty_shell()) {
            return parent;
        }
    }
    for ancestor in marker.ancestors() {
        if dom
            .get(&ancestor)
            .is_some_and(|el| el.is_tag("div") || el.is_tag("article") || el.is_tag("section"))
        {
            return ancestor;
        }
    }
    marker.clone()
}

/// Scan the document for a marker element matching one of `terms`.
///
/// Four passes: exact trimmed-text match in term priority order, then
/// case-insensitive substring containment (tightest match wins), both over
/// the label tags the target site uses; then the same substring scan over
/// every element, so a term that only appears outside the label tags is
/// still found; then class/id attribute patterns. Returns None when every
/// pass is exhausted.
pub fn find_marker(dom: &PageDom, terms: &[&str]) -> Option<NodePath> {
    // Pass 1: exact trimmed-text match, terms in priority order
    for term in terms {
        let wanted = crate::dom::normalize_whitespace(term).to_lowercase();
        for (path, el) in dom.iter() {
            if !is_marker_candidate(el) {
                continue;
            }
            if el.subtree_text().to_lowercase() == wanted {
                return Some(path);
            }
        }
    }

    // Pass 2: substring containment; prefer the element with the least
    // surrounding text so a page-spanning wrapper never wins over the label
    for term in terms {
        let needle = term.to_lowercase();
        let mut tightest: Option<(NodePath, usize)> = None;
        for (path, el) in dom.iter() {
            if !is_marker_candidate(el) {
                continue;
            }
            let text = el.subtree_text();
            if !text.to_lowercase().contains(&needle) {
                continue;
            }
            let len = text.chars().count();
            if tightest.as_ref().map_or(true, |(_, best)| len < *best) {
                tightest = Some((path, len));
            }
        }
        if let Some((path, _)) = tightest {
            return Some(path);
        }
    }

    // Pass 3: substring containment over every element, for terms that
    // live outside the usual label tags. The page shell is skipped so the
    // tightest hit is a real element, not the whole document.
    for term in terms {
        let needle = term.to_lowercase();
        let mut tightest: Option<(NodePath, usize)> = None;
        for (path, el) in dom.iter() {
            if path.is_root() || el.is_tag("body") || el.is_tag("head") {
                continue;
            }
            let text = el.subtree_text();
            if !text.to_lowercase().contains(&needle) {
                continue;
            }
            let len = text.chars().count();
            if tightest.as_ref().map_or(true, |(_, best)| len < *best) {
                tightest = Some((path, len));
            }
        }
        if let Some((path, _)) = tightest {
            return Some(path);
        }
    }

    // Pass 4: attribute-pattern match on normalized forms of the term
    for term in terms {
        let variants = attr_variants(term);
        let needles: Vec<&str> = variants.iter().map(String::as_str).collect();
        for (path, el) in dom.iter() {
            if path.is_root() || el.is_tag("body") || el.is_tag("head") {
                continue;
            }
            if el.attr_matches_any(&needles) {
                return Some(path);
            }
        }
    }

    None
}

fn is_marker_candidate(el: &crate::dom::ElementNode) -> bool {
    MARKER_TAGS.contains(&el.tag_name.as_str())
}

/// Normalized attribute forms of a marker term, e.g. "Inteiro Teor" ->
/// "inteiro-teor" and "inteiroteor"
fn attr_variants(term: &str) -> Vec<String> {
    let lower = term.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    vec![words.join("-"), words.join("")]
}
