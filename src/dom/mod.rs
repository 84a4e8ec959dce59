//! Parsed page tree and element model
//!
//! This module provides the in-memory representation of a page that the
//! locator, sanitizer, and extractor operate on. It includes:
//! - ElementNode: an element with attributes and interleaved text/element children
//! - PageDom: a full document tree parsed from HTML, addressed by NodePath
//! - NodePath: a positional path usable to walk ancestors and resolve nodes

pub mod element;
pub mod tree;

pub use element::{escape_attr, escape_text, normalize_whitespace, ChildNode, ElementNode};
pub use tree::{DomWalk, NodePath, PageDom};
