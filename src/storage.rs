//! Persisted selection state
//!
//! The hosting environment provides durable key-value storage; this module
//! specifies that collaborator as a trait and layers a typed facade over the
//! three well-known keys. Writes are last-writer-wins with no transactional
//! guarantee across surfaces; the workflow is sequential and single-user.

use crate::descriptor::ElementDescriptor;
use crate::error::Result;
use indexmap::IndexMap;

/// Key holding the last captured descriptor
pub const KEY_SELECTED_ELEMENT: &str = "selectedElement";
/// Key holding the last preview fragment
pub const KEY_PREVIEW: &str = "preview";
/// Key holding the last full extraction result
pub const KEY_EXTRACTED_HTML: &str = "extractedHTML";

/// Durable key-value storage, as provided by the host
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, keys: &[&str]);
}

/// In-memory store, insertion-ordered
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, keys: &[&str]) {
        for key in keys {
            self.entries.shift_remove(*key);
        }
    }
}

/// Typed facade over the selection keys
pub struct SelectionStore {
    inner: Box<dyn KeyValueStore + Send>,
}

impl SelectionStore {
    pub fn new(inner: Box<dyn KeyValueStore + Send>) -> Self {
        Self { inner }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Last captured descriptor, when one is stored and still decodable
    pub fn selected_element(&self) -> Result<Option<ElementDescriptor>> {
        match self.inner.get(KEY_SELECTED_ELEMENT) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set_selected_element(&mut self, descriptor: &ElementDescriptor) -> Result<()> {
        let json = serde_json::to_string(descriptor)?;
        self.inner.set(KEY_SELECTED_ELEMENT, json);
        Ok(())
    }

    pub fn preview(&self) -> Option<String> {
        self.inner.get(KEY_PREVIEW)
    }

    pub fn set_preview(&mut self, preview: String) {
        self.inner.set(KEY_PREVIEW, preview);
    }

    pub fn extracted_html(&self) -> Option<String> {
        self.inner.get(KEY_EXTRACTED_HTML)
    }

    pub fn set_extracted_html(&mut self, html: String) {
        self.inner.set(KEY_EXTRACTED_HTML, html);
    }

    /// Drop descriptor, preview, and extraction result together
    pub fn clear(&mut self) {
        self.inner
            .remove(&[KEY_SELECTED_ELEMENT, KEY_PREVIEW, KEY_EXTRACTED_HTML]);
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("selected", &self.inner.get(KEY_SELECTED_ELEMENT).is_some())
            .field("preview", &self.inner.get(KEY_PREVIEW).is_some())
            .field("extracted", &self.inner.get(KEY_EXTRACTED_HTML).is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PathStep;

    fn descriptor() -> ElementDescriptor {
        ElementDescriptor {
            tag_name: "div".to_string(),
            id: Some("doc".to_string()),
            class_names: vec!["content".to_string()],
            text_snippet: "texto".to_string(),
            inner_html_snippet: "<p>texto</p>".to_string(),
            structural_path: vec![PathStep { tag: "body".to_string(), index: 1 }],
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("k", "v".to_string());
        assert_eq!(store.get("k").as_deref(), Some("v"));

        store.set("k", "v2".to_string());
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove(&["k", "missing"]);
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_selected_element_roundtrip() {
        let mut store = SelectionStore::in_memory();
        assert!(store.selected_element().unwrap().is_none());

        store.set_selected_element(&descriptor()).expect("set");
        let loaded = store.selected_element().expect("get").expect("some");
        assert_eq!(loaded, descriptor());
    }

    #[test]
    fn test_overwrite_is_last_writer_wins() {
        let mut store = SelectionStore::in_memory();
        store.set_preview("primeiro".to_string());
        store.set_preview("segundo".to_string());
        assert_eq!(store.preview().as_deref(), Some("segundo"));
    }

    #[test]
    fn test_clear_removes_all_three_keys() {
        let mut store = SelectionStore::in_memory();
        store.set_selected_element(&descriptor()).expect("set");
        store.set_preview("p".to_string());
        store.set_extracted_html("<!DOCTYPE html>".to_string());

        store.clear();

        assert!(store.selected_element().unwrap().is_none());
        assert!(store.preview().is_none());
        assert!(store.extracted_html().is_none());
    }

    #[test]
    fn test_corrupt_descriptor_surfaces_storage_error() {
        let mut inner = MemoryStore::new();
        inner.set(KEY_SELECTED_ELEMENT, "not json".to_string());
        let store = SelectionStore::new(Box::new(inner));
        assert!(store.selected_element().is_err());
    }
}
