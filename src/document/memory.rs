//! In-memory document
//!
//! Holds container contents in a map keyed by selector. Used headless and in
//! tests; a browser binding would implement [`Document`] over the real DOM.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Document, DocumentError, DocumentResult};

/// Map-backed rendering target
#[derive(Debug, Default)]
pub struct MemoryDocument {
    containers: RwLock<HashMap<String, String>>,
    title: RwLock<String>,
}

impl MemoryDocument {
    /// Create a document without containers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with one empty container registered
    pub fn with_container(selector: impl Into<String>) -> Self {
        let doc = Self::new();
        doc.add_container(selector);
        doc
    }

    /// Register an empty container under `selector`
    pub fn add_container(&self, selector: impl Into<String>) {
        self.containers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(selector.into(), String::new());
    }

    fn update(&self, selector: &str, markup: &str) -> DocumentResult<()> {
        let mut containers = self
            .containers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let slot = containers
            .get_mut(selector)
            .ok_or_else(|| DocumentError::TargetNotFound(selector.to_string()))?;
        *slot = markup.to_string();
        Ok(())
    }
}

impl Document for MemoryDocument {
    fn clear(&self, selector: &str) -> DocumentResult<()> {
        self.update(selector, "")
    }

    fn commit(&self, selector: &str, markup: &str) -> DocumentResult<()> {
        self.update(selector, markup)
    }

    fn content(&self, selector: &str) -> DocumentResult<String> {
        self.containers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(selector)
            .cloned()
            .ok_or_else(|| DocumentError::TargetNotFound(selector.to_string()))
    }

    fn set_title(&self, title: &str) {
        *self
            .title
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = title.to_string();
    }

    fn title(&self) -> String {
        self.title
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_and_clear() {
        let doc = MemoryDocument::with_container("#app");
        doc.commit("#app", "<p>hi</p>").unwrap();
        assert_eq!(doc.content("#app").unwrap(), "<p>hi</p>");

        doc.clear("#app").unwrap();
        assert_eq!(doc.content("#app").unwrap(), "");
    }

    #[test]
    fn test_unknown_selector() {
        let doc = MemoryDocument::new();
        let err = doc.commit("#missing", "x").unwrap_err();
        assert_eq!(err, DocumentError::TargetNotFound("#missing".to_string()));
        assert_eq!(err.to_string(), "Mount target not found: #missing");
    }

    #[test]
    fn test_title() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.title(), "");
        doc.set_title("Home");
        assert_eq!(doc.title(), "Home");
    }
}
