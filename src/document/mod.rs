//! Rendering Target
//!
//! The router never touches a concrete DOM. It clears and fills mount
//! containers, addressed by selector, through the [`Document`] trait and sets
//! the document title through the same handle.

mod memory;

pub use memory::MemoryDocument;

use thiserror::Error;

/// Errors raised by a rendering target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No container matches the selector
    #[error("Mount target not found: {0}")]
    TargetNotFound(String),
}

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A host environment that can display rendered markup
pub trait Document: Send + Sync {
    /// Remove everything inside the container
    fn clear(&self, selector: &str) -> DocumentResult<()>;

    /// Replace the container's content with `markup`
    fn commit(&self, selector: &str, markup: &str) -> DocumentResult<()>;

    /// Current content of the container
    fn content(&self, selector: &str) -> DocumentResult<String>;

    /// Set the document title
    fn set_title(&self, title: &str);

    /// Current document title
    fn title(&self) -> String;
}
