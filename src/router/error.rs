//! Router error types

use thiserror::Error;

use crate::document::DocumentError;
use crate::view::ViewError;

/// Errors that can occur while routing
#[derive(Error, Debug)]
pub enum RouterError {
    /// A view lifecycle method failed; the container is left empty
    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// The mount target could not be resolved
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A route pattern did not compile
    #[error("Invalid route pattern {path}: {error}")]
    Pattern { path: String, error: String },

    /// Nothing matched, not even the not-found route
    #[error("No route matched: {0}")]
    NoRoute(String),

    /// The router backing a view has been dropped
    #[error("Router is no longer available")]
    Detached,
}

/// Result type alias for router operations
pub type RouterResult<T> = Result<T, RouterError>;
