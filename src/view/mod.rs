//! Views
//!
//! A view is one page's renderable unit. The router constructs a view per
//! navigation through its [`ViewFactory`], then drives the lifecycle:
//!
//! ```text
//! Constructed -> BeforeRender -> Rendering -> TitleApplied -> AfterRender
//!             -> RenderComplete -> (replaced) -> Unloaded
//! ```
//!
//! Rendering produces [`Markup`], an immutable value the router commits to the
//! mount container. Per-instance data (params, state, title) lives in the
//! [`ViewContext`] handed to every lifecycle method.

mod builtin;
mod context;
mod title;

pub use builtin::{escape_html, DefaultPageNotFound, TemplateView};
pub use context::{LifecyclePhase, ViewContext};
pub use title::extract_title;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{GraphQlError, HttpError};
use crate::router::Params;

/// Rendered output of a view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap a markup string
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Markup {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for Markup {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised inside a view lifecycle
#[derive(Error, Debug)]
pub enum ViewError {
    /// `render` was not overridden
    #[error("not implemented")]
    NotImplemented,

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Data needed by the view could not be loaded
    #[error("Load error: {0}")]
    Load(String),

    /// HTTP request issued by the view failed
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// GraphQL request issued by the view failed
    #[error("GraphQL error: {0}")]
    GraphQl(#[from] GraphQlError),
}

/// Result type alias for view lifecycle methods
pub type ViewResult<T> = Result<T, ViewError>;

/// Lifecycle contract for a page
#[async_trait]
pub trait View: Send + Sync {
    /// Pre-fetch data needed by `render`
    async fn before_render(&self, _ctx: &ViewContext) -> ViewResult<()> {
        Ok(())
    }

    /// Produce the view's markup
    async fn render(&self, _ctx: &ViewContext) -> ViewResult<Markup> {
        Err(ViewError::NotImplemented)
    }

    /// Post-render wiring
    async fn after_render(&self, _ctx: &ViewContext) -> ViewResult<()> {
        Ok(())
    }

    /// Cleanup when the view is replaced
    async fn on_unload(&self, _ctx: &ViewContext) {}
}

/// Builds a view for one navigation from its route parameters
pub type ViewFactory = Arc<dyn Fn(&Params) -> Arc<dyn View> + Send + Sync>;

/// Wrap a closure as a [`ViewFactory`]
pub fn view_factory<F, V>(f: F) -> ViewFactory
where
    F: Fn(&Params) -> V + Send + Sync + 'static,
    V: View + 'static,
{
    Arc::new(move |params: &Params| Arc::new(f(params)) as Arc<dyn View>)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl View for Bare {}

    #[tokio::test]
    async fn test_default_render_is_not_implemented() {
        let ctx = ViewContext::detached(Params::new());
        let err = Bare.render(&ctx).await.unwrap_err();
        assert!(matches!(err, ViewError::NotImplemented));
        assert_eq!(err.to_string(), "not implemented");
    }

    #[tokio::test]
    async fn test_default_hooks_are_noops() {
        let ctx = ViewContext::detached(Params::new());
        assert!(Bare.before_render(&ctx).await.is_ok());
        assert!(Bare.after_render(&ctx).await.is_ok());
        Bare.on_unload(&ctx).await;
    }

    #[test]
    fn test_markup_conversions() {
        let markup = Markup::from("<p>x</p>");
        assert_eq!(markup.as_str(), "<p>x</p>");
        assert_eq!(markup.to_string(), "<p>x</p>");
        assert_eq!(Markup::new(String::from("a")).into_string(), "a");
    }
}
