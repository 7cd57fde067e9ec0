//! # Frame SPA
//!
//! A headless single-page-application routing core: an ordered route table
//! with `:param` placeholders, history-driven navigation, and an async view
//! lifecycle that mounts rendered markup into a target container.
//!
//! ## Features
//!
//! - **Routing**: first-match-wins patterns, parameter extraction and injection
//! - **Not found**: unmatched paths redirect to `/404notfound{path}`
//! - **Lifecycle**: `before_render`, `render`, title extraction, `after_render`
//! - **History**: push navigation and popstate handling with round-tripped state
//! - **Collaborators**: delayed-spinner fetch wrapper, GraphQL client, session store
//!
//! ## Modules
//!
//! - [`router`]: Route matching and the navigation engine
//! - [`view`]: View trait, context and built-in views
//! - [`app`]: Application bootstrap and hook registration
//! - [`history`] / [`document`]: Browser abstractions with in-memory implementations
//! - [`http`] / [`session`]: Fetch, GraphQL and token handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use frame_spa::document::MemoryDocument;
//! use frame_spa::history::MemoryHistory;
//! use frame_spa::view::TemplateView;
//! use frame_spa::{application, Route};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let routes = vec![
//!         Route::view("/", |_| TemplateView::new("<title>Home</title><p>Welcome</p>")),
//!         Route::view("/users/:id", |_| TemplateView::new("<p>User {id}</p>")),
//!     ];
//!
//!     let app = application(
//!         "#app",
//!         routes,
//!         None,
//!         Arc::new(MemoryHistory::new()),
//!         Arc::new(MemoryDocument::with_container("#app")),
//!     )?;
//!
//!     app.after_route(|route| tracing::info!(route = %route.path(), "Routed"));
//!     app.go().await?;
//!
//!     app.navigate_to("/users/42", &serde_json::json!({"tab": "posts"}), serde_json::json!({}))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod document;
pub mod history;
pub mod http;
pub mod query_string;
pub mod router;
pub mod session;
pub mod view;

pub use app::{application, Application};
pub use config::Config;
pub use router::{Params, Route, RouteOutcome, Router, RouterError, RouterResult};
pub use view::{Markup, View, ViewContext, ViewError, ViewResult};
