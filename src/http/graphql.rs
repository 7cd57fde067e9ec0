//! GraphQL Client
//!
//! Posts `query { ... }` / `mutation { ... }` documents as JSON. A bearer token
//! is attached when the token getter yields one. The expired-token callback is
//! consulted before every request (with no status) and again when the server
//! answers 400 or 401 (with that status); either way the call resolves to
//! `Ok(None)` instead of an error.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use super::{Fetcher, HttpError, Spinner};
use crate::config::GraphQlConfig;
use crate::router::NavigateFn;

/// Supplies the current auth token, if any
pub type TokenGetter = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Decides whether the session is still valid.
///
/// Receives the HTTP status (`None` for the pre-request check), the path to
/// redirect to and a navigation function. Returning `false` aborts the call.
pub type ExpiredTokenCallback = Arc<dyn Fn(Option<u16>, &str, &NavigateFn) -> bool + Send + Sync>;

/// Errors from GraphQL calls
#[derive(Error, Debug)]
pub enum GraphQlError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("GraphQL API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result type alias for GraphQL calls
pub type GraphQlResult<T> = Result<T, GraphQlError>;

/// GraphQL client bound to one endpoint
#[derive(Clone)]
pub struct GraphQlClient {
    endpoint: String,
    fetcher: Fetcher,
    token_getter: Option<TokenGetter>,
    expired_token_callback: Option<ExpiredTokenCallback>,
    spinner: Option<Arc<dyn Spinner>>,
    navigate: NavigateFn,
    redirect_path: String,
}

impl GraphQlClient {
    /// Create a client with no token handling, no spinner and `/` as the
    /// expiry redirect path
    pub fn new(endpoint: impl Into<String>, fetcher: Fetcher) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetcher,
            token_getter: None,
            expired_token_callback: None,
            spinner: None,
            navigate: Arc::new(|path: &str| {
                tracing::warn!(path = %path, "No navigation function configured");
            }),
            redirect_path: "/".to_string(),
        }
    }

    /// Create a client for the configured endpoint and expiry redirect path
    pub fn from_config(config: &GraphQlConfig, fetcher: Fetcher) -> Self {
        Self::new(config.endpoint.clone(), fetcher).redirect_path(config.redirect_path.clone())
    }

    pub fn redirect_target(&self) -> &str {
        &self.redirect_path
    }

    pub fn token_getter(mut self, getter: TokenGetter) -> Self {
        self.token_getter = Some(getter);
        self
    }

    pub fn expired_token_callback(mut self, callback: ExpiredTokenCallback) -> Self {
        self.expired_token_callback = Some(callback);
        self
    }

    pub fn spinner(mut self, spinner: Arc<dyn Spinner>) -> Self {
        self.spinner = Some(spinner);
        self
    }

    pub fn navigate(mut self, navigate: NavigateFn) -> Self {
        self.navigate = navigate;
        self
    }

    pub fn redirect_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = path.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query. `body` omits the surrounding `query { }`.
    pub async fn query(&self, body: &str) -> GraphQlResult<Option<Value>> {
        self.execute("query", body).await
    }

    /// Run a mutation. `body` omits the surrounding `mutation { }`.
    pub async fn mutation(&self, body: &str) -> GraphQlResult<Option<Value>> {
        self.execute("mutation", body).await
    }

    async fn execute(&self, operation: &str, body: &str) -> GraphQlResult<Option<Value>> {
        if !self.session_valid(None) {
            tracing::debug!(operation, "Session expired before request");
            return Ok(None);
        }

        let document = format!("{} {{\n{}\n}}", operation, body);
        let mut request = self
            .fetcher
            .client()
            .post(&self.endpoint)
            .json(&json!({ "query": document }));

        let token = self
            .token_getter
            .as_ref()
            .and_then(|getter| getter())
            .filter(|token| !token.is_empty());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = self.fetcher.fetch(request, self.spinner.as_deref()).await?;
        let status = response.status().as_u16();

        if status == 400 || status == 401 {
            tracing::info!(operation, status, "GraphQL request rejected");
            self.session_valid(Some(status));
            return Ok(None);
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| GraphQlError::Http(HttpError::Request(e)))?;

        if !(200..300).contains(&status) {
            let message = result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(GraphQlError::Api { status, message });
        }

        Ok(Some(result))
    }

    fn session_valid(&self, status: Option<u16>) -> bool {
        match &self.expired_token_callback {
            Some(callback) => callback(status, &self.redirect_path, &self.navigate),
            None => true,
        }
    }
}

impl std::fmt::Debug for GraphQlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("endpoint", &self.endpoint)
            .field("redirect_path", &self.redirect_path)
            .finish()
    }
}
