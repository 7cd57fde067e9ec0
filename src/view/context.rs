//! Per-instance view data
//!
//! The context owns what the view needs beyond its own fields: route
//! parameters, navigation state, extracted title, lifecycle phase, and a weak
//! handle back to the router for further navigation.

use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;
use uuid::Uuid;

use crate::history::{empty_state, NavigationState};
use crate::router::{Params, RouteOutcome, Router, RouterError, RouterResult};

/// Where a view is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Constructed,
    BeforeRender,
    Rendering,
    TitleApplied,
    AfterRender,
    RenderComplete,
    Unloaded,
}

/// Data bound to one mounted view instance
#[derive(Debug)]
pub struct ViewContext {
    navigation_id: Uuid,
    route_path: String,
    params: Params,
    state: RwLock<NavigationState>,
    title: RwLock<String>,
    phase: RwLock<LifecyclePhase>,
    router: Weak<Router>,
}

impl ViewContext {
    pub(crate) fn new(
        navigation_id: Uuid,
        route_path: impl Into<String>,
        params: Params,
        router: Weak<Router>,
    ) -> Self {
        Self {
            navigation_id,
            route_path: route_path.into(),
            params,
            state: RwLock::new(empty_state()),
            title: RwLock::new(String::new()),
            phase: RwLock::new(LifecyclePhase::Constructed),
            router,
        }
    }

    /// A context not bound to any router; navigation fails with `Detached`
    pub fn detached(params: Params) -> Self {
        Self::new(Uuid::new_v4(), "", params, Weak::new())
    }

    /// Id of the navigation that created this view
    pub fn navigation_id(&self) -> Uuid {
        self.navigation_id
    }

    /// Pattern of the route that matched
    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Single parameter value; `None` when absent
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Navigation state handed over by the router
    pub fn state(&self) -> NavigationState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_state(&self, state: NavigationState) {
        *self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// Read one top-level key from the state object
    pub fn state_value(&self, key: &str) -> Option<Value> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Title extracted from the rendered markup, empty until rendered
    pub fn title(&self) -> String {
        self.title
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn set_title(&self, title: impl Into<String>) {
        *self
            .title
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = title.into();
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self
            .phase
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn set_phase(&self, phase: LifecyclePhase) {
        *self
            .phase
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = phase;
    }

    /// The router this view was mounted by, if it is still alive
    pub fn router(&self) -> Option<Arc<Router>> {
        self.router.upgrade()
    }

    /// Navigate through the bound router
    pub async fn navigate_to(
        &self,
        url: &str,
        query: &Value,
        state: NavigationState,
    ) -> RouterResult<RouteOutcome> {
        let router = self.router().ok_or(RouterError::Detached)?;
        router.navigate_to(url, query, state).await
    }

    /// Read a query parameter from the current location
    pub fn get_query_param(&self, name: &str) -> Option<String> {
        self.router()?.get_query_param(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_get_set() {
        let ctx = ViewContext::detached(Params::new());
        assert_eq!(ctx.state(), json!({}));

        ctx.set_state(json!({"from": "list", "page": 3}));
        assert_eq!(ctx.state_value("page"), Some(json!(3)));
        assert_eq!(ctx.state_value("missing"), None);
    }

    #[test]
    fn test_params_lookup() {
        let mut params = Params::new();
        params.insert("id", "42");
        let ctx = ViewContext::detached(params);
        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.param("other"), None);
        assert_eq!(ctx.phase(), LifecyclePhase::Constructed);
    }

    #[tokio::test]
    async fn test_detached_navigation_fails() {
        let ctx = ViewContext::detached(Params::new());
        let result = ctx.navigate_to("/x", &json!({}), json!({})).await;
        assert!(matches!(result, Err(RouterError::Detached)));
        assert_eq!(ctx.get_query_param("x"), None);
    }
}
