//! Application Bootstrap
//!
//! [`application`] builds a [`Router`] over a route table and returns a small
//! facade for registering hooks, running the initial route and reacting to
//! back/forward navigation. Each call yields an independent application; there
//! is no process-wide router.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::document::Document;
use crate::history::{History, NavigationState, PopStateEvent};
use crate::router::{
    Params, Route, RouteMatch, RouteOutcome, Router, RouterResult, NOT_FOUND_PATH,
};
use crate::view::{view_factory, TemplateView, ViewContext, ViewFactory};

/// Build an application mounting into `target`.
///
/// The popstate subscription is taken here, so back/forward events that fire
/// before [`Application::listen`] is called are queued, not lost.
pub fn application(
    target: impl Into<String>,
    routes: Vec<Route>,
    not_found: Option<ViewFactory>,
    history: Arc<dyn History>,
    document: Arc<dyn Document>,
) -> RouterResult<Application> {
    let router = Router::new(target, routes, not_found, history, document)?;
    Ok(Application::with_router(router))
}

/// Facade over a running router.
///
/// Dropping the application stops every task started by [`listen`].
///
/// [`listen`]: Application::listen
pub struct Application {
    router: Arc<Router>,
    pop_states: Arc<Mutex<mpsc::UnboundedReceiver<PopStateEvent>>>,
    // Never written; listeners stop when it is dropped
    shutdown: watch::Sender<()>,
}

impl Application {
    /// Wrap an existing router and subscribe to its history
    pub fn with_router(router: Arc<Router>) -> Self {
        let pop_states = router.history().subscribe();
        let (shutdown, _) = watch::channel(());
        Self {
            router,
            pop_states: Arc::new(Mutex::new(pop_states)),
            shutdown,
        }
    }

    /// Build from configuration: target selector, matching mode and template
    /// routes, plus the optional not-found template
    pub fn from_config(
        config: &Config,
        history: Arc<dyn History>,
        document: Arc<dyn Document>,
    ) -> RouterResult<Self> {
        let routes = config
            .routes
            .iter()
            .map(|route| {
                let template = route.template.clone();
                Route::view(&route.path, move |_| TemplateView::new(template.clone()))
            })
            .collect();

        let not_found = config.app.not_found_template.clone().map(|template| {
            view_factory(move |_: &Params| TemplateView::new(template.clone()))
        });

        let router = Router::with_matching(
            &config.app.target,
            routes,
            not_found,
            history,
            document,
            config.router.param_matching,
        )?;
        Ok(Self::with_router(router))
    }

    /// Registered routes, not-found route last
    pub fn routes(&self) -> &[Route] {
        self.router.routes()
    }

    pub fn target(&self) -> &str {
        self.router.target()
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Veto navigations: return `false` to keep the current view
    pub fn before_route<F>(&self, f: F) -> &Self
    where
        F: Fn(&Route) -> bool + Send + Sync + 'static,
    {
        self.router
            .update_hooks(|hooks| hooks.before_route = Some(Arc::new(f)));
        self
    }

    pub fn after_route<F>(&self, f: F) -> &Self
    where
        F: Fn(&Route) + Send + Sync + 'static,
    {
        self.router
            .update_hooks(|hooks| hooks.after_route = Some(Arc::new(f)));
        self
    }

    /// Add computed parameters to every match
    pub fn inject_params<F>(&self, f: F) -> &Self
    where
        F: Fn(&RouteMatch<'_>) -> Params + Send + Sync + 'static,
    {
        self.router
            .update_hooks(|hooks| hooks.inject_params = Some(Arc::new(f)));
        self
    }

    pub fn on_render_complete<F>(&self, f: F) -> &Self
    where
        F: Fn(&ViewContext) + Send + Sync + 'static,
    {
        self.router
            .update_hooks(|hooks| hooks.on_render_complete = Some(Arc::new(f)));
        self
    }

    /// Route the initial location with the entry's current state
    pub async fn go(&self) -> RouterResult<RouteOutcome> {
        let state = self.router.history().state();
        self.router.route(state).await
    }

    /// Alias for [`Router::navigate_to`]
    pub async fn navigate_to(
        &self,
        url: &str,
        query: &Value,
        state: NavigationState,
    ) -> RouterResult<RouteOutcome> {
        self.router.navigate_to(url, query, state).await
    }

    /// Re-route after a back/forward move with the restored state
    pub async fn handle_pop_state(&self, event: PopStateEvent) -> RouterResult<RouteOutcome> {
        tracing::debug!(path = %self.router.location().pathname, "Handling popstate");
        self.router.route(event.state).await
    }

    /// Wait for the next queued popstate and handle it.
    ///
    /// Returns `None` once the history is gone. Blocks while a [`listen`]
    /// task owns the queue.
    ///
    /// [`listen`]: Application::listen
    pub async fn handle_next_pop_state(&self) -> Option<RouterResult<RouteOutcome>> {
        let event = self.pop_states.lock().await.recv().await?;
        Some(self.handle_pop_state(event).await)
    }

    /// Spawn a task routing every popstate.
    ///
    /// The task ends when the application is dropped or the history closes.
    /// It holds only a weak handle to the router. Routing errors are logged
    /// and the loop keeps running.
    pub fn listen(&self) -> JoinHandle<()> {
        let router = Arc::downgrade(&self.router);
        let pop_states = Arc::clone(&self.pop_states);
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut pop_states = tokio::select! {
                guard = pop_states.lock() => guard,
                _ = shutdown.changed() => return,
            };

            loop {
                let event = tokio::select! {
                    event = pop_states.recv() => event,
                    _ = shutdown.changed() => None,
                };
                let Some(event) = event else { break };
                let Some(router) = router.upgrade() else { break };

                let path = router.location().pathname;
                match router.route(event.state).await {
                    Ok(outcome) => {
                        tracing::debug!(path = %path, rendered = outcome.is_rendered(), "Popstate routed");
                    }
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Popstate routing failed");
                    }
                }
            }
            tracing::debug!("Popstate listener stopping");
        })
    }

    /// Whether `route` is the synthetic not-found route
    pub fn is_not_found_route(route: &Route) -> bool {
        route.path() == NOT_FOUND_PATH
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("router", &self.router)
            .finish()
    }
}
