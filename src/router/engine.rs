//! Router Engine
//!
//! Owns the route table and drives every navigation:
//!
//! 1. Resolve the navigation state (default `{}`)
//! 2. Match the current path, first match wins
//! 3. Redirect unmatched paths to `/404notfound{path}`
//! 4. Ask `before_route`; a `false` leaves the mounted view untouched
//! 5. Extract positional params, apply `inject_params`
//! 6. Build the view and hand it the state
//! 7. Unload the previous view, clear the container, mount the new one
//! 8. Notify `after_route`, then run the view lifecycle
//!
//! Every mount claims a new generation. A lifecycle whose generation is no
//! longer current stops at its next await boundary without touching the
//! container, so overlapping navigations never commit stale markup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use serde_json::Value;
use uuid::Uuid;

use super::error::{RouterError, RouterResult};
use super::hooks::{NavigateFn, RouterHooks};
use super::pattern::{ParamMatching, RoutePattern, NOT_FOUND_PATH, NOT_FOUND_PREFIX};
use super::route::{Route, RouteMatch};
use crate::document::Document;
use crate::history::{empty_state, History, Location, NavigationState};
use crate::query_string::{compose_url, get_query_param, to_ordered_map};
use crate::view::{
    extract_title, view_factory, DefaultPageNotFound, LifecyclePhase, View, ViewContext,
    ViewFactory,
};

/// How a navigation ended
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// The view ran its full lifecycle and its markup is mounted
    Rendered(Arc<ViewContext>),
    /// `before_route` returned false; nothing was mounted
    Vetoed { route: String },
    /// A newer navigation took over before the lifecycle finished
    Superseded(Arc<ViewContext>),
}

impl RouteOutcome {
    /// Context of the view built for this navigation, if one was built
    pub fn context(&self) -> Option<&Arc<ViewContext>> {
        match self {
            RouteOutcome::Rendered(ctx) | RouteOutcome::Superseded(ctx) => Some(ctx),
            RouteOutcome::Vetoed { .. } => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, RouteOutcome::Rendered(_))
    }
}

struct MountedView {
    view: Arc<dyn View>,
    ctx: Arc<ViewContext>,
}

/// Single-page-application router
pub struct Router {
    target: String,
    routes: Vec<Route>,
    patterns: Vec<RoutePattern>,
    history: Arc<dyn History>,
    document: Arc<dyn Document>,
    hooks: RwLock<RouterHooks>,
    mounted: Mutex<Option<MountedView>>,
    generation: AtomicU64,
    self_ref: Weak<Router>,
}

impl Router {
    /// Create a router with greedy parameter matching.
    ///
    /// The not-found route is appended after `routes`, using
    /// [`DefaultPageNotFound`] when `not_found` is `None`. The target selector
    /// is resolved lazily at mount time.
    pub fn new(
        target: impl Into<String>,
        routes: Vec<Route>,
        not_found: Option<ViewFactory>,
        history: Arc<dyn History>,
        document: Arc<dyn Document>,
    ) -> RouterResult<Arc<Self>> {
        Self::with_matching(
            target,
            routes,
            not_found,
            history,
            document,
            ParamMatching::default(),
        )
    }

    /// Create a router with an explicit parameter matching mode
    pub fn with_matching(
        target: impl Into<String>,
        mut routes: Vec<Route>,
        not_found: Option<ViewFactory>,
        history: Arc<dyn History>,
        document: Arc<dyn Document>,
        matching: ParamMatching,
    ) -> RouterResult<Arc<Self>> {
        let mut patterns = routes
            .iter()
            .map(|route| RoutePattern::compile(route.path(), matching))
            .collect::<RouterResult<Vec<_>>>()?;

        let not_found = not_found.unwrap_or_else(|| view_factory(|_| DefaultPageNotFound));
        routes.push(Route::new(NOT_FOUND_PATH, not_found));
        patterns.push(RoutePattern::not_found()?);

        let target = target.into();
        tracing::debug!(
            target_selector = %target,
            routes = routes.len(),
            ?matching,
            "Router created"
        );

        Ok(Arc::new_cyclic(|self_ref| Self {
            target,
            routes,
            patterns,
            history,
            document,
            hooks: RwLock::new(RouterHooks::default()),
            mounted: Mutex::new(None),
            generation: AtomicU64::new(0),
            self_ref: self_ref.clone(),
        }))
    }

    /// Selector of the mount container
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Registered routes, not-found route last
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn location(&self) -> Location {
        self.history.location()
    }

    /// Context of the currently mounted view
    pub fn current_view(&self) -> Option<Arc<ViewContext>> {
        self.lock_mounted().as_ref().map(|m| Arc::clone(&m.ctx))
    }

    /// Snapshot of the registered hooks
    pub fn hooks(&self) -> RouterHooks {
        self.hooks
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace hooks in place
    pub fn update_hooks(&self, f: impl FnOnce(&mut RouterHooks)) {
        let mut hooks = self
            .hooks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut hooks);
    }

    /// Read a query parameter from the current location
    pub fn get_query_param(&self, name: &str) -> Option<String> {
        get_query_param(&self.history.location().search, name)
    }

    /// Push a history entry for `url` plus the encoded `query`, then route.
    ///
    /// `query` is a JSON object; keys keep their insertion order and
    /// object-valued entries are JSON encoded.
    pub async fn navigate_to(
        &self,
        url: &str,
        query: &Value,
        state: NavigationState,
    ) -> RouterResult<RouteOutcome> {
        let full_url = compose_url(url, &to_ordered_map(query));
        tracing::debug!(url = %full_url, "Navigating");

        self.history.push_state(state.clone(), &full_url);
        self.route(Some(state)).await
    }

    /// A navigation callback for code that cannot await.
    ///
    /// Each call spawns `navigate_to(path)` on the current tokio runtime.
    /// Calls made outside a runtime, or after the router is dropped, are
    /// logged and ignored.
    pub fn navigate_fn(&self) -> NavigateFn {
        let router = self.self_ref.clone();
        Arc::new(move |path: &str| {
            let Some(router) = router.upgrade() else {
                tracing::warn!(path = %path, "Navigation requested on a dropped router");
                return;
            };
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                tracing::warn!(path = %path, "Navigation requested outside a runtime");
                return;
            };

            let path = path.to_string();
            handle.spawn(async move {
                if let Err(e) = router.navigate_to(&path, &Value::Null, empty_state()).await {
                    tracing::error!(path = %path, error = %e, "Navigation failed");
                }
            });
        })
    }

    /// Route the current location.
    ///
    /// View lifecycle errors are returned as-is; by then the previous view is
    /// already gone, so the container stays empty.
    pub async fn route(&self, state: Option<NavigationState>) -> RouterResult<RouteOutcome> {
        let navigation_id = Uuid::new_v4();
        let hooks = self.hooks();

        let (index, captures, redirected) = self.resolve(navigation_id)?;
        let route = &self.routes[index];
        // A redirect is a fresh navigation with empty state
        let state = match (redirected, state) {
            (false, Some(state)) => state,
            _ => empty_state(),
        };

        if let Some(before_route) = &hooks.before_route {
            if !before_route(route) {
                tracing::info!(
                    navigation_id = %navigation_id,
                    route = %route.path(),
                    "Navigation vetoed"
                );
                return Ok(RouteOutcome::Vetoed {
                    route: route.path().to_string(),
                });
            }
        }

        let route_match = RouteMatch::new(route, &self.patterns[index], captures);
        let mut params = route_match.params();
        if let Some(inject_params) = &hooks.inject_params {
            params.merge(inject_params(&route_match));
        }

        let view = (route.factory())(&params);
        let ctx = Arc::new(ViewContext::new(
            navigation_id,
            route.path(),
            params,
            self.self_ref.clone(),
        ));
        ctx.set_state(state);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.mount(Arc::clone(&view), Arc::clone(&ctx), generation).await? {
            return Ok(RouteOutcome::Superseded(ctx));
        }

        tracing::info!(
            navigation_id = %navigation_id,
            route = %route.path(),
            "View mounted"
        );

        if let Some(after_route) = &hooks.after_route {
            after_route(route);
        }

        self.run_lifecycle(view, ctx, generation, &hooks).await
    }

    /// Find the route for the current path, redirecting to not-found once
    fn resolve(&self, navigation_id: Uuid) -> RouterResult<(usize, Vec<String>, bool)> {
        let pathname = self.history.location().pathname;
        if let Some((index, captures)) = self.find_match(&pathname) {
            tracing::debug!(
                navigation_id = %navigation_id,
                path = %pathname,
                route = %self.routes[index].path(),
                "Route matched"
            );
            return Ok((index, captures, false));
        }

        let redirect = format!("{}{}", NOT_FOUND_PREFIX, pathname);
        tracing::warn!(
            navigation_id = %navigation_id,
            path = %pathname,
            redirect = %redirect,
            "No route matched"
        );
        self.history.push_state(empty_state(), &redirect);

        let pathname = self.history.location().pathname;
        self.find_match(&pathname)
            .map(|(index, captures)| (index, captures, true))
            .ok_or(RouterError::NoRoute(pathname))
    }

    fn find_match(&self, pathname: &str) -> Option<(usize, Vec<String>)> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(index, pattern)| pattern.captures(pathname).map(|c| (index, c)))
    }

    /// Swap the mounted view. Returns false if a newer navigation won.
    async fn mount(
        &self,
        view: Arc<dyn View>,
        ctx: Arc<ViewContext>,
        generation: u64,
    ) -> RouterResult<bool> {
        let previous = self.lock_mounted().take();
        if let Some(previous) = previous {
            previous.ctx.set_phase(LifecyclePhase::Unloaded);
            previous.view.on_unload(&previous.ctx).await;
            tracing::debug!(
                navigation_id = %previous.ctx.navigation_id(),
                route = %previous.ctx.route_path(),
                "View unloaded"
            );
        }

        let mut mounted = self.lock_mounted();
        if !self.is_current(generation) {
            return Ok(false);
        }
        self.document.clear(&self.target)?;
        *mounted = Some(MountedView { view, ctx });
        Ok(true)
    }

    async fn run_lifecycle(
        &self,
        view: Arc<dyn View>,
        ctx: Arc<ViewContext>,
        generation: u64,
        hooks: &RouterHooks,
    ) -> RouterResult<RouteOutcome> {
        ctx.set_phase(LifecyclePhase::BeforeRender);
        view.before_render(&ctx).await?;
        if !self.is_current(generation) {
            return Ok(self.superseded(ctx));
        }

        ctx.set_phase(LifecyclePhase::Rendering);
        let markup = view.render(&ctx).await?;
        if !self.is_current(generation) {
            return Ok(self.superseded(ctx));
        }

        let (title, markup) = extract_title(&markup)?;
        if let Some(title) = title {
            self.document.set_title(&title);
            ctx.set_title(title);
        }
        // Visible to the document while it receives the markup
        ctx.set_phase(LifecyclePhase::TitleApplied);
        self.document.commit(&self.target, markup.as_str())?;

        ctx.set_phase(LifecyclePhase::AfterRender);
        view.after_render(&ctx).await?;
        if !self.is_current(generation) {
            return Ok(self.superseded(ctx));
        }

        ctx.set_phase(LifecyclePhase::RenderComplete);
        if let Some(on_render_complete) = &hooks.on_render_complete {
            on_render_complete(&ctx);
        }

        Ok(RouteOutcome::Rendered(ctx))
    }

    fn superseded(&self, ctx: Arc<ViewContext>) -> RouteOutcome {
        tracing::debug!(
            navigation_id = %ctx.navigation_id(),
            route = %ctx.route_path(),
            "Lifecycle superseded by newer navigation"
        );
        RouteOutcome::Superseded(ctx)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn lock_mounted(&self) -> std::sync::MutexGuard<'_, Option<MountedView>> {
        self.mounted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("target", &self.target)
            .field("routes", &self.routes)
            .field("hooks", &self.hooks())
            .finish()
    }
}
