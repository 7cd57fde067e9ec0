//! Router hooks
//!
//! Optional callbacks observing or vetoing steps of a navigation.

use std::fmt;
use std::sync::Arc;

use super::route::{Params, Route, RouteMatch};
use crate::view::ViewContext;

/// Runs before mounting; returning `false` vetoes the navigation
pub type BeforeRouteHook = Arc<dyn Fn(&Route) -> bool + Send + Sync>;

/// Runs once the new view has been mounted
pub type AfterRouteHook = Arc<dyn Fn(&Route) + Send + Sync>;

/// Adds computed parameters to every match; returned keys win
pub type InjectParamsHook = Arc<dyn Fn(&RouteMatch<'_>) -> Params + Send + Sync>;

/// Observes a view finishing its render lifecycle
pub type RenderCompleteHook = Arc<dyn Fn(&ViewContext) + Send + Sync>;

/// Fire-and-forget navigation to a path, for callbacks that cannot await
pub type NavigateFn = Arc<dyn Fn(&str) + Send + Sync>;

/// The set of registered hooks
#[derive(Clone, Default)]
pub struct RouterHooks {
    pub before_route: Option<BeforeRouteHook>,
    pub after_route: Option<AfterRouteHook>,
    pub inject_params: Option<InjectParamsHook>,
    pub on_render_complete: Option<RenderCompleteHook>,
}

impl fmt::Debug for RouterHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHooks")
            .field("before_route", &self.before_route.is_some())
            .field("after_route", &self.after_route.is_some())
            .field("inject_params", &self.inject_params.is_some())
            .field("on_render_complete", &self.on_render_complete.is_some())
            .finish()
    }
}
