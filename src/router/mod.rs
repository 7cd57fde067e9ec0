//! Client-side Router
//!
//! Matches paths against `:param` patterns, extracts parameters, mounts views
//! into a container and keeps history in sync.

mod engine;
mod error;
mod hooks;
mod pattern;
mod route;

pub use engine::{RouteOutcome, Router};
pub use error::{RouterError, RouterResult};
pub use hooks::{
    AfterRouteHook, BeforeRouteHook, InjectParamsHook, NavigateFn, RenderCompleteHook,
    RouterHooks,
};
pub use pattern::{ParamMatching, RoutePattern, NOT_FOUND_PATH, NOT_FOUND_PREFIX};
pub use route::{Params, Route, RouteMatch};
