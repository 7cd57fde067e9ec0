//! Routes, matches and parameters

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::pattern::RoutePattern;
use crate::view::{view_factory, View, ViewFactory};

/// Route parameters: placeholder name to decoded value, plus injected keys.
///
/// A name missing from the map is "undefined"; callers must tolerate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply `other` on top of these params; its keys win
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A path pattern paired with the factory for its view
#[derive(Clone)]
pub struct Route {
    path: String,
    factory: ViewFactory,
}

impl Route {
    pub fn new(path: impl Into<String>, factory: ViewFactory) -> Self {
        Self {
            path: path.into(),
            factory,
        }
    }

    /// Route whose view is built by `f` from the route parameters
    pub fn view<F, V>(path: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Params) -> V + Send + Sync + 'static,
        V: View + 'static,
    {
        Self::new(path, view_factory(f))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn factory(&self) -> &ViewFactory {
        &self.factory
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("path", &self.path).finish()
    }
}

/// Result of matching the current path against one route
#[derive(Debug)]
pub struct RouteMatch<'a> {
    route: &'a Route,
    pattern: &'a RoutePattern,
    captures: Vec<String>,
}

impl<'a> RouteMatch<'a> {
    pub(crate) fn new(route: &'a Route, pattern: &'a RoutePattern, captures: Vec<String>) -> Self {
        Self {
            route,
            pattern,
            captures,
        }
    }

    pub fn route(&self) -> &'a Route {
        self.route
    }

    /// Raw capture groups in placeholder order
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// Zip placeholder names with captured values, percent-decoded.
    ///
    /// Names without a capture are left out.
    pub fn params(&self) -> Params {
        self.pattern
            .param_names()
            .iter()
            .zip(self.captures.iter())
            .map(|(name, raw)| (name.clone(), decode_segment(raw)))
            .collect()
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::pattern::ParamMatching;
    use crate::view::TemplateView;

    #[test]
    fn test_params_merge_overrides() {
        let mut params: Params = [("id", "1"), ("tab", "info")].into_iter().collect();
        params.merge([("id", "2"), ("user", "me")].into_iter().collect());

        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.get("tab"), Some("info"));
        assert_eq!(params.get("user"), Some("me"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_match_params_are_decoded() {
        let route = Route::view("/search/:term", |_| TemplateView::new(""));
        let pattern = RoutePattern::compile(route.path(), ParamMatching::Greedy).unwrap();
        let captures = pattern.captures("/search/hello%20world").unwrap();

        let m = RouteMatch::new(&route, &pattern, captures);
        assert_eq!(m.params().get("term"), Some("hello world"));
        assert_eq!(m.captures(), &["hello%20world".to_string()]);
    }

    #[test]
    fn test_missing_capture_leaves_param_undefined() {
        let route = Route::view("/a/:x/:y", |_| TemplateView::new(""));
        let pattern = RoutePattern::compile(route.path(), ParamMatching::Greedy).unwrap();

        let m = RouteMatch::new(&route, &pattern, vec!["1".to_string()]);
        let params = m.params();
        assert_eq!(params.get("x"), Some("1"));
        assert!(!params.contains("y"));
    }

    #[test]
    fn test_route_debug_shows_path() {
        let route = Route::view("/users/:id", |_| TemplateView::new(""));
        assert_eq!(format!("{:?}", route), "Route { path: \"/users/:id\" }");
    }
}
