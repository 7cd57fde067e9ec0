//! Route Pattern Compilation
//!
//! Translates `/literal/:name` paths into anchored regular expressions.
//! Literal text is escaped; every `:name` placeholder becomes one capture
//! group. Matching is first-match-wins in declaration order, so there is no
//! specificity ranking here.

use regex::Regex;
use serde::Deserialize;

use super::error::{RouterError, RouterResult};

/// Path prefix of the synthetic not-found route
pub const NOT_FOUND_PREFIX: &str = "/404notfound";

/// Declared path of the synthetic not-found route
pub const NOT_FOUND_PATH: &str = "/404notfound/:path";

/// How a `:name` placeholder matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMatching {
    /// One or more of any character, slashes included
    #[default]
    Greedy,
    /// One or more characters within a single path segment
    Segment,
}

impl ParamMatching {
    fn group(self) -> &'static str {
        match self {
            ParamMatching::Greedy => "(.+)",
            ParamMatching::Segment => "([^/]+)",
        }
    }
}

impl std::str::FromStr for ParamMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(ParamMatching::Greedy),
            "segment" => Ok(ParamMatching::Segment),
            other => Err(format!("unknown param matching mode: {}", other)),
        }
    }
}

/// A compiled route path
#[derive(Debug, Clone)]
pub struct RoutePattern {
    path: String,
    names: Vec<String>,
    regex: Regex,
}

impl RoutePattern {
    /// Compile a route path
    pub fn compile(path: &str, matching: ParamMatching) -> RouterResult<Self> {
        let placeholder = Regex::new(r":(\w+)").map_err(|e| pattern_error(path, e))?;

        let mut names = Vec::new();
        let mut source = String::from("^");
        let mut last = 0;

        for caps in placeholder.captures_iter(path) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            source.push_str(&regex::escape(&path[last..whole.start()]));
            source.push_str(matching.group());
            names.push(name.as_str().to_string());
            last = whole.end();
        }
        source.push_str(&regex::escape(&path[last..]));
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| pattern_error(path, e))?;

        Ok(Self {
            path: path.to_string(),
            names,
            regex,
        })
    }

    /// Pattern of the synthetic not-found route.
    ///
    /// Captures everything after the prefix including the leading slash, so the
    /// `path` parameter equals the path that failed to match. It matches any
    /// redirect target regardless of the configured [`ParamMatching`].
    pub fn not_found() -> RouterResult<Self> {
        let source = format!("^{}(/.*)$", regex::escape(NOT_FOUND_PREFIX));
        let regex = Regex::new(&source).map_err(|e| pattern_error(NOT_FOUND_PATH, e))?;

        Ok(Self {
            path: NOT_FOUND_PATH.to_string(),
            names: vec!["path".to_string()],
            regex,
        })
    }

    /// The declared path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Placeholder names in declaration order
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    pub fn is_match(&self, pathname: &str) -> bool {
        self.regex.is_match(pathname)
    }

    /// Raw capture groups when `pathname` matches
    pub fn captures(&self, pathname: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(pathname)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}

fn pattern_error(path: &str, error: regex::Error) -> RouterError {
    RouterError::Pattern {
        path: path.to_string(),
        error: error.to_string(),
    }
}
