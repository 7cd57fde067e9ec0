//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::http::DEFAULT_SPINNER_DELAY_MS;
use crate::router::ParamMatching;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub graphql: GraphQlConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Template routes, in match order
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Application bootstrap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Selector of the mount container
    #[serde(default = "default_target")]
    pub target: String,

    /// Template for the not-found page; the built-in page when unset
    pub not_found_template: Option<String>,
}

fn default_target() -> String {
    "#app".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            not_found_template: None,
        }
    }
}

/// Router behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouterConfig {
    /// `greedy` lets a parameter span slashes, `segment` does not
    #[serde(default)]
    pub param_matching: ParamMatching,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long a request may run before the spinner is shown
    #[serde(default = "default_spinner_delay")]
    pub spinner_delay_ms: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_spinner_delay() -> u64 {
    DEFAULT_SPINNER_DELAY_MS
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            spinner_delay_ms: default_spinner_delay(),
        }
    }
}

/// GraphQL client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlConfig {
    #[serde(default = "default_graphql_endpoint")]
    pub endpoint: String,

    /// Where to send the user when the session expires
    #[serde(default = "default_redirect_path")]
    pub redirect_path: String,
}

fn default_graphql_endpoint() -> String {
    "http://localhost:8080/graphql".to_string()
}

fn default_redirect_path() -> String {
    "/".to_string()
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            endpoint: default_graphql_endpoint(),
            redirect_path: default_redirect_path(),
        }
    }
}

/// A route rendered from a fixed template
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub template: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("frame-spa").join("config.toml")),
            Some(PathBuf::from("/etc/frame-spa/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(target) = std::env::var("FRAME_TARGET") {
            self.app.target = target;
        }

        if let Ok(mode) = std::env::var("FRAME_PARAM_MATCHING") {
            match mode.parse() {
                Ok(mode) => self.router.param_matching = mode,
                Err(e) => tracing::warn!("Ignoring FRAME_PARAM_MATCHING: {}", e),
            }
        }

        if let Ok(endpoint) = std::env::var("FRAME_GRAPHQL_ENDPOINT") {
            self.graphql.endpoint = endpoint;
        }

        if let Ok(level) = std::env::var("FRAME_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FRAME_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frame_spa={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing already initialized: {}", e);
    }
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Frame SPA Configuration
#
# Environment variables override these settings:
# - FRAME_TARGET
# - FRAME_PARAM_MATCHING
# - FRAME_GRAPHQL_ENDPOINT
# - FRAME_LOG_LEVEL
# - FRAME_LOG_FORMAT

[app]
# Selector of the container views are mounted into
target = "#app"

# Template for the not-found page ({path} is the unmatched path)
# not_found_template = "<title>Lost</title><p>Nothing at {path}</p>"

[router]
# greedy: a :param may span slashes (/a/:x/b matches /a/1/2/b)
# segment: a :param stays within one path segment
param_matching = "greedy"

[http]
# Request timeout in seconds
request_timeout_secs = 30

# Show the loading spinner after this many milliseconds
spinner_delay_ms = 1000

[graphql]
# GraphQL endpoint
endpoint = "http://localhost:8080/graphql"

# Redirect target when the session token has expired
redirect_path = "/"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Routes are matched in order; the first match wins.
# {name} in a template is replaced with the :name parameter.
[[routes]]
path = "/"
template = "<title>Home</title><p>Welcome</p>"

[[routes]]
path = "/users/:id"
template = "<title>User {id}</title><p>User {id}</p>"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.target, "#app");
        assert_eq!(config.router.param_matching, ParamMatching::Greedy);
        assert_eq!(config.http.spinner_delay_ms, 1000);
        assert_eq!(config.graphql.redirect_path, "/");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.app.target, "#app");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].path, "/users/:id");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [router]
            param_matching = "segment"

            [[routes]]
            path = "/a"
            template = "a"
            "#,
        )
        .unwrap();

        assert_eq!(config.router.param_matching, ParamMatching::Segment);
        assert_eq!(config.app.target, "#app");
        assert_eq!(config.http.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_matching_mode_is_rejected() {
        let result = Config::parse("[router]\nparam_matching = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[app]\ntarget = \"#main\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.app.target, "#main");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
