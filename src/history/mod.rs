//! Navigation History
//!
//! Abstraction over the browser History API. The router pushes entries and
//! reads the current location through [`History`]; back/forward movement is
//! reported to subscribers as [`PopStateEvent`]s.

mod memory;

pub use memory::MemoryHistory;

use serde_json::Value;
use tokio::sync::mpsc;

/// Opaque application data carried through a history entry
pub type NavigationState = Value;

/// An empty navigation state (`{}`)
pub fn empty_state() -> NavigationState {
    Value::Object(serde_json::Map::new())
}

/// Current address split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path component, always starting with `/`
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    pub search: String,
    /// Fragment including the leading `#`, or empty
    pub hash: String,
}

impl Location {
    /// Parse a URL (absolute path or full URL) into a location
    pub fn parse(url: &str) -> Self {
        // Drop scheme and authority when a full URL is given. A `://` after
        // the first `/`, `?` or `#` belongs to the path, query or fragment.
        let first_delim = url.find(['/', '?', '#']).unwrap_or(url.len());
        let rest = match url.find("://").filter(|&idx| idx < first_delim) {
            Some(idx) => {
                let after = &url[idx + 3..];
                match after.find(['/', '?', '#']) {
                    Some(p) => &after[p..],
                    None => "",
                }
            }
            None => url,
        };

        let (before_hash, hash) = match rest.find('#') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let (path, search) = match before_hash.find('?') {
            Some(idx) => (&before_hash[..idx], &before_hash[idx..]),
            None => (before_hash, ""),
        };

        let pathname = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            pathname,
            search: if search == "?" { String::new() } else { search.to_string() },
            hash: hash.to_string(),
        }
    }

    /// Reassemble the location into a relative URL
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Fired when the active history entry changes through back/forward
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    /// State of the entry that became active; `None` if none was stored
    pub state: Option<NavigationState>,
}

/// Browser-style history stack
pub trait History: Send + Sync {
    /// Push a new entry, discarding any forward entries
    fn push_state(&self, state: NavigationState, url: &str);

    /// Replace the current entry
    fn replace_state(&self, state: NavigationState, url: &str);

    /// The active location
    fn location(&self) -> Location;

    /// The state stored with the active entry
    fn state(&self) -> Option<NavigationState>;

    /// Receive popstate events from this history
    fn subscribe(&self) -> mpsc::UnboundedReceiver<PopStateEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_only() {
        let loc = Location::parse("/users/5");
        assert_eq!(loc.pathname, "/users/5");
        assert_eq!(loc.search, "");
        assert_eq!(loc.hash, "");
    }

    #[test]
    fn test_parse_url_inside_query_stays_in_query() {
        let loc = Location::parse("/redirect?to=http://example.com/foo");
        assert_eq!(loc.pathname, "/redirect");
        assert_eq!(loc.search, "?to=http://example.com/foo");

        let loc = Location::parse("/doc#see=https://example.com/x");
        assert_eq!(loc.pathname, "/doc");
        assert_eq!(loc.hash, "#see=https://example.com/x");
    }

    #[test]
    fn test_parse_with_query_and_hash() {
        let loc = Location::parse("/a?x=1&y=z#top");
        assert_eq!(loc.pathname, "/a");
        assert_eq!(loc.search, "?x=1&y=z");
        assert_eq!(loc.hash, "#top");
        assert_eq!(loc.href(), "/a?x=1&y=z#top");
    }

    #[test]
    fn test_parse_full_url() {
        let loc = Location::parse("https://example.com/admin?tab=2");
        assert_eq!(loc.pathname, "/admin");
        assert_eq!(loc.search, "?tab=2");

        let root = Location::parse("https://example.com");
        assert_eq!(root.pathname, "/");
    }

    #[test]
    fn test_parse_relative_gets_leading_slash() {
        assert_eq!(Location::parse("about").pathname, "/about");
        assert_eq!(Location::parse("").pathname, "/");
    }
}
