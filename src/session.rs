//! Session Store
//!
//! Holds the auth token and the signed-in member for the lifetime of the
//! page, and builds the standard token-expiry callback and token getter for
//! [`GraphQlClient`](crate::http::GraphQlClient).

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::http::{ExpiredTokenCallback, TokenGetter};
use crate::router::NavigateFn;

/// Message used when a session is found to be expired
pub const ERR_TOKEN_EXPIRED: &str = "token expired";

/// In-memory session storage
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
    member: RwLock<Option<Value>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn has_token(&self) -> bool {
        self.token.read().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    /// Store the member record as JSON
    pub fn set_member<T: Serialize>(&self, member: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(member)?;
        *self.member.write().unwrap_or_else(|p| p.into_inner()) = Some(value);
        Ok(())
    }

    /// Read the member record back; `None` if absent or of another shape
    pub fn member<T: DeserializeOwned>(&self) -> Option<T> {
        let member = self.member.read().unwrap_or_else(|p| p.into_inner()).clone()?;
        serde_json::from_value(member).ok()
    }

    pub fn has_member(&self) -> bool {
        self.member.read().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    pub fn clear_member(&self) {
        *self.member.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    /// Token getter reading from this store
    pub fn token_getter(self: &Arc<Self>) -> TokenGetter {
        let store = Arc::clone(self);
        Arc::new(move || store.token())
    }

    /// The standard expiry policy.
    ///
    /// A 401 clears the token and redirects; so does a missing token. Any other
    /// case keeps the session.
    pub fn token_expired_callback(self: &Arc<Self>) -> ExpiredTokenCallback {
        let store = Arc::clone(self);
        Arc::new(move |status: Option<u16>, path: &str, navigate: &NavigateFn| {
            if status == Some(401) || !store.has_token() {
                store.clear_token();
                tracing::info!(path = %path, reason = ERR_TOKEN_EXPIRED, "Redirecting");
                navigate(path);
                return false;
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Member {
        id: u32,
        email: String,
    }

    fn recording_navigate() -> (NavigateFn, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&log);
        let navigate: NavigateFn = Arc::new(move |path: &str| {
            seen.lock().unwrap().push(path.to_string());
        });
        (navigate, log)
    }

    #[test]
    fn test_token_slots() {
        let store = Arc::new(SessionStore::new());
        assert!(!store.has_token());

        store.set_token("t1");
        assert_eq!(store.token(), Some("t1".to_string()));
        assert_eq!((store.token_getter())(), Some("t1".to_string()));

        store.clear_token();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_member_roundtrip() {
        let store = SessionStore::new();
        let member = Member {
            id: 3,
            email: "a@b.c".to_string(),
        };
        store.set_member(&member).unwrap();

        assert!(store.has_member());
        assert_eq!(store.member::<Member>(), Some(member));

        store.clear_member();
        assert_eq!(store.member::<Member>(), None);
    }

    #[test]
    fn test_expiry_callback_keeps_valid_session() {
        let store = Arc::new(SessionStore::new());
        store.set_token("t");
        let (navigate, log) = recording_navigate();

        let callback = store.token_expired_callback();
        assert!(callback(None, "/", &navigate));
        assert!(callback(Some(400), "/", &navigate));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_expiry_callback_on_unauthorized() {
        let store = Arc::new(SessionStore::new());
        store.set_token("t");
        let (navigate, log) = recording_navigate();

        let callback = store.token_expired_callback();
        assert!(!callback(Some(401), "/login", &navigate));
        assert!(!store.has_token());
        assert_eq!(*log.lock().unwrap(), vec!["/login".to_string()]);
    }

    #[test]
    fn test_expiry_callback_without_token() {
        let store = Arc::new(SessionStore::new());
        let (navigate, log) = recording_navigate();

        assert!(!(store.token_expired_callback())(None, "/", &navigate));
        assert_eq!(*log.lock().unwrap(), vec!["/".to_string()]);
    }
}
