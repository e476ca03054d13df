//! Session state and the navigation guard.
//!
//! The guard is a pure, total, synchronous function: given a target
//! route and the current login flag it always reaches a decision and
//! performs no side effects, so it can run before every route
//! transition without any async machinery.

use std::collections::HashMap;
use std::sync::Mutex;

/// Persisted-state key recording login state (`"true"` or absent).
pub const SESSION_KEY: &str = "isLoggedIn";

/// Minimal key-value string store backing the session flag. The shell
/// (browser local storage, a config file, ...) provides the real
/// implementation.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store, used in tests and headless tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.inner.lock().unwrap().remove(key);
    }
}

/// Read the login flag. Defaults to `false` when the key is absent.
pub fn is_logged_in(store: &dyn SessionStore) -> bool {
    store.get(SESSION_KEY).as_deref() == Some("true")
}

/// Record a successful login.
pub fn log_in(store: &dyn SessionStore) {
    store.set(SESSION_KEY, "true");
}

/// Clear the session flag (logout or expiry).
pub fn log_out(store: &dyn SessionStore) {
    store.remove(SESSION_KEY);
}

/// Route metadata consulted by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub path: String,
    pub requires_auth: bool,
}

impl RouteMeta {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

/// The two special routes the guard redirects to.
#[derive(Debug, Clone)]
pub struct GuardPaths {
    pub login: String,
    pub home: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: "/login".to_owned(),
            home: "/dashboard".to_owned(),
        }
    }
}

/// Decide whether navigation to `target` is allowed.
///
/// Rules:
/// 1. The login page bounces an already-authenticated user home and
///    admits everyone else.
/// 2. Routes not requiring authentication are always allowed.
/// 3. Anything else requires a login; unauthenticated users are sent to
///    the login page.
///
/// Both redirect targets are terminal under these rules (the login page
/// is public, the home page admits any logged-in user), so a redirect
/// can never cycle.
pub fn decide(target: &RouteMeta, is_logged_in: bool, paths: &GuardPaths) -> Decision {
    if target.path == paths.login {
        return if is_logged_in {
            Decision::RedirectTo(paths.home.clone())
        } else {
            Decision::Allow
        };
    }
    if !target.requires_auth {
        return Decision::Allow;
    }
    if !is_logged_in {
        return Decision::RedirectTo(paths.login.clone());
    }
    Decision::Allow
}
