//! Session lookup for the gate.
//!
//! Sessions are issued by the federated login handshake, which lives outside
//! this server; the gate only needs to find out who (if anyone) a request's
//! session cookie belongs to.

use axum_extra::extract::CookieJar;
use sso_gate_platform_access::SessionUser;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// In-memory session table keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionUser>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a user and returns its id.
    pub async fn create(&self, user: SessionUser) -> String {
        let session_id = ulid::Ulid::new().to_string();
        self.inner.write().await.insert(session_id.clone(), user);
        session_id
    }

    /// Returns the user a session belongs to.
    pub async fn find(&self, session_id: &str) -> Option<SessionUser> {
        self.inner.read().await.get(session_id).cloned()
    }

    /// Removes a session.
    pub async fn delete(&self, session_id: &str) {
        self.inner.write().await.remove(session_id);
    }

    /// Resolves the user from the request's session cookie.
    pub async fn user_from_cookies(&self, jar: &CookieJar) -> Option<SessionUser> {
        let cookie = jar.get(SESSION_COOKIE)?;
        self.find(cookie.value()).await
    }
}
