//! Login sessions
//!
//! A session is an opaque token handed out after a credential check. It is
//! carried explicitly by each request and expires after a fixed TTL; logout
//! removes it. The store is owned by whoever serves requests.

use std::collections::HashMap;
use std::sync::Mutex;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The operator credential pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        // No short-circuit between the two checks
        let user_ok = self.username == username;
        let pass_ok = self.password == password;
        user_ok & pass_ok
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("HR_USER", "HR_USER_123")
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Live sessions keyed by token
pub struct SessionStore {
    credentials: Credentials,
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(credentials: Credentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Check credentials and open a session
    pub fn login(&self, username: &str, password: &str) -> Option<Session> {
        self.login_at(username, password, Utc::now())
    }

    pub fn login_at(&self, username: &str, password: &str, now: DateTime<Utc>) -> Option<Session> {
        if !self.credentials.matches(username, password) {
            tracing::warn!("rejected login for '{}'", username);
            return None;
        }
        let session = Session {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expires_at: now + self.ttl,
        };
        let mut sessions = self.lock();
        sessions.retain(|_, s| !s.is_expired_at(now));
        sessions.insert(session.token.clone(), session.clone());
        tracing::info!("session opened for '{}'", username);
        Some(session)
    }

    /// Resolve a token to its live session, evicting it if expired
    pub fn authenticate(&self, token: &str) -> Option<Session> {
        self.authenticate_at(token, Utc::now())
    }

    pub fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.lock();
        let expired = sessions.get(token)?.is_expired_at(now);
        if expired {
            if let Some(session) = sessions.remove(token) {
                tracing::debug!("session for '{}' expired", session.username);
            }
            return None;
        }
        sessions.get(token).cloned()
    }

    /// Close a session. Returns whether it existed.
    pub fn logout(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
