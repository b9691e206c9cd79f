use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::accommodations::UserId;

/// Authenticated session handed back after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-memory bearer-token sessions with a fixed time-to-live.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: UserId) -> Session {
        self.issue_at(user_id, Utc::now())
    }

    pub(crate) fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Session {
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.guard();
        sessions.retain(|_, existing| !existing.is_expired_at(now));
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Resolve a live session to its user. Expired sessions are evicted on sight.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.resolve_at(token, Utc::now())
    }

    pub(crate) fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<UserId> {
        let mut sessions = self.guard();
        let (user_id, expired) = sessions
            .get(token)
            .map(|session| (session.user_id, session.is_expired_at(now)))?;
        if expired {
            sessions.remove(token);
            return None;
        }
        Some(user_id)
    }

    /// Drop a session, returning whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.guard().remove(token).is_some()
    }

    pub fn active_sessions(&self) -> usize {
        self.guard().len()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header. The scheme is matched
/// case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}
