//! Console sessions keyed by an opaque session id.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use complaintdesk_auth::{JwtClaims, SessionReader, SessionState, SessionWriter, session};

/// Opaque handle stored in the session cookie.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

struct Entry {
    writer: Arc<SessionWriter>,
    reader: SessionReader,
}

/// All live sessions of this console process.
///
/// Each session has one writer (the login flow that fetches permissions) and
/// hands out readers to request handlers.
pub struct SessionRegistry {
    inner: Mutex<HashMap<SessionId, Entry>>,
    load_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(load_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            load_timeout,
        }
    }

    /// Open a loading session for validated claims.
    pub fn open(&self, claims: &JwtClaims, now: DateTime<Utc>) -> (SessionId, Arc<SessionWriter>) {
        let (writer, reader) = session(self.load_timeout);
        writer.begin(claims, now);
        let writer = Arc::new(writer);

        let id = SessionId::new();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Self::prune(&mut inner, now);
        inner.insert(
            id,
            Entry {
                writer: writer.clone(),
                reader,
            },
        );
        (id, writer)
    }

    pub fn reader(&self, id: SessionId) -> Option<SessionReader> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|e| e.reader.clone())
    }

    /// Log out and forget the session. Returns `false` for unknown ids.
    pub fn close(&self, id: SessionId) -> bool {
        let entry = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match entry {
            Some(entry) => {
                entry.writer.logout();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions that can no longer become usable.
    fn prune(inner: &mut HashMap<SessionId, Entry>, now: DateTime<Utc>) {
        inner.retain(|_, e| match e.reader.state() {
            SessionState::SignedOut => false,
            SessionState::Loading { expires_at, .. } | SessionState::Active { expires_at, .. } => {
                now < expires_at
            }
        });
    }
}
