//! Session state shared between the authentication flow and the gates.
//!
//! One [`SessionWriter`] (owned by whoever performs login and the permission
//! fetch) and any number of [`SessionReader`]s. Readers take a
//! [`SessionSnapshot`] per render pass and never hold on to it.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use complaintdesk_core::UserId;

use crate::{JwtClaims, PermissionSet, Principal, RoleCode, SessionSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    /// Token accepted, permission fetch in flight.
    Loading {
        subject: UserId,
        role: RoleCode,
        started_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
    Active {
        principal: Arc<Principal>,
        expires_at: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SignedOut => "signed_out",
            Self::Loading { .. } => "loading",
            Self::Active { .. } => "active",
        }
    }
}

type Cell = Arc<RwLock<SessionState>>;

/// Read access used by gates.
pub trait SessionProvider {
    fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot;

    fn current_principal(&self, now: DateTime<Utc>) -> Option<Arc<Principal>> {
        self.snapshot(now).principal
    }

    fn is_loading(&self, now: DateTime<Utc>) -> bool {
        self.snapshot(now).loading
    }
}

/// Create a signed-out session.
///
/// `load_timeout` bounds the loading state: once exceeded, readers report the
/// session as unauthenticated instead of loading.
pub fn session(load_timeout: Duration) -> (SessionWriter, SessionReader) {
    let cell: Cell = Arc::new(RwLock::new(SessionState::SignedOut));
    let reader = SessionReader {
        cell: cell.clone(),
        load_timeout,
    };
    (SessionWriter { cell }, reader)
}

/// The single writer of a session. Intentionally not `Clone`.
#[derive(Debug)]
pub struct SessionWriter {
    cell: Cell,
}

impl SessionWriter {
    /// Start loading for freshly validated claims, replacing any prior state.
    pub fn begin(&self, claims: &JwtClaims, now: DateTime<Utc>) {
        self.replace(SessionState::Loading {
            subject: claims.sub,
            role: claims.role.clone(),
            started_at: now,
            expires_at: claims.expires_at,
        });
    }

    /// Complete the permission fetch.
    ///
    /// Only a loading session becomes active; if the user logged out while the
    /// fetch was in flight, the result is dropped and `None` returned.
    pub fn establish(&self, permissions: PermissionSet) -> Option<Arc<Principal>> {
        let mut state = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        let (subject, role, expires_at) = match &*state {
            SessionState::Loading {
                subject,
                role,
                expires_at,
                ..
            } => (*subject, role.clone(), *expires_at),
            _ => return None,
        };
        let principal = Arc::new(Principal::new(subject, role, permissions));
        *state = SessionState::Active {
            principal: principal.clone(),
            expires_at,
        };
        Some(principal)
    }

    /// The permission fetch failed or timed out.
    pub fn fail(&self) {
        let mut state = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, SessionState::Loading { .. }) {
            *state = SessionState::SignedOut;
        }
    }

    pub fn logout(&self) {
        self.replace(SessionState::SignedOut);
    }

    pub fn state(&self) -> SessionState {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, next: SessionState) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

#[derive(Debug, Clone)]
pub struct SessionReader {
    cell: Cell,
    load_timeout: Duration,
}

impl SessionReader {
    pub fn state(&self) -> SessionState {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionProvider for SessionReader {
    fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        match self.state() {
            SessionState::SignedOut => SessionSnapshot::signed_out(),
            SessionState::Loading {
                started_at,
                expires_at,
                ..
            } => {
                if now >= expires_at || now - started_at >= self.load_timeout {
                    SessionSnapshot::signed_out()
                } else {
                    SessionSnapshot::loading()
                }
            }
            SessionState::Active {
                principal,
                expires_at,
            } => {
                if now >= expires_at {
                    SessionSnapshot::signed_out()
                } else {
                    SessionSnapshot::active(principal)
                }
            }
        }
    }
}
