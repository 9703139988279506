use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use complaintdesk_auth::{Principal, SessionSnapshot};
use complaintdesk_core::UserId;

use crate::sessions::SessionId;
use crate::views::AdminView;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /session/explain`; exactly one of the two is set.
#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub permission: Option<String>,
    pub view: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    SignedOut,
    Loading,
    Active,
}

impl SessionStatus {
    pub fn of(snapshot: &SessionSnapshot) -> Self {
        if snapshot.loading {
            Self::Loading
        } else if snapshot.token_valid && snapshot.principal.is_some() {
            Self::Active
        } else {
            Self::SignedOut
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrincipalView {
    pub id: UserId,
    pub role_code: String,
    pub permissions: Vec<String>,
    pub super_admin: bool,
}

impl From<&Principal> for PrincipalView {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            role_code: p.role_code.as_str().to_string(),
            permissions: p.permissions.sorted().into_iter().map(str::to_string).collect(),
            super_admin: p.is_super_admin(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub state: SessionStatus,
    pub principal: Option<PrincipalView>,
}

#[derive(Debug, Serialize)]
pub struct NavEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub path: String,
}

impl From<AdminView> for NavEntry {
    fn from(view: AdminView) -> Self {
        Self {
            slug: view.slug(),
            title: view.title(),
            path: view.path(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavResponse {
    pub state: SessionStatus,
    pub entries: Vec<NavEntry>,
}
