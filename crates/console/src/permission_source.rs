//! Where a session's permission set comes from.
//!
//! Permissions are fetched once, right after login, and trusted until the
//! session ends. The backend still enforces every permission on its own.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use complaintdesk_auth::{JwtClaims, Permission, PermissionSet, catalog};
use complaintdesk_core::DomainError;

use crate::config::{ConfigError, ConsoleConfig};

#[derive(Debug, Error)]
pub enum PermissionSourceError {
    #[error("permission backend unreachable: {0}")]
    Transport(String),

    #[error("permission backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("permission backend sent an invalid token: {0}")]
    InvalidToken(#[from] DomainError),
}

/// A malformed `{ role: [tokens] }` table.
#[derive(Debug, Error)]
pub enum RoleTableError {
    #[error("not a role table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("role '{role}': {source}")]
    InvalidToken {
        role: String,
        #[source]
        source: DomainError,
    },
}

#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Permission set for the subject of `claims`, authenticated by `bearer`.
    async fn fetch(&self, claims: &JwtClaims, bearer: &str) -> Result<PermissionSet, PermissionSourceError>;
}

/// Pick the source described by the configuration.
pub fn from_config(config: &ConsoleConfig) -> Result<Arc<dyn PermissionSource>, ConfigError> {
    if let Some(url) = &config.backend_url {
        tracing::info!(backend = %url, "permissions fetched from backend");
        return Ok(Arc::new(HttpPermissionSource::new(url.clone())));
    }
    let source = match &config.role_permissions_path {
        Some(path) => StaticPermissionSource::from_file(path)?,
        None => StaticPermissionSource::with_defaults(),
    };
    tracing::info!(roles = source.roles.len(), "permissions served from static role table");
    Ok(Arc::new(source))
}

// ─────────────────────────────────────────────────────────────────────────────
// Static role table
// ─────────────────────────────────────────────────────────────────────────────

/// Role code → permission tokens, held in memory.
///
/// Unknown roles get an empty set. `super_admin` needs no entry: the gates
/// bypass the check for it.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionSource {
    roles: HashMap<String, PermissionSet>,
}

impl StaticPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role<I, P>(mut self, role: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.roles
            .insert(role.into(), tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Built-in table for development setups without a backend.
    pub fn with_defaults() -> Self {
        use catalog::*;

        Self::new()
            .with_role("viewer", [COMPLAINT_VIEW, MESSAGE_VIEW])
            .with_role(
                "engineer",
                [
                    COMPLAINT_VIEW,
                    COMPLAINT_UPDATE,
                    MESSAGE_VIEW,
                    MESSAGE_CREATE,
                    ATTACHMENT_VIEW,
                    ATTACHMENT_UPLOAD,
                ],
            )
            .with_role(
                "division_head",
                [
                    COMPLAINT_VIEW,
                    COMPLAINT_CREATE,
                    COMPLAINT_UPDATE,
                    COMPLAINT_ASSIGN_PROCESS,
                    MESSAGE_VIEW,
                    MESSAGE_CREATE,
                    DIVISION_VIEW,
                    PERSON_VIEW,
                    CATEGORY_VIEW,
                    ATTACHMENT_VIEW,
                    ATTACHMENT_UPLOAD,
                ],
            )
            .with_role("admin", catalog::ALL.iter().copied())
    }

    /// Load a `{ "role": ["token", ...] }` JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::RolePermissionsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::RolePermissionsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, RoleTableError> {
        let table: HashMap<String, Vec<String>> = serde_json::from_str(raw)?;
        let mut roles = HashMap::with_capacity(table.len());
        for (role, tokens) in table {
            let set = match tokens
                .into_iter()
                .map(Permission::parse)
                .collect::<Result<PermissionSet, _>>()
            {
                Ok(set) => set,
                Err(source) => return Err(RoleTableError::InvalidToken { role, source }),
            };
            roles.insert(role, set);
        }
        Ok(Self { roles })
    }

    pub fn permissions_for(&self, role: &str) -> PermissionSet {
        self.roles.get(role).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PermissionSource for StaticPermissionSource {
    async fn fetch(&self, claims: &JwtClaims, _bearer: &str) -> Result<PermissionSet, PermissionSourceError> {
        if !self.roles.contains_key(claims.role.as_str()) && !claims.role.is_super_admin() {
            tracing::debug!(role = %claims.role, "role not in static table; no permissions");
        }
        Ok(self.permissions_for(claims.role.as_str()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend source
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PermissionListResponse {
    data: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    message: String,
}

/// Fetches `GET {base_url}/auth/permissions` with the session's bearer token.
///
/// Success body: `{ "data": ["token", ...] }`. Failure body: `{ "message": ... }`.
#[derive(Debug, Clone)]
pub struct HttpPermissionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPermissionSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PermissionSource for HttpPermissionSource {
    async fn fetch(&self, _claims: &JwtClaims, bearer: &str) -> Result<PermissionSet, PermissionSourceError> {
        let res = self
            .client
            .get(format!("{}/auth/permissions", self.base_url))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| PermissionSourceError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = match res.json::<BackendErrorResponse>().await {
                Ok(body) => body.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(PermissionSourceError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body: PermissionListResponse = res
            .json()
            .await
            .map_err(|e| PermissionSourceError::Transport(e.to_string()))?;

        Ok(body
            .data
            .into_iter()
            .map(Permission::parse)
            .collect::<Result<PermissionSet, _>>()?)
    }
}
