use std::sync::Arc;

use chrono::{DateTime, Utc};

use complaintdesk_auth::{JwtClaims, JwtValidator};

use crate::config::ConsoleConfig;
use crate::permission_source::PermissionSource;
use crate::sessions::{SessionId, SessionRegistry};

/// Shared state for all console handlers.
pub struct ConsoleServices {
    pub sessions: Arc<SessionRegistry>,
    pub jwt: Arc<dyn JwtValidator>,
    pub source: Arc<dyn PermissionSource>,
    pub config: Arc<ConsoleConfig>,
}

impl ConsoleServices {
    /// Open a loading session and fetch its permissions in the background.
    ///
    /// The fetch is bounded by the configured load timeout; on failure or
    /// timeout the session falls back to signed out.
    pub fn start_session(&self, claims: JwtClaims, bearer: String, now: DateTime<Utc>) -> SessionId {
        let (id, writer) = self.sessions.open(&claims, now);
        tracing::info!(session = %id, user = %claims.sub, role = %claims.role, "session loading");

        let source = self.source.clone();
        let timeout = self.config.session_load_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, source.fetch(&claims, &bearer)).await {
                Ok(Ok(permissions)) => {
                    let count = permissions.len();
                    match writer.establish(permissions) {
                        Some(_) => {
                            tracing::info!(session = %id, permissions = count, "session active")
                        }
                        None => tracing::debug!(
                            session = %id,
                            "session closed before permissions arrived; result dropped"
                        ),
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(session = %id, error = %e, "permission fetch failed");
                    writer.fail();
                }
                Err(_) => {
                    tracing::warn!(session = %id, ?timeout, "permission fetch timed out");
                    writer.fail();
                }
            }
        });

        id
    }
}
