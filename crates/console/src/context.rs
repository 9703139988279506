use chrono::{DateTime, Utc};

use complaintdesk_auth::{SessionProvider, SessionReader, SessionSnapshot};

use crate::sessions::SessionId;

/// Session context for a request.
///
/// Always present on console routes; a request without a (known) session
/// cookie carries an empty context and reads as signed out.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session_id: Option<SessionId>,
    reader: Option<SessionReader>,
}

impl SessionContext {
    pub fn new(session_id: SessionId, reader: SessionReader) -> Self {
        Self {
            session_id: Some(session_id),
            reader: Some(reader),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Take the per-request snapshot the gates render from.
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        match &self.reader {
            Some(reader) => reader.snapshot(now),
            None => SessionSnapshot::signed_out(),
        }
    }
}
