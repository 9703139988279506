use serde::{Deserialize, Serialize};

use complaintdesk_core::UserId;

use crate::{PermissionSet, RoleCode};

/// The authenticated user as known to the console.
///
/// Built once when a session's permission fetch completes and read-only
/// afterwards; a new login produces a new principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role_code: RoleCode,
    pub permissions: PermissionSet,
}

impl Principal {
    pub fn new(id: UserId, role_code: RoleCode, permissions: PermissionSet) -> Self {
        Self {
            id,
            role_code,
            permissions,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role_code.is_super_admin()
    }
}
