use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role code carried by a session (e.g. "engineer", "division_head").
///
/// Role codes are opaque at this layer: mapping a role to its permission
/// tokens is the permission source's job. The one code the gates interpret is
/// [`RoleCode::SUPER_ADMIN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCode(Cow<'static, str>);

impl RoleCode {
    /// Bypass role: satisfies every permission query unconditionally.
    pub const SUPER_ADMIN: &'static str = "super_admin";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn super_admin() -> Self {
        Self::new(Self::SUPER_ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_super_admin(&self) -> bool {
        self.as_str() == Self::SUPER_ADMIN
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
