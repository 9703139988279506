//! Permission predicate.
//!
//! - No IO
//! - No panics
//! - An absent principal holds nothing; `super_admin` holds everything

use serde::Serialize;

use complaintdesk_core::UserId;

use crate::{Permission, PermissionQuery, Principal, Requirement};

/// Does the principal hold `token`?
pub fn has_permission(principal: Option<&Principal>, token: &Permission) -> bool {
    match principal {
        None => false,
        Some(p) => p.is_super_admin() || p.permissions.contains(token.as_str()),
    }
}

/// Does the principal hold at least one of `tokens`?
///
/// An empty list is never satisfied by a regular principal, so a missing
/// configuration entry cannot turn into a universal grant.
pub fn has_any_permission(principal: Option<&Principal>, tokens: &[Permission]) -> bool {
    match principal {
        None => false,
        Some(p) => {
            p.is_super_admin() || tokens.iter().any(|t| p.permissions.contains(t.as_str()))
        }
    }
}

/// Does the principal hold every one of `tokens`? Vacuously true for `[]`.
pub fn has_all_permissions(principal: Option<&Principal>, tokens: &[Permission]) -> bool {
    match principal {
        None => false,
        Some(p) => {
            p.is_super_admin() || tokens.iter().all(|t| p.permissions.contains(t.as_str()))
        }
    }
}

/// Evaluate a single query against a present principal.
pub fn satisfies(principal: &Principal, query: &PermissionQuery) -> bool {
    let principal = Some(principal);
    match query {
        PermissionQuery::Single(token) => has_permission(principal, token),
        PermissionQuery::Any(tokens) => has_any_permission(principal, tokens),
        PermissionQuery::All(tokens) => has_all_permissions(principal, tokens),
    }
}

/// Evaluate a gate requirement. `Ungated` still needs a principal.
pub fn evaluate(principal: Option<&Principal>, requirement: &Requirement) -> bool {
    let Some(principal) = principal else {
        return false;
    };
    if principal.is_super_admin() {
        return true;
    }
    match requirement {
        Requirement::Ungated => true,
        Requirement::Query(query) => satisfies(principal, query),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Why a gate would render its content or its fallback.
///
/// Debugging aid for "why can't I see this screen?" questions; gates never
/// need it to decide.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub requirement: Requirement,
    pub granted: bool,
    pub reason: String,
    pub principal: Option<PrincipalState>,
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub id: UserId,
    pub role_code: String,
    pub permissions: Vec<String>,
    pub super_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    /// Tokens the principal would need; for `any` queries, any one of them.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoPrincipal,
    MissingPermission,
    EmptyAnyQuery,
}

/// Explain the decision [`evaluate`] makes for `principal` and `requirement`.
pub fn explain(principal: Option<&Principal>, requirement: &Requirement) -> AuthorizationExplanation {
    let granted = evaluate(principal, requirement);

    let Some(p) = principal else {
        return AuthorizationExplanation {
            requirement: requirement.clone(),
            granted,
            reason: "No signed-in principal".to_string(),
            principal: None,
            denial_reason: Some(DenialReason {
                kind: DenialKind::NoPrincipal,
                message: "Sign in to evaluate permissions".to_string(),
                missing: Vec::new(),
            }),
        };
    };

    let state = PrincipalState {
        id: p.id,
        role_code: p.role_code.as_str().to_string(),
        permissions: p.permissions.sorted().into_iter().map(str::to_string).collect(),
        super_admin: p.is_super_admin(),
    };

    if granted {
        let reason = if p.is_super_admin() {
            format!("Role '{}' bypasses every permission check", p.role_code)
        } else {
            match requirement {
                Requirement::Ungated => "Content is open to every signed-in principal".to_string(),
                Requirement::Query(q) => format!("Principal satisfies '{q}'"),
            }
        };
        return AuthorizationExplanation {
            requirement: requirement.clone(),
            granted,
            reason,
            principal: Some(state),
            denial_reason: None,
        };
    }

    // Only a failing query gets here: ungated and super_admin always pass.
    let query = requirement.query();
    let missing: Vec<String> = query
        .map(PermissionQuery::tokens)
        .unwrap_or_default()
        .iter()
        .filter(|t| !p.permissions.contains(t.as_str()))
        .map(|t| t.as_str().to_string())
        .collect();

    let denial_reason = match query {
        Some(PermissionQuery::Any(tokens)) if tokens.is_empty() => DenialReason {
            kind: DenialKind::EmptyAnyQuery,
            message: "An 'any' query with no tokens never passes".to_string(),
            missing,
        },
        _ => DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing permission(s): {}", missing.join(", ")),
            missing,
        },
    };

    AuthorizationExplanation {
        requirement: requirement.clone(),
        granted,
        reason: format!("Principal with role '{}' does not satisfy '{requirement}'", p.role_code),
        principal: Some(state),
        denial_reason: Some(denial_reason),
    }
}
