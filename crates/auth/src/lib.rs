//! `complaintdesk-auth`: permission gating for the complaint-desk console.
//!
//! Pure predicate over a principal's permission set, plus the two render
//! gates built on it (inline [`Can`] and [`ProtectedRoute`]) and the session
//! cell they read from. Decoupled from HTTP and storage.

pub mod authorize;
pub mod catalog;
pub mod claims;
pub mod gate;
pub mod permissions;
pub mod principal;
pub mod query;
pub mod roles;
pub mod route_guard;
pub mod session;

pub use authorize::{
    AuthorizationExplanation, DenialKind, evaluate, explain, has_all_permissions,
    has_any_permission, has_permission, satisfies,
};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtError, JwtValidator, TokenValidationError, validate_claims};
pub use gate::{Can, GateOutcome, can};
pub use permissions::{Permission, PermissionSet};
pub use principal::Principal;
pub use query::{PermissionQuery, Requirement};
pub use roles::RoleCode;
pub use route_guard::{DenialView, ProtectedRoute, RouteDecision, RouteState, SessionSnapshot, route_state};
pub use session::{SessionProvider, SessionReader, SessionState, SessionWriter, session};
