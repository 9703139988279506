//! Route gate ("ProtectedRoute").
//!
//! Guards a whole view: loading placeholder while the session resolves,
//! redirect to login without a principal, denial view when the requirement
//! fails, the view otherwise.
//!
//! This only shapes what the console shows. The backend must re-check every
//! permission on every request; a route gate is not a security boundary.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::{Principal, Requirement, authorize::evaluate};

/// What the session collaborator reports for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub token_valid: bool,
    pub principal: Option<Arc<Principal>>,
}

impl SessionSnapshot {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn active(principal: Arc<Principal>) -> Self {
        Self {
            loading: false,
            token_valid: true,
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_deref()
    }
}

/// Route gate state for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteState {
    Loading,
    Unauthenticated,
    Denied,
    Authorized,
}

pub fn route_state(snapshot: &SessionSnapshot, requirement: &Requirement) -> RouteState {
    if snapshot.loading {
        return RouteState::Loading;
    }
    let principal = match snapshot.principal() {
        Some(p) if snapshot.token_valid => p,
        _ => return RouteState::Unauthenticated,
    };
    if evaluate(Some(principal), requirement) {
        RouteState::Authorized
    } else {
        RouteState::Denied
    }
}

/// Shown instead of a view the principal may not open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialView {
    pub title: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl Default for DenialView {
    fn default() -> Self {
        Self {
            title: Cow::Borrowed("Access denied"),
            message: Cow::Borrowed("You do not have permission to view this page."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision<T> {
    Loading,
    Redirect { to: String },
    Denied(DenialView),
    Render(T),
}

#[derive(Debug, Clone)]
pub struct ProtectedRoute<'a> {
    requirement: &'a Requirement,
    login_path: &'a str,
    denial: DenialView,
}

impl<'a> ProtectedRoute<'a> {
    pub fn new(requirement: &'a Requirement, login_path: &'a str) -> Self {
        Self {
            requirement,
            login_path,
            denial: DenialView::default(),
        }
    }

    pub fn with_denial_view(mut self, denial: DenialView) -> Self {
        self.denial = denial;
        self
    }

    pub fn resolve<T>(
        &self,
        snapshot: &SessionSnapshot,
        children: impl FnOnce(&Principal) -> T,
    ) -> RouteDecision<T> {
        match route_state(snapshot, self.requirement) {
            RouteState::Loading => RouteDecision::Loading,
            RouteState::Unauthenticated => RouteDecision::Redirect {
                to: self.login_path.to_string(),
            },
            RouteState::Denied => RouteDecision::Denied(self.denial.clone()),
            RouteState::Authorized => match snapshot.principal() {
                Some(p) => RouteDecision::Render(children(p)),
                None => RouteDecision::Redirect {
                    to: self.login_path.to_string(),
                },
            },
        }
    }
}
