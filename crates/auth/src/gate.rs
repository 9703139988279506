//! Inline gate ("Can").
//!
//! Renders a piece of content only when the principal satisfies a requirement,
//! otherwise the fallback (nothing by default). Purely a render-time choice.

use crate::{Principal, Requirement, authorize::evaluate};

/// Which branch an inline gate renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Children,
    Fallback,
}

impl GateOutcome {
    pub fn is_children(self) -> bool {
        matches!(self, Self::Children)
    }

    pub fn render<T>(self, children: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
        match self {
            Self::Children => children(),
            Self::Fallback => fallback(),
        }
    }
}

/// Decide an inline gate.
///
/// Absent principal renders the fallback whatever the requirement; a
/// `super_admin` renders the children whatever the requirement.
pub fn can(principal: Option<&Principal>, requirement: &Requirement) -> GateOutcome {
    if evaluate(principal, requirement) {
        GateOutcome::Children
    } else {
        GateOutcome::Fallback
    }
}

/// Inline gate with an optional fallback.
///
/// ```
/// use complaintdesk_auth::{Can, PermissionQuery, Requirement};
///
/// let req = Requirement::from(PermissionQuery::single("complaint.assign.process"));
/// let button = Can::new(&req).render(None, || "Assign");
/// assert_eq!(button, None);
/// ```
#[derive(Debug)]
pub struct Can<'a, T> {
    requirement: &'a Requirement,
    fallback: Option<T>,
}

impl<'a, T> Can<'a, T> {
    pub fn new(requirement: &'a Requirement) -> Self {
        Self {
            requirement,
            fallback: None,
        }
    }

    pub fn fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Children are built lazily, only when the gate passes.
    pub fn render(self, principal: Option<&Principal>, children: impl FnOnce() -> T) -> Option<T> {
        match can(principal, self.requirement) {
            GateOutcome::Children => Some(children()),
            GateOutcome::Fallback => self.fallback,
        }
    }
}
