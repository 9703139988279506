use serde::{Deserialize, Serialize};

use crate::Permission;

/// A question asked of a principal's permission set.
///
/// Exactly one shape per query; combining shapes is done by the caller
/// choosing the right one, never by supplying several at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionQuery {
    /// The principal holds this token.
    Single(Permission),
    /// The principal holds at least one of these tokens. Empty never passes.
    Any(Vec<Permission>),
    /// The principal holds every one of these tokens. Empty always passes.
    All(Vec<Permission>),
}

impl PermissionQuery {
    pub fn single(token: impl Into<Permission>) -> Self {
        Self::Single(token.into())
    }

    pub fn any<I, P>(tokens: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::Any(tokens.into_iter().map(Into::into).collect())
    }

    pub fn all<I, P>(tokens: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::All(tokens.into_iter().map(Into::into).collect())
    }

    /// Tokens mentioned by the query.
    pub fn tokens(&self) -> &[Permission] {
        match self {
            Self::Single(p) => core::slice::from_ref(p),
            Self::Any(ps) | Self::All(ps) => ps,
        }
    }
}

impl core::fmt::Display for PermissionQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let join = |ps: &[Permission]| {
            ps.iter()
                .map(Permission::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Single(p) => write!(f, "{p}"),
            Self::Any(ps) => write!(f, "any[{}]", join(ps)),
            Self::All(ps) => write!(f, "all[{}]", join(ps)),
        }
    }
}

/// What a gate demands before it renders its content.
///
/// `Ungated` is the explicit "any signed-in principal" case; there is no
/// implicit fall-through from an empty query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Ungated,
    Query(PermissionQuery),
}

impl Requirement {
    pub fn query(&self) -> Option<&PermissionQuery> {
        match self {
            Self::Ungated => None,
            Self::Query(q) => Some(q),
        }
    }
}

impl From<PermissionQuery> for Requirement {
    fn from(value: PermissionQuery) -> Self {
        Self::Query(value)
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ungated => f.write_str("ungated"),
            Self::Query(q) => core::fmt::Display::fmt(q, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_shape() {
        assert_eq!(PermissionQuery::single("a.b").to_string(), "a.b");
        assert_eq!(PermissionQuery::any(["a", "b"]).to_string(), "any[a, b]");
        assert_eq!(PermissionQuery::all(["a"]).to_string(), "all[a]");
        assert_eq!(Requirement::Ungated.to_string(), "ungated");
    }

    #[test]
    fn serde_uses_tagged_shape() {
        let q: Requirement =
            serde_json::from_str(r#"{"query":{"any":["complaint.view","message.view"]}}"#)
                .unwrap();
        assert_eq!(
            q,
            Requirement::Query(PermissionQuery::any(["complaint.view", "message.view"]))
        );

        let ungated: Requirement = serde_json::from_str(r#""ungated""#).unwrap();
        assert_eq!(ungated, Requirement::Ungated);
    }
}
