//! The console's navigable views and what each one requires.

use std::borrow::Cow;

use complaintdesk_auth::{DenialView, PermissionQuery, Requirement, catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminView {
    Dashboard,
    Complaints,
    Assignments,
    Messages,
    Divisions,
    Persons,
    Roles,
    Permissions,
    Categories,
    Attachments,
}

impl AdminView {
    /// Navigation order.
    pub const ALL: [AdminView; 10] = [
        AdminView::Dashboard,
        AdminView::Complaints,
        AdminView::Assignments,
        AdminView::Messages,
        AdminView::Divisions,
        AdminView::Persons,
        AdminView::Roles,
        AdminView::Permissions,
        AdminView::Categories,
        AdminView::Attachments,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Complaints => "complaints",
            Self::Assignments => "assignments",
            Self::Messages => "messages",
            Self::Divisions => "divisions",
            Self::Persons => "persons",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Categories => "categories",
            Self::Attachments => "attachments",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Complaints => "Complaints",
            Self::Assignments => "Assignments",
            Self::Messages => "Messages",
            Self::Divisions => "Divisions",
            Self::Persons => "Persons",
            Self::Roles => "Roles",
            Self::Permissions => "Permissions",
            Self::Categories => "Categories",
            Self::Attachments => "Attachments",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.slug() == slug)
    }

    pub fn path(self) -> String {
        format!("/views/{}", self.slug())
    }

    pub fn requirement(self) -> Requirement {
        use catalog::*;

        let query = match self {
            Self::Dashboard => return Requirement::Ungated,
            Self::Complaints => PermissionQuery::single(COMPLAINT_VIEW),
            Self::Assignments => PermissionQuery::single(COMPLAINT_ASSIGN_PROCESS),
            Self::Messages => PermissionQuery::single(MESSAGE_VIEW),
            Self::Divisions => PermissionQuery::single(DIVISION_VIEW),
            Self::Persons => PermissionQuery::single(PERSON_VIEW),
            Self::Roles => PermissionQuery::single(ROLE_VIEW),
            Self::Permissions => PermissionQuery::all([PERMISSION_VIEW, ROLE_VIEW]),
            Self::Categories => PermissionQuery::single(CATEGORY_VIEW),
            Self::Attachments => PermissionQuery::any([ATTACHMENT_VIEW, COMPLAINT_VIEW]),
        };
        Requirement::Query(query)
    }

    pub fn denial_view(self) -> DenialView {
        DenialView {
            title: Cow::Owned(format!("{}: access denied", self.title())),
            message: Cow::Borrowed(
                "Your role does not grant access to this page. Ask an administrator if you need it.",
            ),
        }
    }
}

/// A control inside a view, shown only to principals that may use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAction {
    pub label: &'static str,
    pub requirement: Requirement,
}

impl ViewAction {
    fn new(label: &'static str, token: &'static str) -> Self {
        Self {
            label,
            requirement: PermissionQuery::single(token).into(),
        }
    }
}

impl AdminView {
    pub fn actions(self) -> Vec<ViewAction> {
        use catalog::*;

        match self {
            Self::Dashboard => Vec::new(),
            Self::Complaints => vec![
                ViewAction::new("New complaint", COMPLAINT_CREATE),
                ViewAction::new("Edit", COMPLAINT_UPDATE),
                ViewAction::new("Assign", COMPLAINT_ASSIGN_PROCESS),
                ViewAction::new("Delete", COMPLAINT_DELETE),
            ],
            Self::Assignments => vec![ViewAction::new("Process", COMPLAINT_ASSIGN_PROCESS)],
            Self::Messages => vec![ViewAction::new("Compose", MESSAGE_CREATE)],
            Self::Divisions => vec![ViewAction::new("Manage divisions", DIVISION_MANAGE)],
            Self::Persons => vec![ViewAction::new("Manage persons", PERSON_MANAGE)],
            Self::Roles => vec![ViewAction::new("Manage roles", ROLE_MANAGE)],
            Self::Permissions => vec![ViewAction::new("Manage permissions", PERMISSION_MANAGE)],
            Self::Categories => vec![ViewAction::new("Manage categories", CATEGORY_MANAGE)],
            Self::Attachments => vec![
                ViewAction::new("Upload", ATTACHMENT_UPLOAD),
                ViewAction::new("Delete", ATTACHMENT_DELETE),
            ],
        }
    }
}
