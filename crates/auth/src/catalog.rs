//! Permission tokens used by the console views.
//!
//! Use these constants instead of string literals so a renamed token is a
//! compile error rather than a silently hidden screen.

// Complaints
pub const COMPLAINT_VIEW: &str = "complaint.view";
pub const COMPLAINT_CREATE: &str = "complaint.create";
pub const COMPLAINT_UPDATE: &str = "complaint.update";
pub const COMPLAINT_DELETE: &str = "complaint.delete";
pub const COMPLAINT_ASSIGN_PROCESS: &str = "complaint.assign.process";

// Messages
pub const MESSAGE_VIEW: &str = "message.view";
pub const MESSAGE_CREATE: &str = "message.create";

// Organisation
pub const DIVISION_VIEW: &str = "division.view";
pub const DIVISION_MANAGE: &str = "division.manage";
pub const PERSON_VIEW: &str = "person.view";
pub const PERSON_MANAGE: &str = "person.manage";

// Access control
pub const ROLE_VIEW: &str = "role.view";
pub const ROLE_MANAGE: &str = "role.manage";
pub const PERMISSION_VIEW: &str = "permission.view";
pub const PERMISSION_MANAGE: &str = "permission.manage";

// Reference data
pub const CATEGORY_VIEW: &str = "category.view";
pub const CATEGORY_MANAGE: &str = "category.manage";

// Attachments
pub const ATTACHMENT_VIEW: &str = "attachment.view";
pub const ATTACHMENT_UPLOAD: &str = "attachment.upload";
pub const ATTACHMENT_DELETE: &str = "attachment.delete";

/// Every token above, in declaration order.
pub const ALL: &[&str] = &[
    COMPLAINT_VIEW,
    COMPLAINT_CREATE,
    COMPLAINT_UPDATE,
    COMPLAINT_DELETE,
    COMPLAINT_ASSIGN_PROCESS,
    MESSAGE_VIEW,
    MESSAGE_CREATE,
    DIVISION_VIEW,
    DIVISION_MANAGE,
    PERSON_VIEW,
    PERSON_MANAGE,
    ROLE_VIEW,
    ROLE_MANAGE,
    PERMISSION_VIEW,
    PERMISSION_MANAGE,
    CATEGORY_VIEW,
    CATEGORY_MANAGE,
    ATTACHMENT_VIEW,
    ATTACHMENT_UPLOAD,
    ATTACHMENT_DELETE,
];
