use axum::{Json, extract::Extension};
use chrono::Utc;

use complaintdesk_auth::Can;

use crate::app::dto::{NavEntry, NavResponse, SessionStatus};
use crate::context::SessionContext;
use crate::views::AdminView;

/// GET /nav - the views the current principal may open, in menu order.
///
/// Without a principal (signed out, still loading) the list is empty.
pub async fn nav(Extension(ctx): Extension<SessionContext>) -> Json<NavResponse> {
    let snapshot = ctx.snapshot(Utc::now());
    let principal = snapshot.principal();

    let entries = AdminView::ALL
        .into_iter()
        .filter_map(|view| {
            let requirement = view.requirement();
            Can::new(&requirement).render(principal, || NavEntry::from(view))
        })
        .collect();

    Json(NavResponse {
        state: SessionStatus::of(&snapshot),
        entries,
    })
}
