//! Server-rendered HTML for the console shell.
//!
//! Templates live under `templates/` and are compiled by askama; every
//! interpolated value is HTML-escaped.

use askama::Template;

use complaintdesk_auth::{Can, DenialView, Principal};

use crate::views::AdminView;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub login_path: &'a str,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingPage {
    pub slug: &'static str,
    pub title: &'static str,
}

#[derive(Template)]
#[template(path = "denied.html")]
pub struct DeniedPage<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

pub struct NavLink {
    pub path: String,
    pub title: &'static str,
}

/// The guarded view. Sidebar links and action buttons were already filtered
/// through inline gates when the page was built.
#[derive(Template)]
#[template(path = "view_shell.html")]
pub struct ViewShell {
    pub slug: &'static str,
    pub title: &'static str,
    pub nav: Vec<NavLink>,
    pub actions: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage;

pub fn login(login_path: &str) -> LoginPage<'_> {
    LoginPage { login_path }
}

pub fn loading(view: AdminView) -> LoadingPage {
    LoadingPage {
        slug: view.slug(),
        title: view.title(),
    }
}

pub fn denied(denial: &DenialView) -> DeniedPage<'_> {
    DeniedPage {
        title: &denial.title,
        message: &denial.message,
    }
}

pub fn view_shell(view: AdminView, principal: &Principal) -> ViewShell {
    let nav = AdminView::ALL
        .into_iter()
        .filter_map(|v| {
            let requirement = v.requirement();
            Can::new(&requirement).render(Some(principal), || NavLink {
                path: v.path(),
                title: v.title(),
            })
        })
        .collect();

    let actions = view
        .actions()
        .into_iter()
        .filter_map(|action| Can::new(&action.requirement).render(Some(principal), || action.label))
        .collect();

    ViewShell {
        slug: view.slug(),
        title: view.title(),
        nav,
        actions,
    }
}

pub fn not_found() -> NotFoundPage {
    NotFoundPage
}
