use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use complaintdesk_auth::{JwtClaims, PermissionSet, RoleCode, catalog};
use complaintdesk_console::{
    app::build_app,
    config::ConsoleConfig,
    permission_source::{PermissionSource, PermissionSourceError, StaticPermissionSource},
};
use complaintdesk_core::UserId;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{StatusCode, header};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(source: Arc<dyn PermissionSource>, load_timeout: Duration) -> Self {
        let config = ConsoleConfig {
            jwt_secret: JWT_SECRET.to_string(),
            session_load_timeout: load_timeout,
            ..ConsoleConfig::default()
        };
        let app = build_app(config, source);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are asserted on, not followed.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    async fn with_defaults() -> Self {
        Self::spawn(
            Arc::new(StaticPermissionSource::with_defaults()),
            Duration::from_secs(5),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, session: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(cookie) = session {
            req = req.header(header::COOKIE, cookie);
        }
        req.send().await.unwrap()
    }

    /// POST /session and return the cookie to replay on later requests.
    async fn login(&self, token: &str) -> String {
        self.login_with_cookie(token, None).await
    }

    async fn login_with_cookie(&self, token: &str, cookie: Option<&str>) -> String {
        let mut req = self.client.post(self.url("/session")).bearer_auth(token);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap()
            .to_string();
        let body: serde_json::Value = res.json().await.unwrap();
        assert!(body["session_id"].is_string());

        set_cookie.split(';').next().unwrap().to_string()
    }

    /// Poll GET /session until it leaves the loading state.
    async fn settled_state(&self, cookie: &str) -> serde_json::Value {
        for _ in 0..100 {
            let body: serde_json::Value = self.get("/session", Some(cookie)).await.json().await.unwrap();
            if body["state"] != "loading" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session did not settle within timeout");
    }

    async fn active_session(&self, role: &'static str) -> String {
        let cookie = self.login(&mint_jwt(role)).await;
        let state = self.settled_state(&cookie).await;
        assert_eq!(state["state"], "active", "{state}");
        cookie
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(role: &'static str) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: UserId::new(),
        role: RoleCode::new(role),
        issued_at: now - ChronoDuration::seconds(1),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// A permission backend that never answers.
struct PendingSource;

#[async_trait]
impl PermissionSource for PendingSource {
    async fn fetch(&self, _claims: &JwtClaims, _bearer: &str) -> Result<PermissionSet, PermissionSourceError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::with_defaults().await;
    let res = srv.get("/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn views_redirect_to_login_without_session() {
    let srv = TestServer::with_defaults().await;

    for slug in ["dashboard", "complaints", "roles"] {
        let res = srv.get(&format!("/views/{slug}"), None).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{slug}");
        assert_eq!(res.headers()[header::LOCATION], "/login");
    }

    let login = srv.get("/login", None).await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_session_cookie_reads_as_signed_out() {
    let srv = TestServer::with_defaults().await;
    let cookie = format!("complaintdesk_session={}", uuid::Uuid::now_v7());

    let body: serde_json::Value = srv.get("/session", Some(&cookie)).await.json().await.unwrap();
    assert_eq!(body["state"], "signed_out");
    assert!(body["principal"].is_null());

    let res = srv.get("/views/complaints", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
    let srv = TestServer::with_defaults().await;

    let res = srv.client.post(srv.url("/session")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/session"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn engineer_sees_complaints_but_not_assignments() {
    let srv = TestServer::with_defaults().await;
    let cookie = srv.active_session("engineer").await;

    let res = srv.get("/views/complaints", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("data-state=\"authorized\""));
    assert!(!html.contains("data-action=\"Assign\""));

    let res = srv.get("/views/assignments", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let html = res.text().await.unwrap();
    assert!(html.contains("Assignments: access denied"));

    let res = srv.get("/views/dashboard", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn nav_lists_only_permitted_views() {
    let srv = TestServer::with_defaults().await;
    let cookie = srv.active_session("engineer").await;

    let body: serde_json::Value = srv.get("/nav", Some(&cookie)).await.json().await.unwrap();
    assert_eq!(body["state"], "active");
    let slugs: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["dashboard", "complaints", "messages", "attachments"]);

    let anonymous: serde_json::Value = srv.get("/nav", None).await.json().await.unwrap();
    assert_eq!(anonymous["state"], "signed_out");
    assert!(anonymous["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn super_admin_opens_every_view_without_permissions() {
    let srv = TestServer::spawn(Arc::new(StaticPermissionSource::new()), Duration::from_secs(5)).await;
    let cookie = srv.active_session(RoleCode::SUPER_ADMIN).await;

    let session: serde_json::Value = srv.get("/session", Some(&cookie)).await.json().await.unwrap();
    assert_eq!(session["principal"]["super_admin"], true);
    assert!(session["principal"]["permissions"].as_array().unwrap().is_empty());

    for slug in [
        "dashboard",
        "complaints",
        "assignments",
        "messages",
        "divisions",
        "persons",
        "roles",
        "permissions",
        "categories",
        "attachments",
    ] {
        let res = srv.get(&format!("/views/{slug}"), Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::OK, "{slug}");
    }
}

#[tokio::test]
async fn loading_session_shows_placeholder_never_content_or_redirect() {
    let srv = TestServer::spawn(Arc::new(PendingSource), Duration::from_secs(30)).await;
    let cookie = srv.login(&mint_jwt("engineer")).await;

    let res = srv.get("/views/complaints", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert!(res.headers().get(header::LOCATION).is_none());
    let html = res.text().await.unwrap();
    assert!(html.contains("data-state=\"loading\""));

    let nav: serde_json::Value = srv.get("/nav", Some(&cookie)).await.json().await.unwrap();
    assert_eq!(nav["state"], "loading");
    assert!(nav["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stalled_permission_fetch_falls_back_to_login() {
    let srv = TestServer::spawn(Arc::new(PendingSource), Duration::from_millis(50)).await;
    let cookie = srv.login(&mint_jwt("engineer")).await;

    let state = srv.settled_state(&cookie).await;
    assert_eq!(state["state"], "signed_out");

    let res = srv.get("/views/dashboard", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let srv = TestServer::with_defaults().await;
    let cookie = srv.active_session("division_head").await;

    let res = srv.get("/views/assignments", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .delete(srv.url("/session"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.get("/views/assignments", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    // Idempotent.
    let res = srv
        .client
        .delete(srv.url("/session"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn login_closes_the_session_it_replaces() {
    let srv = TestServer::with_defaults().await;
    let token = mint_jwt("engineer");

    let first = srv.login(&token).await;
    assert_eq!(srv.settled_state(&first).await["state"], "active");

    let second = srv.login_with_cookie(&token, Some(&first)).await;
    assert_ne!(first, second);
    assert_eq!(srv.settled_state(&second).await["state"], "active");

    let res = srv.get("/views/complaints", Some(&first)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");

    let res = srv.get("/views/complaints", Some(&second)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_cookie_is_secure_by_default() {
    let srv = TestServer::with_defaults().await;
    let res = srv
        .client
        .post(srv.url("/session"))
        .bearer_auth(mint_jwt("viewer"))
        .send()
        .await
        .unwrap();
    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn login_page_renders_configured_path() {
    let srv = TestServer::with_defaults().await;
    let html = srv.get("/login", None).await.text().await.unwrap();
    assert!(html.contains("data-login-path=\"/login\""));
}

#[tokio::test]
async fn explain_reports_missing_permission() {
    let srv = TestServer::with_defaults().await;
    let cookie = srv.active_session("engineer").await;

    let body: serde_json::Value = srv
        .get(
            &format!("/session/explain?permission={}", catalog::COMPLAINT_ASSIGN_PROCESS),
            Some(&cookie),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["granted"], false);
    assert_eq!(body["denial_reason"]["kind"], "missing_permission");
    assert_eq!(body["denial_reason"]["missing"][0], catalog::COMPLAINT_ASSIGN_PROCESS);

    let body: serde_json::Value = srv
        .get("/session/explain?view=complaints", Some(&cookie))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["granted"], true);

    let res = srv.get("/session/explain", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_view_is_not_found() {
    let srv = TestServer::with_defaults().await;
    let cookie = srv.active_session("engineer").await;
    let res = srv.get("/views/reports", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
