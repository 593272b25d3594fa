use super::*;
use crate::config::PortalConfig;
use crate::services::portal::{Account, PortalAuth, PortalError};
use crate::state::AppState;
use crate::state::test_helpers::test_app_state;
use axum::body::{Body, to_bytes};
use axum::http::Request as HttpRequest;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const DEVICE_HOST: &str = "192.168.71.1";

// =========================================================================
// MockPortal
// =========================================================================

struct MockPortal {
    reject_with: Option<&'static str>,
    accounts: Mutex<Vec<(String, String)>>,
}

impl MockPortal {
    fn accepting() -> Arc<Self> {
        Arc::new(Self { reject_with: None, accounts: Mutex::new(Vec::new()) })
    }

    fn rejecting(reason: &'static str) -> Arc<Self> {
        Arc::new(Self { reject_with: Some(reason), accounts: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl PortalAuth for MockPortal {
    async fn login(&self, account: &Account) -> Result<(), PortalError> {
        self.accounts
            .lock()
            .unwrap()
            .push((account.username.clone(), account.password.clone()));
        match self.reject_with {
            None => Ok(()),
            Some(reason) => Err(PortalError::Rejected(reason.to_owned())),
        }
    }
}

fn login_request(host: &str, body: &str) -> HttpRequest<Body> {
    HttpRequest::post("/login")
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// POST /login
// =========================================================================

#[tokio::test]
async fn login_success_returns_empty_object() {
    let portal = MockPortal::accepting();
    let app = app(test_app_state(portal.clone()));

    let resp = app
        .oneshot(login_request(DEVICE_HOST, "username=2021211000&password=secret123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({}));
    assert_eq!(
        portal.accounts.lock().unwrap().as_slice(),
        &[("2021211000".to_owned(), "secret123".to_owned())]
    );
}

#[tokio::test]
async fn login_decodes_percent_encoded_fields() {
    let portal = MockPortal::accepting();
    let app = app(test_app_state(portal.clone()));

    app.oneshot(login_request(DEVICE_HOST, "username=2021211000&password=p%26ss%20w"))
        .await
        .unwrap();

    assert_eq!(portal.accounts.lock().unwrap()[0].1, "p&ss w");
}

#[tokio::test]
async fn login_failure_returns_code_and_message() {
    let portal = MockPortal::rejecting("密码错误");
    let app = app(test_app_state(portal));

    let resp = app
        .oneshot(login_request(DEVICE_HOST, "username=2021211000&password=wrong"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({"code": 1, "message": "BUPT-portal authentication failed: 密码错误"})
    );
}

#[tokio::test]
async fn login_with_blank_field_skips_portal() {
    let portal = MockPortal::accepting();
    let app = app(test_app_state(portal.clone()));

    let resp = app
        .oneshot(login_request(DEVICE_HOST, "username=2021211000&password="))
        .await
        .unwrap();

    assert_eq!(
        json_body(resp).await,
        json!({"code": 2, "message": "username and password are required"})
    );
    assert_eq!(portal.calls(), 0);
}

#[tokio::test]
async fn login_with_port_in_host_is_served() {
    let app = app(test_app_state(MockPortal::accepting()));
    let resp = app
        .oneshot(login_request("192.168.71.1:80", "username=a&password=b"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// =========================================================================
// captive redirect
// =========================================================================

#[tokio::test]
async fn foreign_host_is_redirected_to_device() {
    let app = app(test_app_state(MockPortal::accepting()));
    let req = HttpRequest::get("/generate_204")
        .header(header::HOST, "connect.rom.miui.com")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "http://192.168.71.1/");
}

#[tokio::test]
async fn redirect_keeps_configured_port() {
    let config = PortalConfig::from_lookup(|key| (key == "PORT").then(|| "8080".to_owned())).unwrap();
    let app = app(AppState::new(config, MockPortal::accepting()));
    let req = HttpRequest::get("/").header(header::HOST, "example.com").body(Body::empty()).unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "http://192.168.71.1:8080/");
}

#[tokio::test]
async fn foreign_host_login_never_reaches_portal() {
    let portal = MockPortal::accepting();
    let app = app(test_app_state(portal.clone()));

    let resp = app
        .oneshot(login_request("example.com", "username=2021211000&password=secret123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(portal.calls(), 0);
}

#[test]
fn is_device_host_matches_ip_with_or_without_port() {
    let ip = Ipv4Addr::new(192, 168, 71, 1);
    assert!(is_device_host(Some("192.168.71.1"), ip));
    assert!(is_device_host(Some("192.168.71.1:8080"), ip));
    assert!(!is_device_host(Some("192.168.71.2"), ip));
    assert!(!is_device_host(Some("captive.apple.com"), ip));
    assert!(!is_device_host(None, ip));
}

// =========================================================================
// healthz + static page
// =========================================================================

#[tokio::test]
async fn healthz_ok_on_device_host() {
    let app = app(test_app_state(MockPortal::accepting()));
    let req = HttpRequest::get("/healthz").header(header::HOST, DEVICE_HOST).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_serves_login_page() {
    let app = app(test_app_state(MockPortal::accepting()));
    let req = HttpRequest::get("/").header(header::HOST, DEVICE_HOST).body(Body::empty()).unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("byr_pet_ui"));
}
