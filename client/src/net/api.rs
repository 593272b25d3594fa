//! `/login` request construction, transport, and reply interpretation.
//!
//! Browser (csr): real HTTP via `gloo-net` in [`HttpPortalApi`].
//! Native builds and tests drive [`submit_login`] through any other
//! [`PortalApi`] implementation.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures are carried as `String` and folded into
//! [`LoginOutcome::ConnectionFailed`]; nothing here panics or propagates past
//! the login view.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::types::{Credentials, DEFAULT_REJECTION_MESSAGE, LoginOutcome};

pub const LOGIN_METHOD: &str = "POST";
pub const LOGIN_PATH: &str = "/login";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully-formed login request, independent of the HTTP stack that sends it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

/// Transport seam for the login call. Enables mocking in tests.
#[async_trait::async_trait(?Send)]
pub trait PortalApi {
    /// Send `request` and decode the reply body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the request cannot be
    /// completed or the body is not valid JSON.
    async fn send(&self, request: &LoginRequest) -> Result<Value, String>;
}

/// Percent-encoded `username=..&password=..` form body.
#[must_use]
pub fn form_body(creds: &Credentials) -> String {
    format!(
        "username={}&password={}",
        urlencoding::encode(&creds.username),
        urlencoding::encode(&creds.password)
    )
}

#[must_use]
pub fn login_request(creds: &Credentials) -> LoginRequest {
    LoginRequest {
        method: LOGIN_METHOD,
        path: LOGIN_PATH,
        content_type: FORM_CONTENT_TYPE,
        body: form_body(creds),
    }
}

/// Script-style truthiness: `null`, `false`, `0`, and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn rejection_message(reply: &Value) -> String {
    match reply.get("message") {
        None | Some(Value::Null) => DEFAULT_REJECTION_MESSAGE.to_owned(),
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
    }
}

/// A truthy `code` means the portal rejected the login; anything else is success.
#[must_use]
pub fn interpret_reply(reply: &Value) -> LoginOutcome {
    match reply.get("code") {
        Some(code) if is_truthy(code) => LoginOutcome::Rejected(rejection_message(reply)),
        _ => LoginOutcome::Success,
    }
}

/// Issue exactly one login call and classify its result.
pub async fn submit_login<A>(api: &A, creds: &Credentials) -> LoginOutcome
where
    A: PortalApi + ?Sized,
{
    let request = login_request(creds);
    match api.send(&request).await {
        Ok(reply) => interpret_reply(&reply),
        Err(cause) => LoginOutcome::ConnectionFailed(cause),
    }
}

/// Same-origin `fetch` transport used in the browser.
#[cfg(feature = "csr")]
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpPortalApi;

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl PortalApi for HttpPortalApi {
    async fn send(&self, request: &LoginRequest) -> Result<Value, String> {
        let resp = gloo_net::http::Request::post(request.path)
            .header("Content-Type", request.content_type)
            .body(request.body.clone())
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        log::debug!("login reply status {}", resp.status());
        resp.json::<Value>().await.map_err(|e| e.to_string())
    }
}
