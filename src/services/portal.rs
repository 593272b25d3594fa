//! Campus portal client: status probe, form login, failure-reason scraping.
//!
//! DESIGN
//! ======
//! The probe URL answers `204` once the network is open. Before that the
//! gateway either redirects it (`302`, followed by hand so the hops can be
//! logged and bounded) or serves the login page itself (`200`), whose first
//! `Set-Cookie` pair must be replayed on the login `POST`.
//!
//! A login `POST` that returns `200` is only trusted after a second probe
//! reports `204`; otherwise the portal's error banner is scraped from the
//! body for the user.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, info, warn};

use crate::config::PortalConfig;

const MAX_REDIRECTS: usize = 5;
const ERROR_BANNER_OPEN: &str = "<div class=\"ui error message\">";
const ERROR_BANNER_CLOSE: &str = "</div>";
const UNKNOWN_REASON: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),
    #[error("no Location header found in response")]
    MissingLocation,
    #[error("too many redirects while checking portal status")]
    TooManyRedirects,
    #[error("unexpected redirect: {0}")]
    UnexpectedRedirect(String),
    #[error("BUPT-portal authentication failed: {0}")]
    Rejected(String),
}

/// Student ID + campus password, as submitted by the login page.
#[derive(Clone)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    /// Returns `None` when either field is blank. Values are kept as sent.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Option<Self> {
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username: username.to_owned(), password: password.to_owned() })
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"*".repeat(self.password.len()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalStatus {
    Authenticated,
    /// `cookie` is the `name=value` pair to replay on login, if one was set.
    NotAuthenticated { cookie: Option<String> },
}

/// Portal login seam. Enables mocking in handler tests.
#[async_trait]
pub trait PortalAuth: Send + Sync {
    /// Bring the network online for `account`. Succeeds without posting
    /// credentials if the probe already reports online.
    ///
    /// # Errors
    ///
    /// Returns a [`PortalError`] if the portal is unreachable, answers
    /// unexpectedly, or rejects the credentials.
    async fn login(&self, account: &Account) -> Result<(), PortalError>;
}

/// `reqwest`-backed client for the BUPT captive portal.
pub struct BuptPortal {
    client: Client,
    portal_url: String,
    check_url: String,
}

impl BuptPortal {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.portal_timeout)
            .build()?;
        Ok(Self { client, portal_url: config.portal_url.clone(), check_url: config.check_url.clone() })
    }

    /// Probe network status, following up to five redirects.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a redirect without `Location`,
    /// too many hops, or any status other than `200`/`204`/`302`.
    pub async fn check(&self) -> Result<PortalStatus, PortalError> {
        let mut url = self.check_url.clone();
        for _ in 0..=MAX_REDIRECTS {
            debug!(%url, "checking portal status");
            let resp = self.client.get(&url).send().await?;
            debug!(status = %resp.status(), "portal status response");
            match resp.status() {
                StatusCode::NO_CONTENT => return Ok(PortalStatus::Authenticated),
                StatusCode::FOUND => {
                    url = redirect_target(&resp)?;
                    info!(%url, "redirected");
                }
                StatusCode::OK => {
                    return Ok(PortalStatus::NotAuthenticated { cookie: session_cookie(resp.headers()) });
                }
                other => return Err(PortalError::UnexpectedStatus(other.as_u16())),
            }
        }
        Err(PortalError::TooManyRedirects)
    }

    async fn authenticate(&self, account: &Account, cookie: Option<&str>) -> Result<(), PortalError> {
        let mut req = self
            .client
            .post(format!("{}/login", self.portal_url))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(portal_form_body(account));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        let resp = req.send().await?;
        debug!(status = %resp.status(), "portal login response");

        match resp.status() {
            StatusCode::FOUND => Err(PortalError::UnexpectedRedirect(redirect_target(&resp)?)),
            StatusCode::OK => {
                let body = resp.text().await?;
                match self.check().await? {
                    PortalStatus::Authenticated => {
                        info!("BUPT-portal authenticated successfully");
                        Ok(())
                    }
                    PortalStatus::NotAuthenticated { .. } => {
                        Err(PortalError::Rejected(failure_reason(&body).to_owned()))
                    }
                }
            }
            other => Err(PortalError::UnexpectedStatus(other.as_u16())),
        }
    }
}

#[async_trait]
impl PortalAuth for BuptPortal {
    async fn login(&self, account: &Account) -> Result<(), PortalError> {
        info!("checking BUPT-portal status");
        match self.check().await {
            Ok(PortalStatus::Authenticated) => {
                info!("BUPT-portal is already authenticated");
                Ok(())
            }
            Ok(PortalStatus::NotAuthenticated { cookie }) => {
                info!(?account, "BUPT-portal not authenticated, logging in");
                if cookie.is_none() {
                    warn!("no cookie found in response, login may not succeed");
                }
                self.authenticate(account, cookie.as_deref()).await
            }
            Err(e) => {
                error!(error = %e, "BUPT-portal status check failed");
                Err(e)
            }
        }
    }
}

/// `user=..&pass=..`, the field names the portal's own form uses.
pub(crate) fn portal_form_body(account: &Account) -> String {
    format!(
        "user={}&pass={}",
        urlencoding::encode(&account.username),
        urlencoding::encode(&account.password)
    )
}

/// First `Set-Cookie` header reduced to its `name=value` pair.
pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    (!pair.is_empty()).then(|| pair.to_owned())
}

/// Text inside the portal's `ui error message` banner, or a fallback.
pub(crate) fn failure_reason(body: &str) -> &str {
    body.find(ERROR_BANNER_OPEN)
        .and_then(|start| {
            let content = &body[start + ERROR_BANNER_OPEN.len()..];
            content.find(ERROR_BANNER_CLOSE).map(|end| content[..end].trim())
        })
        .unwrap_or(UNKNOWN_REASON)
}

fn redirect_target(resp: &Response) -> Result<String, PortalError> {
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(PortalError::MissingLocation)?;
    Ok(resp.url().join(location).map_or_else(|_| location.to_owned(), |url| url.to_string()))
}

#[cfg(test)]
#[path = "portal_test.rs"]
mod tests;
