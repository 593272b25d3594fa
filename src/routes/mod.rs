//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Requests addressed to the device (by `Host`) reach `/login`, `/healthz`,
//! or the static login page. Anything addressed to another host is a phone's
//! connectivity probe or a page the user tried to open before logging in; it
//! is redirected to the device root so the login page shows up.

pub mod login;

use std::net::Ipv4Addr;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let site = ServeDir::new(&state.config.site_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/login", post(login::login))
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(state.clone(), captive_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Whether `host` (optionally with `:port`) names the device address.
pub(crate) fn is_device_host(host: Option<&str>, ap_ip: Ipv4Addr) -> bool {
    host.and_then(|h| h.split(':').next())
        .and_then(|h| h.parse::<Ipv4Addr>().ok())
        .is_some_and(|ip| ip == ap_ip)
}

async fn captive_redirect(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .map(str::to_owned);

    if is_device_host(host.as_deref(), state.config.ap_ip) {
        return next.run(req).await;
    }

    tracing::info!(host = host.as_deref().unwrap_or("unknown"), uri = %req.uri(), "captive redirect");
    (StatusCode::FOUND, [(header::LOCATION, state.config.home_url())]).into_response()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
