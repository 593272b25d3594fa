//! `POST /login`: the endpoint the login page submits to.
//!
//! The reply always has status 200 and a JSON body the page interprets:
//! `{}` means online, `{"code": n, "message": ".."}` means the attempt failed
//! and `message` is shown to the user as-is.

use axum::Form;
use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::services::portal::Account;
use crate::state::AppState;

/// Portal rejected the login or could not be reached.
pub const CODE_PORTAL_FAILED: u8 = 1;
/// Form arrived with a blank field.
pub const CODE_MISSING_FIELDS: u8 = 2;

const MISSING_FIELDS_MESSAGE: &str = "username and password are required";

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoginReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginReply {
    fn failed(code: u8, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: Some(message.into()) }
    }
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Json<LoginReply> {
    let Some(account) = Account::new(&form.username, &form.password) else {
        return Json(LoginReply::failed(CODE_MISSING_FIELDS, MISSING_FIELDS_MESSAGE));
    };

    match state.portal.login(&account).await {
        Ok(()) => {
            tracing::info!(username = %account.username, "portal login succeeded");
            Json(LoginReply::default())
        }
        Err(e) => {
            tracing::warn!(username = %account.username, error = %e, "portal login failed");
            Json(LoginReply::failed(CODE_PORTAL_FAILED, e.to_string()))
        }
    }
}
