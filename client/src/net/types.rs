//! Login wire types shared by the state machine and the transport.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shown before transport-level failure descriptions.
pub const CONNECTION_FAILED_PREFIX: &str = "Connection failed: ";

/// Text shown when the portal rejects a login without giving a reason.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Login failed";

/// Text shown when the form is submitted with a blank field.
pub const MISSING_FIELDS_MESSAGE: &str = "请输入学号和密码";

/// Student ID + campus network password, validated as non-empty.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Validate raw form input. Both fields are kept exactly as typed.
    /// Returns `None` when the student ID is blank or the password is empty.
    #[must_use]
    pub fn from_input(username: &str, password: &str) -> Option<Self> {
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username: username.to_owned(), password: password.to_owned() })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*".repeat(self.password.len()))
            .finish()
    }
}

/// Result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The reply carried no truthy `code`.
    Success,
    /// The portal answered with a failure `code`; holds its `message`.
    Rejected(String),
    /// The request could not be completed or the reply was not JSON.
    ConnectionFailed(String),
}

impl LoginOutcome {
    /// Message to show the user, or `None` on success.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::Rejected(message) => Some(message.clone()),
            Self::ConnectionFailed(cause) => Some(format!("{CONNECTION_FAILED_PREFIX}{cause}")),
        }
    }
}
