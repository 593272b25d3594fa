//! Login view state machine.
//!
//! DESIGN
//! ======
//! `Editable { error } -> Submitting -> { Editable { error: Some(..) }, Completed }`.
//! `Completed` is terminal. The `Editable -> Submitting` edge is taken only by
//! [`LoginState::begin_submit`], which refuses while a call is in flight, so
//! at most one request is outstanding per view.
//!
//! A result that arrives when the phase is not `Submitting` is dropped, which
//! also covers a reply landing after the view was torn down and rebuilt.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::net::types::{Credentials, LoginOutcome, MISSING_FIELDS_MESSAGE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginPhase {
    /// Form is shown and accepts input. `error` is the last failure, if any.
    Editable { error: Option<String> },
    /// A login call is outstanding; the submit control is disabled.
    Submitting,
    /// The portal accepted the credentials; the form is replaced.
    Completed,
}

impl Default for LoginPhase {
    fn default() -> Self {
        Self::Editable { error: None }
    }
}

/// Form fields plus the current phase, owned by one login view instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub phase: LoginPhase,
}

impl LoginState {
    /// Move to `Submitting` and hand back the credentials to send.
    ///
    /// Returns `None` when a call is already outstanding or the login has
    /// completed. A blank field also returns `None` and leaves the form
    /// editable with [`MISSING_FIELDS_MESSAGE`] as the error.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if !matches!(self.phase, LoginPhase::Editable { .. }) {
            return None;
        }
        let Some(creds) = Credentials::from_input(&self.username, &self.password) else {
            self.phase = LoginPhase::Editable { error: Some(MISSING_FIELDS_MESSAGE.to_owned()) };
            return None;
        };
        self.phase = LoginPhase::Submitting;
        Some(creds)
    }

    /// Apply the result of the outstanding call. Returns `false` if there was
    /// no call outstanding and the result was ignored.
    pub fn resolve(&mut self, outcome: LoginOutcome) -> bool {
        if self.phase != LoginPhase::Submitting {
            return false;
        }
        self.phase = match outcome.error_message() {
            None => LoginPhase::Completed,
            Some(error) => LoginPhase::Editable { error: Some(error) },
        };
        true
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == LoginPhase::Submitting
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == LoginPhase::Completed
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoginPhase::Editable { error } => error.as_deref(),
            LoginPhase::Submitting | LoginPhase::Completed => None,
        }
    }
}
