use super::*;
use crate::net::types::LoginOutcome;
use crate::state::login::LoginPhase;

#[test]
fn submit_label_reflects_submitting() {
    assert_eq!(submit_label(false), "连接 BUPT-portal");
    assert_eq!(submit_label(true), "正在连接...");
}

#[test]
fn error_text_is_empty_without_error() {
    assert_eq!(error_text(&LoginState::default()), "");
}

#[test]
fn error_text_shows_message_verbatim() {
    let state = LoginState {
        phase: LoginPhase::Editable { error: Some("bad credentials".to_owned()) },
        ..LoginState::default()
    };
    assert_eq!(error_text(&state), "bad credentials");
}

fn filled(password: &str) -> LoginState {
    LoginState { username: "2021211000".to_owned(), password: password.to_owned(), ..LoginState::default() }
}

#[test]
fn form_is_replaced_once_completed() {
    let mut state = filled("secret123");
    assert!(shows_form(&state));

    state.begin_submit().unwrap();
    assert!(shows_form(&state));

    assert!(state.resolve(LoginOutcome::Success));
    assert!(!shows_form(&state));
}

#[test]
fn form_stays_after_rejection() {
    let mut state = filled("wrong");
    state.begin_submit().unwrap();
    assert!(state.resolve(LoginOutcome::Rejected("bad credentials".to_owned())));
    assert!(shows_form(&state));
    assert_eq!(error_text(&state), "bad credentials");
}
