use super::*;

#[test]
fn from_input_keeps_student_id_as_typed() {
    let creds = Credentials::from_input(" 2021211000 ", "secret123").unwrap();
    assert_eq!(creds.username, " 2021211000 ");
    assert_eq!(creds.password, "secret123");
}

#[test]
fn from_input_keeps_password_whitespace() {
    let creds = Credentials::from_input("2021211000", " pw ").unwrap();
    assert_eq!(creds.password, " pw ");
}

#[test]
fn from_input_rejects_empty_fields() {
    assert_eq!(Credentials::from_input("", "secret123"), None);
    assert_eq!(Credentials::from_input("   ", "secret123"), None);
    assert_eq!(Credentials::from_input("2021211000", ""), None);
}

#[test]
fn debug_masks_password() {
    let creds = Credentials::from_input("2021211000", "secret123").unwrap();
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("2021211000"));
    assert!(rendered.contains("*********"));
    assert!(!rendered.contains("secret123"));
}

#[test]
fn error_message_for_each_outcome() {
    assert_eq!(LoginOutcome::Success.error_message(), None);
    assert_eq!(
        LoginOutcome::Rejected("bad credentials".to_owned()).error_message(),
        Some("bad credentials".to_owned())
    );
    assert_eq!(
        LoginOutcome::ConnectionFailed("timeout".to_owned()).error_message(),
        Some("Connection failed: timeout".to_owned())
    );
}
