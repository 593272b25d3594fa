//! Networking for the login screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds and sends the `/login` request and interprets the reply;
//! `types` defines the credential pair and the attempt outcome.

pub mod api;
pub mod types;
