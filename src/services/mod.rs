//! Service layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! `portal` talks to the campus captive portal on behalf of the login page;
//! `dns` keeps every client name resolving to this device so unauthenticated
//! browsers land on that page.

pub mod dns;
pub mod portal;
