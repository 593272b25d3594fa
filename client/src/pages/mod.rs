//! Page modules. The device serves exactly one page.

pub mod login;
