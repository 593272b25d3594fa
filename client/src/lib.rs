//! # byr-pet-ui
//!
//! Leptos + WASM login screen served by the BYR-pet device. The user enters a
//! student ID and campus network password; the page posts them to `/login`
//! and shows the outcome.
//!
//! The state machine (`state::login`) and wire helpers (`net::api`) are plain
//! Rust so they can be tested natively; only the `csr` feature pulls in the
//! browser transport and the mount entry point.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: install browser logging and mount [`app::App`] on `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
