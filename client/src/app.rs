//! Root application component.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::pages::login::LoginPage;

/// Root application component. The device serves a single page, so there is
/// no router: the login view is the whole app.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="BYR-pet"/>
        <LoginPage/>
    }
}
