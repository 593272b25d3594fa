//! Login page: student ID + campus password, posted to `/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::state::login::LoginState;

const SUBMIT_LABEL: &str = "连接 BUPT-portal";
const SUBMITTING_LABEL: &str = "正在连接...";

fn submit_label(submitting: bool) -> &'static str {
    if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL }
}

/// The form is replaced by the success line once the login completes.
fn shows_form(state: &LoginState) -> bool {
    !state.is_completed()
}

fn error_text(state: &LoginState) -> String {
    state.error().unwrap_or_default().to_owned()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = RwSignal::new(LoginState::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(creds) = state.try_update(LoginState::begin_submit).flatten() else {
            return;
        };

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            log::info!("submitting login for {}", creds.username);
            let outcome = crate::net::api::submit_login(&crate::net::api::HttpPortalApi, &creds).await;
            if let Some(message) = outcome.error_message() {
                log::warn!("login failed: {message}");
            }
            // Disposed signal (view unmounted mid-request): the result is dropped.
            let _ = state.try_update(|s| s.resolve(outcome));
        });
        #[cfg(not(feature = "csr"))]
        let _ = creds;
    };

    view! {
        <main>
            <h1>"Welcome to BYR-pet"</h1>
            <Show
                when=move || state.with(shows_form)
                fallback=|| view! { <p>"已连接 BUPT-portal"</p> }
            >
                <p>"输入学号和校园网密码以连接 BUPT-portal"</p>
                <form on:submit=on_submit>
                    <label for="username">"学号"</label>
                    <input
                        id="username"
                        name="username"
                        type="text"
                        autocomplete="username"
                        required=true
                        prop:value=move || state.with(|s| s.username.clone())
                        on:input=move |ev| state.update(|s| s.username = event_target_value(&ev))
                    />
                    <label for="password">"密码"</label>
                    <input
                        id="password"
                        name="password"
                        type="password"
                        autocomplete="current-password"
                        required=true
                        prop:value=move || state.with(|s| s.password.clone())
                        on:input=move |ev| state.update(|s| s.password = event_target_value(&ev))
                    />
                    <button
                        type="submit"
                        disabled=move || state.with(LoginState::is_submitting)
                    >
                        {move || submit_label(state.with(LoginState::is_submitting))}
                    </button>
                </form>
                <Show when=move || state.with(|s| s.error().is_some())>
                    <p>{move || state.with(error_text)}</p>
                </Show>
            </Show>
        </main>
    }
}
