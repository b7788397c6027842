//! Login page: username + password against `POST /login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::api::ApiGateway;
use crate::net::error::{ApiError, ApiErrorKind};
use crate::net::types::LoginRequest;
use crate::state::auth::AuthSession;
use crate::util::messages::describe_error;

const MISSING_FIELDS: &str = "Enter both username and password.";

/// Trim the username and require both fields.
pub fn validate_credentials(username: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok(LoginRequest { username: username.to_owned(), password: password.to_owned() })
}

/// Message for a failed sign-in. Statusless failures keep their own text.
pub fn login_failure_message(error: &ApiError) -> String {
    match error.kind {
        ApiErrorKind::NetworkFailure | ApiErrorKind::Decode => error.message.clone(),
        _ => describe_error(error),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthSession>();
    let gateway = expect_context::<ApiGateway>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_credentials(&username.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let auth = auth.clone();
            let gateway = gateway.clone();
            let navigate = navigate.clone();
            let home = config.routes.home.clone();
            leptos::task::spawn_local(async move {
                let service = crate::net::services::AuthService::new(&gateway);
                match service.login(&auth, &credentials, crate::util::token::now_secs()).await {
                    Ok(user) => {
                        log::info!("login: signed in as {}", user.username);
                        password.set(String::new());
                        navigate(&home, NavigateOptions::default());
                    }
                    Err(e) => {
                        info.set(login_failure_message(&e));
                        busy.set(false);
                    }
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&auth, &gateway, &navigate, &config, credentials);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Folkers"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
