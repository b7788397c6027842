//! Home page: who is signed in, and the way out.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::guards::role::authorize;
use crate::net::types::Role;
use crate::state::auth::AuthSession;
use crate::state::session::SessionState;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let auth = expect_context::<AuthSession>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let user = move || session.get().display_user();
    let is_admin = move || authorize(session.get().claims(), Role::Admin);

    let on_logout = move |_| {
        let navigate = navigate.clone();
        auth.logout(move |path| navigate(path, NavigateOptions::default()), &config.routes.login);
    };

    view! {
        <div class="home-page">
            <Show
                when=move || user().is_some()
                fallback=|| view! { <p class="home-page__loading">"Loading..."</p> }
            >
                <header class="home-page__header">
                    <h1>{move || user().map(|u| u.username).unwrap_or_default()}</h1>
                    <span class="home-page__role">{move || user().map(|u| u.role.label()).unwrap_or_default()}</span>
                </header>
            </Show>
            <nav class="home-page__nav">
                <Show when=is_admin>
                    <a href="/users">"Users"</a>
                </Show>
                <button class="home-page__logout" on:click=on_logout>
                    "Log out"
                </button>
            </nav>
        </div>
    }
}
