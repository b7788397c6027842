//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
    hooks::use_navigate,
};

use crate::config::ClientConfig;
use crate::guards::access::AccessGuard;
use crate::net::api::ApiGateway;
use crate::net::transport::BrowserTransport;
use crate::pages::{home::HomePage, login::LoginPage, users::UsersPage};
use crate::state::auth::AuthSession;
use crate::state::session::SessionState;
use crate::util::auth::{install_access_guard, install_unauth_redirect};
use crate::util::token_store::store_for;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Wires one token store into both the session and the gateway, points the
/// gateway's 401 hook at the session, and starts the bootstrap check.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        log::warn!("config: {e}; falling back to defaults");
        ClientConfig::default()
    });

    let session = RwSignal::new(SessionState::default());
    let tokens = store_for(config.storage);
    let auth = AuthSession::new(tokens.clone(), Arc::new(session));
    let hook_auth = auth.clone();
    let gateway = ApiGateway::new(config.api_endpoint.clone(), Arc::new(BrowserTransport), tokens)
        .with_auth_required_hook(move || hook_auth.clear_auth());
    let guard = AccessGuard::new(gateway.clone(), config.routes.login.clone());

    #[cfg(feature = "hydrate")]
    {
        let auth = auth.clone();
        let gateway = gateway.clone();
        leptos::task::spawn_local(async move {
            auth.initialize(&gateway, crate::util::token::now_secs()).await;
        });
    }

    provide_context(session);
    provide_context(auth);
    provide_context(gateway);
    provide_context(guard);
    provide_context(config);

    view! {
        <Stylesheet id="leptos" href="/pkg/folkers-client.css"/>
        <Title text="Folkers"/>

        <Router>
            <SessionRedirects/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("users") view=UsersPage/>
            </Routes>
        </Router>
    }
}

/// Router-scoped effects: per-navigation access check and redirect on logout.
#[component]
fn SessionRedirects() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let guard = expect_context::<AccessGuard>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    install_unauth_redirect(session, config.routes.login.clone(), navigate.clone());
    install_access_guard(guard, navigate);
}
