//! Pre-render route decision from token presence alone.
//!
//! Runs before any page renders, where only the raw cookie is visible. It
//! never decodes or validates the token; that is the access guard's job
//! after hydration.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use crate::config::RoutePaths;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Anonymous visitors go to the login page; signed-in ones are bounced off it.
#[must_use]
pub fn route_decision(token_present: bool, path: &str, routes: &RoutePaths) -> RouteDecision {
    let on_login = path == routes.login;
    match (token_present, on_login) {
        (false, false) => RouteDecision::Redirect(routes.login.clone()),
        (true, true) => RouteDecision::Redirect(routes.home.clone()),
        _ => RouteDecision::Allow,
    }
}

/// Apply a decision through `navigate`. Returns whether navigation happened.
pub fn follow(decision: &RouteDecision, navigate: impl FnOnce(&str)) -> bool {
    match decision {
        RouteDecision::Allow => false,
        RouteDecision::Redirect(target) => {
            navigate(target);
            true
        }
    }
}

#[cfg(feature = "ssr")]
pub use server::route_guard_layer;

#[cfg(feature = "ssr")]
mod server {
    use axum::extract::{Request, State};
    use axum::middleware::Next;
    use axum::response::{IntoResponse, Redirect, Response};
    use axum_extra::extract::cookie::CookieJar;

    use super::{RouteDecision, route_decision};
    use crate::config::{ClientConfig, StorageBackend};
    use crate::util::token_store::ACCESS_TOKEN_KEY;

    /// Axum middleware for SSR page routes. Layer it with
    /// `axum::middleware::from_fn_with_state(config, route_guard_layer)` on
    /// the page router only, not on asset or API routes.
    ///
    /// With the local-storage backend the server cannot see the token, so
    /// every request passes through.
    pub async fn route_guard_layer(State(config): State<ClientConfig>, jar: CookieJar, req: Request, next: Next) -> Response {
        if config.storage != StorageBackend::Cookie {
            return next.run(req).await;
        }
        let present = jar.get(ACCESS_TOKEN_KEY).is_some_and(|c| !c.value().is_empty());
        match route_decision(present, req.uri().path(), &config.routes) {
            RouteDecision::Allow => next.run(req).await,
            RouteDecision::Redirect(target) => {
                log::debug!("route guard: {} -> {target}", req.uri().path());
                Redirect::to(&target).into_response()
            }
        }
    }
}
