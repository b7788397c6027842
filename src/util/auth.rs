//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical redirect behavior. These helpers
//! turn guard decisions and session changes into router navigation.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use crate::guards::access::AccessGuard;
#[cfg(feature = "hydrate")]
use crate::guards::route::follow;
use crate::state::session::SessionState;

/// Redirect to the login page once the session settles without a user.
///
/// Covers the 401 hook and logout in other components: both clear the
/// session and this effect performs the navigation.
pub fn install_unauth_redirect<F>(session: RwSignal<SessionState>, login_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    Effect::new(move || {
        let state = session.get();
        if state.is_loading() || state.is_authenticated() {
            return;
        }
        if location.pathname.get_untracked() != login_path {
            navigate(&login_path, NavigateOptions::default());
        }
    });
}

/// Run the access guard on every navigation and follow a `Deny`.
pub fn install_access_guard<F>(guard: AccessGuard, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    Effect::new(move || {
        let path = location.pathname.get();

        #[cfg(feature = "hydrate")]
        {
            let guard = guard.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let decision = guard.check(&path).await;
                follow(&decision.to_route(guard.login_path()), |target| {
                    navigate(target, NavigateOptions::default());
                });
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&guard, &navigate, path);
        }
    });
}
