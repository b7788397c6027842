//! User administration page. Administrators only.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use leptos::prelude::*;

use crate::guards::role::authorize;
use crate::net::api::ApiGateway;
use crate::net::types::{Role, User};
use crate::state::session::SessionState;
use crate::util::messages::describe;

/// Role required to see this section.
pub const REQUIRED_ROLE: Role = Role::Admin;

/// `Err` carries the text shown instead of the page.
pub fn admin_gate(state: &SessionState) -> Result<(), String> {
    if authorize(state.claims(), REQUIRED_ROLE) {
        Ok(())
    } else {
        Err(describe(Some(403)))
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let gateway = expect_context::<ApiGateway>();

    let users = RwSignal::new(Vec::<User>::new());
    let info = RwSignal::new(String::new());
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get() || admin_gate(&session.get()).is_err() {
            return;
        }
        requested.set(true);

        #[cfg(feature = "hydrate")]
        {
            let gateway = gateway.clone();
            leptos::task::spawn_local(async move {
                match crate::net::services::UserService::new(&gateway).list().await {
                    Ok(list) => users.set(list),
                    Err(e) => info.set(crate::util::messages::describe_error(&e)),
                }
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&gateway, users, info);
        }
    });

    view! {
        <div class="users-page">
            {move || match admin_gate(&session.get()) {
                Err(message) => view! { <p class="users-page__denied">{message}</p> }.into_any(),
                Ok(()) => view! {
                    <h1>"Users"</h1>
                    <Show when=move || !info.get().is_empty()>
                        <p class="users-page__message">{move || info.get()}</p>
                    </Show>
                    <ul class="users-page__list">
                        <For each=move || users.get() key=|u| u.id.clone() let:user>
                            <li>
                                <span class="users-page__name">{user.username.clone()}</span>
                                <span class="users-page__role">{user.role.label()}</span>
                            </li>
                        </For>
                    </ul>
                }
                .into_any(),
            }}
        </div>
    }
}
