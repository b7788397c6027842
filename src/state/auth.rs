//! Auth-session orchestration for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the token store and the published [`SessionState`]. Pages, guards and
//! the gateway's 401 hook go through here; nothing else writes the token.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, PoisonError};

use leptos::prelude::*;

use super::session::{Hydration, Lifecycle, SessionState};
use crate::net::api::ApiGateway;
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::util::token::{self, Claims, TokenError};
use crate::util::token_store::TokenStore;

/// Where the session value lives: a reactive signal in the app, a plain
/// mutex in tests.
pub trait SessionCell: Send + Sync {
    fn snapshot(&self) -> SessionState;
    fn apply(&self, f: &mut dyn FnMut(&mut SessionState));
}

impl SessionCell for RwSignal<SessionState> {
    fn snapshot(&self) -> SessionState {
        self.get_untracked()
    }

    fn apply(&self, f: &mut dyn FnMut(&mut SessionState)) {
        self.update(|state| f(state));
    }
}

impl SessionCell for Mutex<SessionState> {
    fn snapshot(&self) -> SessionState {
        self.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn apply(&self, f: &mut dyn FnMut(&mut SessionState)) {
        let mut state = self.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn TokenStore>,
    cell: Arc<dyn SessionCell>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").field("state", &self.cell.snapshot()).finish_non_exhaustive()
    }
}

impl AuthSession {
    pub fn new(store: Arc<dyn TokenStore>, cell: Arc<dyn SessionCell>) -> Self {
        Self { store, cell }
    }

    /// Raw stored token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.cell.snapshot()
    }

    fn transition<R>(&self, mut f: impl FnMut(&mut SessionState) -> R) -> Option<R> {
        let mut out = None;
        self.cell.apply(&mut |state: &mut SessionState| out = Some(f(state)));
        out
    }

    /// Bootstrap from storage and confirm the identity once.
    ///
    /// Ends in `Authenticated` or `Anonymous`. A stored token that is
    /// malformed, expired or refused by the backend is removed.
    pub async fn initialize(&self, gateway: &ApiGateway, now: u64) {
        let stored = self.store.get();
        let outcome = self.transition(|state| state.hydrate(stored.as_deref(), now));
        match outcome {
            Some(Hydration::Pending(ticket)) => {
                let _ = self.confirm_lifecycle(gateway, ticket).await;
            }
            Some(Hydration::Rejected(e)) => {
                log::info!("auth: discarding unusable stored token ({e})");
                self.store.clear();
            }
            Some(Hydration::Skipped) => log::debug!("auth: session already bootstrapped"),
            Some(Hydration::Anonymous) | None => {}
        }
    }

    /// Persist a freshly issued token and start a new lifecycle from its claims.
    ///
    /// # Errors
    ///
    /// [`TokenError::Malformed`] when the token cannot be decoded; nothing is
    /// stored in that case. An already-expired token is stored but leaves the
    /// session anonymous.
    pub fn set_token(&self, raw: &str, now: u64) -> Result<Claims, TokenError> {
        let claims = token::parse_claims(raw)?;
        self.store.set(raw, claims.expiry);
        self.transition(|state| state.start(claims.clone(), now));
        Ok(claims)
    }

    /// Confirm the pending lifecycle against `GET /me`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the session is then anonymous and storage
    /// cleared. With no lifecycle pending, reports [`ApiError::auth_required`].
    pub async fn confirm(&self, gateway: &ApiGateway) -> Result<User, ApiError> {
        match self.cell.snapshot().pending() {
            Some(ticket) => self.confirm_lifecycle(gateway, ticket).await,
            None => self.cell.snapshot().user().cloned().ok_or_else(ApiError::auth_required),
        }
    }

    async fn confirm_lifecycle(&self, gateway: &ApiGateway, ticket: Lifecycle) -> Result<User, ApiError> {
        match gateway.me().await {
            Ok(user) => {
                let confirmed = user.clone();
                if self.transition(move |state| state.confirm(ticket, confirmed.clone())) != Some(true) {
                    log::debug!("auth: confirmation for superseded lifecycle ignored");
                }
                Ok(user)
            }
            Err(e) => {
                log::warn!("auth: identity check failed: {e}");
                if self.transition(|state| state.reject(ticket)) == Some(true) {
                    self.store.clear();
                }
                Err(e)
            }
        }
    }

    /// Forget the token and go anonymous. Safe to call repeatedly.
    pub fn clear_auth(&self) {
        self.store.clear();
        self.transition(SessionState::clear);
    }

    /// React to a gateway error: a 401 clears the session.
    pub fn handle_error(&self, error: &ApiError) {
        if error.is_auth_required() {
            self.clear_auth();
        }
    }

    pub fn logout(&self, navigate: impl Fn(&str), login_path: &str) {
        log::info!("auth: logout");
        self.clear_auth();
        navigate(login_path);
    }
}
