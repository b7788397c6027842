//! Process-wide authentication state.
//!
//! DESIGN
//! ======
//! One value of a sum type replaces separate "is authenticated", "user" and
//! "is loading" flags, so an authenticated session without a user cannot be
//! represented. Fields are private: only the transition methods below move
//! the machine, and callers elsewhere (guards, gateway hook) can only ask for
//! a transition. The value is published to components through a Leptos
//! `RwSignal` context.
//!
//! Each pass `Unknown/Anonymous -> Loading -> terminal` is a lifecycle with
//! its own ticket. Confirmation results carry the ticket they were started
//! under and are dropped if the state has moved on since.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;
use crate::util::token::{self, Claims, TokenError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// Before bootstrap has looked at storage.
    #[default]
    Unknown,
    /// A plausible token exists; waiting for the identity check.
    Loading,
    Anonymous,
    Authenticated(User),
}

/// Ticket identifying one confirmation lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifecycle(u64);

/// Outcome of [`SessionState::hydrate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hydration {
    /// The session was already past `Unknown`; nothing changed.
    Skipped,
    /// No token in storage.
    Anonymous,
    /// The stored token is unusable and should be removed.
    Rejected(TokenError),
    /// The token looks valid; confirm it under this lifecycle.
    Pending(Lifecycle),
}

impl Hydration {
    #[must_use]
    pub fn ticket(self) -> Option<Lifecycle> {
        match self {
            Self::Pending(ticket) => Some(ticket),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    session: Session,
    claims: Option<Claims>,
    lifecycle: u64,
}

impl SessionState {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Claims decoded from the token that started the current lifecycle.
    #[must_use]
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.session {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Best available identity for display: the confirmed user, else the
    /// claims projection while the check is in flight.
    #[must_use]
    pub fn display_user(&self) -> Option<User> {
        self.user().cloned().or_else(|| match self.session {
            Session::Loading => self.claims.as_ref().map(Claims::projected_user),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Authenticated(_))
    }

    /// True until a terminal variant is reached.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.session, Session::Unknown | Session::Loading)
    }

    /// Ticket of the lifecycle currently awaiting confirmation.
    #[must_use]
    pub fn pending(&self) -> Option<Lifecycle> {
        matches!(self.session, Session::Loading).then_some(Lifecycle(self.lifecycle))
    }

    /// Bootstrap from whatever token storage held. Only applies from `Unknown`.
    ///
    /// A missing, malformed or expired token goes straight to `Anonymous`.
    pub fn hydrate(&mut self, token: Option<&str>, now: u64) -> Hydration {
        if self.session != Session::Unknown {
            return Hydration::Skipped;
        }
        match token.map(|t| token::valid_claims(t, now)) {
            Some(Ok(claims)) => Hydration::Pending(self.begin(claims)),
            Some(Err(e)) => {
                log::debug!("session: stored token rejected ({e})");
                self.to_anonymous();
                Hydration::Rejected(e)
            }
            None => {
                self.to_anonymous();
                Hydration::Anonymous
            }
        }
    }

    /// Start a new lifecycle for freshly issued `claims`.
    ///
    /// Already-expired claims land in `Anonymous` and yield no ticket.
    pub fn start(&mut self, claims: Claims, now: u64) -> Option<Lifecycle> {
        if token::is_expired(Some(&claims), now) {
            self.to_anonymous();
            return None;
        }
        Some(self.begin(claims))
    }

    /// Identity confirmed. Ignored unless `ticket` is still the pending lifecycle.
    pub fn confirm(&mut self, ticket: Lifecycle, user: User) -> bool {
        if self.pending() != Some(ticket) {
            log::debug!("session: dropping stale confirmation");
            return false;
        }
        log::debug!("session: authenticated as {}", user.username);
        self.session = Session::Authenticated(user);
        true
    }

    /// Identity check failed. Ignored unless `ticket` is still pending.
    pub fn reject(&mut self, ticket: Lifecycle) -> bool {
        if self.pending() != Some(ticket) {
            return false;
        }
        self.to_anonymous();
        true
    }

    /// Unconditionally anonymous. Also invalidates any pending ticket.
    pub fn clear(&mut self) {
        self.to_anonymous();
    }

    fn begin(&mut self, claims: Claims) -> Lifecycle {
        self.lifecycle += 1;
        self.claims = Some(claims);
        self.session = Session::Loading;
        log::debug!("session: lifecycle {} loading", self.lifecycle);
        Lifecycle(self.lifecycle)
    }

    fn to_anonymous(&mut self) {
        self.lifecycle += 1;
        self.claims = None;
        self.session = Session::Anonymous;
    }
}
