//! Post-hydration access check against the identity endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route guard only saw a cookie. Once the client is live, every
//! navigation asks the backend whether the stored token still identifies
//! someone. Navigation itself stays with the caller.
//!
//! CONCURRENCY
//! ===========
//! Checks suspend on `GET /me`. Each one takes a navigation ticket; if the
//! user navigated again in the meantime the answer comes back `Superseded`
//! and must not be acted on.

#[cfg(test)]
#[path = "access_test.rs"]
mod access_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::route::RouteDecision;
use crate::net::api::ApiGateway;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
    /// A newer navigation started while this one was in flight.
    Superseded,
}

impl AccessDecision {
    /// Navigation to perform, if any. `Superseded` never navigates.
    #[must_use]
    pub fn to_route(self, login_path: &str) -> RouteDecision {
        match self {
            Self::Deny => RouteDecision::Redirect(login_path.to_owned()),
            Self::Allow | Self::Superseded => RouteDecision::Allow,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AccessGuard {
    gateway: ApiGateway,
    login_path: String,
    generation: Arc<AtomicU64>,
}

impl AccessGuard {
    pub fn new(gateway: ApiGateway, login_path: impl Into<String>) -> Self {
        Self { gateway, login_path: login_path.into(), generation: Arc::new(AtomicU64::new(0)) }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide whether `path` may be shown.
    ///
    /// The login page is always allowed. Without a token the answer is
    /// `Deny` with no request made. Otherwise any gateway error, network
    /// failures included, denies.
    pub async fn check(&self, path: &str) -> AccessDecision {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if path == self.login_path {
            return AccessDecision::Allow;
        }
        if !self.gateway.has_token() {
            return AccessDecision::Deny;
        }
        let outcome = self.gateway.me().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            log::debug!("access guard: result for {path} superseded");
            return AccessDecision::Superseded;
        }
        match outcome {
            Ok(_) => AccessDecision::Allow,
            Err(e) => {
                log::warn!("access guard: denying {path}: {e}");
                AccessDecision::Deny
            }
        }
    }
}
