//! Raw access-token persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session layer only needs get/set/clear of one string. Which browser
//! facility backs it is a deployment choice (`FOLKERS_TOKEN_STORAGE`): the
//! cookie backend lets the SSR route guard see the token, local storage
//! keeps it out of request headers the server never needed.
//!
//! TRADE-OFFS
//! ==========
//! Browser backends are hydrate-only. On the server they read as empty and
//! ignore writes, which keeps SSR output independent of any client token.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::{Arc, Mutex};

use cookie::{Cookie, SameSite};
use time::OffsetDateTime;

use crate::config::StorageBackend;

/// Cookie and local-storage key holding the raw token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Get/set/clear of the raw bearer token.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    fn get(&self) -> Option<String>;
    /// Persist `token`; `expires_at` (epoch seconds) bounds its lifetime where the backend supports it.
    fn set(&self, token: &str, expires_at: u64);
    /// Forget the token. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// Build the store selected by configuration.
#[must_use]
pub fn store_for(backend: StorageBackend) -> Arc<dyn TokenStore> {
    match backend {
        StorageBackend::Cookie => Arc::new(CookieStore::for_current_origin()),
        StorageBackend::LocalStorage => Arc::new(LocalStorageStore),
    }
}

// =============================================================================
// COOKIE
// =============================================================================

/// `document.cookie` backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CookieStore {
    secure: bool,
}

impl CookieStore {
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Mark cookies `Secure` only when the page itself was served over HTTPS.
    #[must_use]
    pub fn for_current_origin() -> Self {
        #[cfg(feature = "hydrate")]
        {
            let secure = web_sys::window()
                .and_then(|w| w.location().protocol().ok())
                .is_some_and(|p| p == "https:");
            Self { secure }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self { secure: false }
        }
    }

    /// `Set-Cookie`-style string storing `token` until `expires_at`.
    #[must_use]
    pub fn set_cookie_string(&self, token: &str, expires_at: u64) -> String {
        let expires = i64::try_from(expires_at)
            .ok()
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        self.cookie(token.to_owned(), expires).to_string()
    }

    /// Cookie string that expires the token immediately.
    #[must_use]
    pub fn clear_cookie_string(&self) -> String {
        self.cookie(String::new(), OffsetDateTime::UNIX_EPOCH).to_string()
    }

    fn cookie(&self, value: String, expires: OffsetDateTime) -> Cookie<'static> {
        Cookie::build((ACCESS_TOKEN_KEY, value))
            .path("/")
            .expires(expires)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    #[cfg(feature = "hydrate")]
    fn document() -> Option<web_sys::HtmlDocument> {
        use wasm_bindgen::JsCast;
        web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
    }
}

/// Find the token in a `document.cookie` / `Cookie:` header string.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == ACCESS_TOKEN_KEY && !c.value().is_empty())
        .map(|c| c.value().to_owned())
}

impl TokenStore for CookieStore {
    fn get(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let raw = Self::document()?.cookie().ok()?;
            token_from_cookie_header(&raw)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn set(&self, token: &str, expires_at: u64) {
        let line = self.set_cookie_string(token, expires_at);
        #[cfg(feature = "hydrate")]
        {
            if let Some(doc) = Self::document() {
                let _ = doc.set_cookie(&line);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = line;
        }
    }

    fn clear(&self) {
        let line = self.clear_cookie_string();
        #[cfg(feature = "hydrate")]
        {
            if let Some(doc) = Self::document() {
                let _ = doc.set_cookie(&line);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = line;
        }
    }
}

// =============================================================================
// LOCAL STORAGE
// =============================================================================

/// `localStorage` backend. Expiry is enforced by claim checks, not storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenStore for LocalStorageStore {
    fn get(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .get_item(ACCESS_TOKEN_KEY)
                .ok()
                .flatten()
                .filter(|t| !t.is_empty())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn set(&self, token: &str, expires_at: u64) {
        let _ = expires_at;
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(ACCESS_TOKEN_KEY);
            }
        }
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process store for the SSR render pass and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn set(&self, token: &str, _expires_at: u64) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_owned());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}
