//! Bearer-token claim decoding and expiry checks.
//!
//! The client reads the payload segment of `header.payload.signature` for UX
//! decisions only. The signature is never checked here; the API verifies it
//! on every request.
//!
//! ERROR HANDLING
//! ==============
//! Decode failures never escape as panics. Public helpers degrade to
//! `Option`/`bool` so a garbled cookie reads the same as no cookie.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::net::types::{Role, User};

/// Base64url engine that accepts payloads with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Local token failures. Both are recovered to "logged out" by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
}

/// Decoded token payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    pub username: String,
    pub role: Role,
    /// Expiry in epoch seconds.
    #[serde(rename = "exp")]
    pub expiry: u64,
}

impl Claims {
    /// User fields the token carries, for display before `/me` answers.
    #[must_use]
    pub fn projected_user(&self) -> User {
        User {
            id: self.subject.clone(),
            username: self.username.clone(),
            role: self.role,
            created_by: None,
            public_key: None,
        }
    }
}

/// Decode the claims segment of `token`, reporting why it failed.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] unless the token has exactly three
/// dot-separated segments and the middle one is base64url-encoded JSON claims.
pub fn parse_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenError::Malformed);
    };
    if payload.is_empty() {
        return Err(TokenError::Malformed);
    }
    let bytes = PAYLOAD_ENGINE.decode(payload).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// Decode the claims segment of `token`; `None` on any malformed input.
#[must_use]
pub fn decode_claims(token: &str) -> Option<Claims> {
    parse_claims(token).ok()
}

/// True iff `now >= claims.expiry`. Absent claims count as expired.
#[must_use]
pub fn is_expired(claims: Option<&Claims>, now: u64) -> bool {
    claims.is_none_or(|c| now >= c.expiry)
}

/// Expiry check straight from a raw token; absent or undecodable is expired.
#[must_use]
pub fn is_token_expired(token: Option<&str>, now: u64) -> bool {
    is_expired(token.and_then(decode_claims).as_ref(), now)
}

/// Decode and require the token to be unexpired at `now`.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] or [`TokenError::Expired`].
pub fn valid_claims(token: &str, now: u64) -> Result<Claims, TokenError> {
    let claims = parse_claims(token)?;
    if is_expired(Some(&claims), now) {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Current time in epoch seconds.
#[must_use]
pub fn now_secs() -> u64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = (js_sys::Date::now() / 1000.0) as u64;
        secs
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

/// Encode a payload the way the issuer does. Test helper for building tokens.
#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = PAYLOAD_ENGINE.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = PAYLOAD_ENGINE.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
