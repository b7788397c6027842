//! Role gate for privileged sections.
//!
//! Reads the role from unverified token claims, so it only decides what the
//! UI offers. The backend enforces the same rule on every call.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use crate::net::types::Role;
use crate::util::token::{self, Claims};

/// Allowed iff the claimed role ranks at or above `required`.
#[must_use]
pub fn authorize(claims: Option<&Claims>, required: Role) -> bool {
    claims.is_some_and(|c| c.role >= required)
}

/// Decode `token` and authorize. Absent or undecodable tokens are refused.
#[must_use]
pub fn authorize_token(token: Option<&str>, required: Role) -> bool {
    let claims = token.and_then(token::decode_claims);
    authorize(claims.as_ref(), required)
}
