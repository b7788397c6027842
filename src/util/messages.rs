//! Human-readable text for failed calls.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use crate::net::error::ApiError;

/// Text shown to the user for an HTTP status.
#[must_use]
pub fn describe(status: Option<u16>) -> String {
    let text = match status {
        Some(401) => "Authorization error",
        Some(403) => "Access denied.\nYou may not have sufficient rights to perform this operation",
        Some(404) => "Nothing found",
        Some(409) => "A conflict occurred, this content may already exist",
        Some(500) => "Unknown server-side error",
        other => return format!("Unknown error with code {}", other.map_or(-1, i32::from)),
    };
    text.to_owned()
}

/// [`describe`] for a gateway error.
#[must_use]
pub fn describe_error(error: &ApiError) -> String {
    describe(error.status)
}
