//! Gateway error taxonomy.
//!
//! Every failed remote call surfaces as one [`ApiError`]. It is built only at
//! the transport boundary, from the response status and body that came back.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;

/// Classification of a failed remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401. Drives a session clear.
    AuthRequired,
    /// 403.
    Forbidden,
    /// 404.
    NotFound,
    /// 409.
    Conflict,
    /// 5xx.
    ServerFault,
    /// Any other non-2xx status.
    Rejected,
    /// The request never produced a response.
    NetworkFailure,
    /// A body that could not be serialized or did not match the expected shape.
    Decode,
}

impl ApiErrorKind {
    /// Kind for a non-2xx status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthRequired,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500..=599 => Self::ServerFault,
            _ => Self::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    /// 401, independent of whatever body came with it.
    #[must_use]
    pub fn auth_required() -> Self {
        Self {
            kind: ApiErrorKind::AuthRequired,
            status: Some(401),
            code: None,
            message: "Authentication required".to_owned(),
        }
    }

    /// Non-2xx response. Uses the structured body when it parses.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if status == 401 {
            return Self::auth_required();
        }
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        Self {
            kind: ApiErrorKind::from_status(status),
            status: Some(status),
            code: parsed.code,
            message: parsed
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP Error {status}")),
        }
    }

    /// Transport-level rejection; no response was received.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::NetworkFailure, status: None, code: None, message: message.into() }
    }

    /// A successful response whose body could not be read as the expected type.
    #[must_use]
    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Decode, status: Some(status), code: None, message: message.into() }
    }

    /// A request body that could not be serialized; nothing was sent.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Decode, status: None, code: None, message: message.into() }
    }

    #[must_use]
    pub fn is_auth_required(&self) -> bool {
        self.kind == ApiErrorKind::AuthRequired
    }
}
