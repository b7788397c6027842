//! Shared wire DTOs for the client/API boundary.
//!
//! DESIGN
//! ======
//! These types mirror the JSON the records API emits so serde stays the only
//! place where field names are translated. Anything identity-related that
//! the client derives on its own (claims, session) lives in `util::token`
//! and `state::session` instead.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ROLES
// =============================================================================

/// Permission level, ordered `Watcher < Editor < Admin`.
///
/// The issuer is inconsistent about casing (`"watcher"`, `"Editor"`), so
/// parsing is case-insensitive and unknown values fall back to the lowest
/// rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Watcher,
    Editor,
    Admin,
}

impl Role {
    /// Every role, lowest rank first.
    pub const ALL: [Role; 3] = [Role::Watcher, Role::Editor, Role::Admin];

    /// Position in the total order used for "at least as privileged as" checks.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Watcher => 0,
            Self::Editor => 1,
            Self::Admin => 2,
        }
    }

    /// Parse a role name, falling back to [`Role::Watcher`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "editor" => Self::Editor,
            _ => Self::Watcher,
        }
    }

    /// Canonical lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watcher => "watcher",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Human label for role pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Watcher => "Reader",
            Self::Editor => "Editor",
            Self::Admin => "Administrator",
        }
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// An authenticated user as returned by `GET /me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier (matches the token `sub` claim).
    pub id: String,
    /// Login name.
    pub username: String,
    /// Permission level.
    pub role: Role,
    /// Username of the administrator who created this account, if known.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Base64 record-signing public key, once a keypair has been generated.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// Body of `POST /login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Canonical response of `POST /login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

/// Structured error body the API returns on non-2xx responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// =============================================================================
// RESOURCES
// =============================================================================

/// Body of `POST /users/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// A person record. The API owns the shape; the client only round-trips it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Record id; the database emits either a plain string or a record-link object.
    pub id: serde_json::Value,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub birthday: String,
    pub city: String,
    pub intented_address: String,
    pub summary: String,
    pub past: String,
    pub traits_good: String,
    pub traits_bad: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Body of person create/update calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePersonRecord {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub birthday: String,
    pub city: String,
    pub intented_address: String,
    pub summary: String,
    pub past: String,
    pub traits_good: String,
    pub traits_bad: String,
    pub avatar: Option<String>,
    pub media: Vec<String>,
}

/// Image types accepted by `POST /upload`.
pub const ACCEPTABLE_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
