//! Typed endpoint wrappers over [`ApiGateway`].
//!
//! Each service is a thin borrow of the gateway so pages can build one on
//! the spot from context.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use super::api::{ApiGateway, decode_body};
use super::error::{ApiError, ApiErrorKind};
use super::transport::{Method, RequestBody};
use super::types::{
    ACCEPTABLE_MEDIA_TYPES, CreatePersonRecord, CreateUser, LoginRequest, LoginResponse, PersonRecord, User,
};
use crate::state::auth::AuthSession;

/// Prefix marking a media reference stored on the server.
pub const SERVER_MEDIA_PREFIX: &str = "@/";

// =============================================================================
// AUTH
// =============================================================================

pub struct AuthService<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> AuthService<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a token, store it and confirm the identity.
    ///
    /// # Errors
    ///
    /// Gateway errors from `POST /login` pass through. A token that does not
    /// decode, or an identity check that fails afterwards, reports
    /// "Error loading logged user data".
    pub async fn login(&self, session: &AuthSession, credentials: &LoginRequest, now: u64) -> Result<User, ApiError> {
        let response: LoginResponse = self.gateway.post("/login", credentials).await?;
        if !response.token_type.eq_ignore_ascii_case("bearer") {
            log::warn!("login: unexpected token type {}", response.token_type);
        }
        session
            .set_token(&response.token, now)
            .map_err(|e| ApiError::decode(200, format!("login token: {e}")))?;
        session.confirm(self.gateway).await.map_err(|e| ApiError {
            message: "Error loading logged user data".to_owned(),
            ..e
        })
    }

    /// Generate a signing keypair; returns the private key, which the server
    /// does not keep.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::execute`].
    pub async fn signature_keygen(&self) -> Result<String, ApiError> {
        let resp = self.gateway.execute(Method::Post, "/signature-keygen", RequestBody::Empty).await?;
        decode_body(&resp)
    }

    /// Drop the current user's signing key.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::execute`].
    pub async fn signature_reset(&self) -> Result<(), ApiError> {
        self.gateway.execute(Method::Delete, "/signature-reset", RequestBody::Empty).await?;
        Ok(())
    }
}

// =============================================================================
// PERSONS
// =============================================================================

pub struct PersonService<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> PersonService<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn list(&self) -> Result<Vec<PersonRecord>, ApiError> {
        self.gateway.get("/persons").await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn get(&self, id: &str) -> Result<PersonRecord, ApiError> {
        self.gateway.get(&format!("/persons/{id}")).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::post`].
    pub async fn create(&self, record: &CreatePersonRecord) -> Result<PersonRecord, ApiError> {
        self.gateway.post("/persons/create", record).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::patch`].
    pub async fn update(&self, id: &str, record: &CreatePersonRecord) -> Result<PersonRecord, ApiError> {
        self.gateway.patch(&format!("/persons/{id}"), record).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::delete`].
    pub async fn delete(&self, id: &str) -> Result<PersonRecord, ApiError> {
        self.gateway.delete(&format!("/persons/{id}")).await
    }
}

// =============================================================================
// USERS
// =============================================================================

pub struct UserService<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> UserService<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.gateway.get("/users").await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::post`].
    pub async fn create(&self, user: &CreateUser) -> Result<User, ApiError> {
        self.gateway.post("/users/create", user).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::delete`].
    pub async fn delete(&self, username: &str) -> Result<User, ApiError> {
        self.gateway.delete(&format!("/users/{username}")).await
    }
}

// =============================================================================
// MEDIA
// =============================================================================

pub struct MediaService<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> MediaService<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Upload a file and return its server reference (`@/<hash>`).
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::upload`]. A declared type outside
    /// [`ACCEPTABLE_MEDIA_TYPES`] is rejected before sending; an empty hash
    /// is a decode error.
    pub async fn upload(&self, file_name: &str, mime: Option<&str>, bytes: Vec<u8>) -> Result<String, ApiError> {
        if let Some(mime) = mime.filter(|m| !ACCEPTABLE_MEDIA_TYPES.contains(m)) {
            return Err(ApiError {
                kind: ApiErrorKind::Rejected,
                status: None,
                code: None,
                message: format!("unsupported media type {mime}"),
            });
        }
        let hash = self.gateway.upload(file_name, mime, bytes).await?;
        let hash = hash.trim();
        if hash.is_empty() {
            return Err(ApiError::decode(200, "upload returned no content hash"));
        }
        Ok(format!("{SERVER_MEDIA_PREFIX}{hash}"))
    }

    /// Displayable URL for a media reference.
    ///
    /// Server references (`@/<hash>`) are fetched through the gateway so the
    /// bearer token goes along; other references pass through untouched.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::execute`].
    pub async fn get(&self, reference: &str) -> Result<String, ApiError> {
        let Some(hash) = reference.strip_prefix(SERVER_MEDIA_PREFIX) else {
            return Ok(reference.to_owned());
        };
        let bytes = self.get_bytes(hash).await?;
        object_url(&bytes)
    }

    /// Raw bytes of a stored media file.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::execute`].
    pub async fn get_bytes(&self, hash: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.gateway.execute(Method::Get, &format!("/media/{hash}"), RequestBody::Empty).await?;
        Ok(resp.body)
    }
}

/// Blob URL owned by the page; the browser keeps it alive until unload.
#[cfg(feature = "hydrate")]
fn object_url(bytes: &[u8]) -> Result<String, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::decode(200, format!("media blob: {e:?}"));

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts).map_err(js_err)?;
    web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)
}

#[cfg(not(feature = "hydrate"))]
#[allow(clippy::unnecessary_wraps)]
fn object_url(bytes: &[u8]) -> Result<String, ApiError> {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    Ok(format!("data:application/octet-stream;base64,{}", STANDARD.encode(bytes)))
}
