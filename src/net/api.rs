//! API gateway: the one place remote calls go through.
//!
//! Client-side (hydrate): requests go out via `gloo-net` (see `transport`).
//! Server-side (SSR): the browser transport answers with a network error,
//! so SSR renders the anonymous view and hydration does the real work.
//!
//! ERROR HANDLING
//! ==============
//! Responses are classified in a fixed order: 401 first (body ignored), then
//! any other non-2xx (structured body if it parses), then the typed success
//! body. A 401 also fires the auth-required hook, which the app wires to a
//! session clear, so no caller has to remember to do it. The hook only fires
//! while storage still holds the token the request was sent with; a 401 for
//! a token that has since been replaced says nothing about the new one.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{ApiRequest, FilePart, Method, RawResponse, RequestBody, Transport};
use super::types::User;
use crate::util::token_store::TokenStore;

/// Multipart field name `POST /upload` expects.
pub const UPLOAD_FIELD: &str = "photo";

type AuthRequiredHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct ApiGateway {
    base_url: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    on_auth_required: Option<AuthRequiredHook>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .field("on_auth_required", &self.on_auth_required.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { base_url: base_url.into(), transport, tokens, on_auth_required: None }
    }

    /// Install the callback fired on a 401 for the currently stored token.
    #[must_use]
    pub fn with_auth_required_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_auth_required = Some(Arc::new(hook));
        self
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }

    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Assemble headers for a request: bearer token always, JSON content type
    /// only for non-multipart bodies.
    fn prepare(&self, method: Method, endpoint: &str, body: RequestBody, token: Option<&str>) -> ApiRequest {
        let mut headers = Vec::with_capacity(2);
        if !matches!(body, RequestBody::Multipart(_)) {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        ApiRequest { method, url: self.url(endpoint), headers, body }
    }

    /// Send and classify, returning the raw success response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures and non-2xx statuses.
    pub async fn execute(&self, method: Method, endpoint: &str, body: RequestBody) -> Result<RawResponse, ApiError> {
        let sent_with = self.tokens.get();
        let request = self.prepare(method, endpoint, body, sent_with.as_deref());
        let outcome = match self.transport.send(request).await {
            Ok(resp) => classify_status(resp),
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            if e.is_auth_required() {
                if self.tokens.get() == sent_with {
                    log::warn!("{endpoint}: authentication required, clearing session");
                    if let Some(hook) = &self.on_auth_required {
                        hook();
                    }
                } else {
                    log::debug!("{endpoint}: 401 for a replaced token ignored");
                }
            } else {
                log::debug!("{endpoint}: {e}");
            }
        }
        outcome
    }

    async fn request<T: DeserializeOwned>(&self, method: Method, endpoint: &str, body: RequestBody) -> Result<T, ApiError> {
        let resp = self.execute(method, endpoint, body).await?;
        decode_body(&resp)
    }

    /// # Errors
    ///
    /// See [`ApiGateway::execute`]; also fails on an undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::Get, endpoint, RequestBody::Empty).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, data: &B) -> Result<T, ApiError> {
        self.request(Method::Post, endpoint, json_body(data)?).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, data: &B) -> Result<T, ApiError> {
        self.request(Method::Patch, endpoint, json_body(data)?).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::Delete, endpoint, RequestBody::Empty).await
    }

    /// Upload one file as multipart field `photo`; returns the content hash.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn upload(&self, file_name: &str, mime: Option<&str>, bytes: Vec<u8>) -> Result<String, ApiError> {
        let part = FilePart {
            field: UPLOAD_FIELD.to_owned(),
            file_name: file_name.to_owned(),
            mime: mime.map(str::to_owned),
            bytes,
        };
        self.request(Method::Post, "/upload", RequestBody::Multipart(part)).await
    }

    /// Identity check: `GET /me`.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::get`].
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/me").await
    }
}

/// Classify a received response by status.
///
/// # Errors
///
/// 401 becomes [`ApiError::auth_required`]; any other non-2xx becomes
/// [`ApiError::from_response`].
pub fn classify_status(resp: RawResponse) -> Result<RawResponse, ApiError> {
    if (200..300).contains(&resp.status) {
        Ok(resp)
    } else {
        Err(ApiError::from_response(resp.status, &resp.body))
    }
}

/// Parse a success body as `T`.
///
/// # Errors
///
/// Returns a decode-kind [`ApiError`] when the body does not match `T`.
pub fn decode_body<T: DeserializeOwned>(resp: &RawResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&resp.body).map_err(|e| ApiError::decode(resp.status, format!("invalid response body: {e}")))
}

fn json_body<B: Serialize>(data: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_string(data)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::serialization(format!("request body: {e}")))
}
