//! HTTP transport seam under the gateway.
//!
//! The gateway builds an [`ApiRequest`] and hands it to a [`Transport`]; the
//! browser implementation sends it with `gloo-net`. Tests substitute a queue
//! of canned responses.

use super::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// A file part for multipart uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(FilePart),
}

/// Fully prepared request: absolute URL and final header set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// First header value matching `name` case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body bytes of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends prepared requests. Futures are not `Send`: browser fetch is single-threaded.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// Send `request` and collect the whole response.
    ///
    /// # Errors
    ///
    /// Returns a network-kind [`ApiError`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// `fetch`-backed transport via `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::{Method as HttpMethod, RequestBuilder};

            let method = match request.method {
                Method::Get => HttpMethod::GET,
                Method::Post => HttpMethod::POST,
                Method::Patch => HttpMethod::PATCH,
                Method::Delete => HttpMethod::DELETE,
            };
            let mut builder = RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match request.body {
                RequestBody::Empty => builder.build(),
                RequestBody::Json(json) => builder.body(json),
                RequestBody::Multipart(part) => builder.body(form_data(&part)?),
            }
            .map_err(|e| ApiError::network(e.to_string()))?;

            let resp = prepared.send().await.map_err(|e| ApiError::network(e.to_string()))?;
            let status = resp.status();
            let body = resp.binary().await.unwrap_or_default();
            Ok(RawResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::network("not available on server"))
        }
    }
}

#[cfg(feature = "hydrate")]
fn form_data(part: &FilePart) -> Result<web_sys::FormData, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::network(format!("form data: {e:?}"));

    let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    if let Some(mime) = &part.mime {
        options.set_type(mime);
    }
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;
    let form = web_sys::FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename(&part.field, &blob, &part.file_name)
        .map_err(js_err)?;
    Ok(form)
}
