//! Shared fixtures for unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use serde_json::json;

use crate::net::api::ApiGateway;
use crate::net::error::ApiError;
use crate::net::transport::{ApiRequest, RawResponse, Transport};
use crate::util::token::encode_test_token;
use crate::util::token_store::{MemoryStore, TokenStore};

/// Transport that replays queued outcomes and records every request.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<Vec<Result<RawResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    /// Suspend once before answering, so concurrent callers interleave.
    yields: bool,
}

impl MockTransport {
    pub(crate) fn new(responses: Vec<Result<RawResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses), requests: Mutex::new(Vec::new()), yields: false })
    }

    pub(crate) fn yielding(responses: Vec<Result<RawResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses), requests: Mutex::new(Vec::new()), yields: true })
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        if self.yields {
            YieldOnce(false).await;
        }
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(ApiError::network("no canned response"))
        } else {
            responses.remove(0)
        }
    }
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub(crate) fn respond(status: u16, body: &str) -> Result<RawResponse, ApiError> {
    Ok(RawResponse { status, body: body.as_bytes().to_vec() })
}

pub(crate) fn user_json(role: &str) -> String {
    json!({ "id": "u1", "username": "anna", "role": role }).to_string()
}

/// Unsigned token for user `u1`/`anna`.
pub(crate) fn token(role: &str, exp: u64) -> String {
    encode_test_token(&json!({ "sub": "u1", "username": "anna", "role": role, "exp": exp }))
}

/// Far enough in the future for any test run.
pub(crate) const FAR_FUTURE: u64 = 4_102_444_800;

pub(crate) fn gateway(
    store: &Arc<MemoryStore>,
    responses: Vec<Result<RawResponse, ApiError>>,
) -> (ApiGateway, Arc<MockTransport>) {
    let transport = MockTransport::new(responses);
    let tokens: Arc<dyn TokenStore> = store.clone();
    (ApiGateway::new("http://api.test", transport.clone(), tokens), transport)
}
