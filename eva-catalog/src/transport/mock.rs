//! Scripted in-process transport for unit tests.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use serde_json::Value;

use super::{RequestContext, Transport, TransportResponse, sealed};
use crate::{
    error::{PluginError, Result},
    eva::HeaderMap,
};

/// One call seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Replays queued responses in order and records every request.
///
/// A call with nothing queued fails with a transport error.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl sealed::private::Sealed for MockTransport {}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &Value) -> Self {
        self.respond_raw(status, body.to_string().into_bytes())
    }

    pub(crate) fn respond_raw(self, status: u16, body: Vec<u8>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason());
        self.push(Ok(TransportResponse { status, reason, body }))
    }

    pub(crate) fn fail(self, error: PluginError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<TransportResponse>) -> Self {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Transport for MockTransport {
    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse> {
        let body = serde_json::from_slice(body).unwrap_or(Value::Null);
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedRequest {
            url: ctx.url.to_owned(),
            headers: ctx.headers.clone(),
            body,
        });

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(PluginError::TransportError("no response queued".to_owned())))
    }

    fn protocol_name(&self) -> &'static str {
        "mock"
    }
}
