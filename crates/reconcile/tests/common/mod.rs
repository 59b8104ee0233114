//! In-memory `LogflareApi` that replays queued responses and records calls.

#![allow(dead_code)]

use logflare_client::{ApiResponse, ClientConfig, HttpClient, LogflareApi, TransportError};
use logflare_model::ResourceKind;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub kind: Option<ResourceKind>,
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a call that fails before any response arrives.
    pub fn fail(self, err: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
        self.respond(status, body.to_string())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(
        &self,
        method: &'static str,
        kind: Option<ResourceKind>,
        token: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            method,
            kind,
            token: token.map(str::to_string),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no response queued for call")
    }
}

/// A real connection failure: nothing listens on the discard port.
pub async fn connection_refused() -> TransportError {
    let config = ClientConfig::new("http://127.0.0.1:9", Some("access".to_string())).unwrap();
    HttpClient::new(&config)
        .unwrap()
        .show(ResourceKind::Source, "tok-1")
        .await
        .unwrap_err()
}

#[async_trait::async_trait]
impl LogflareApi for FakeApi {
    async fn create(
        &self,
        kind: ResourceKind,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        self.record("POST", Some(kind), None, Some(body))
    }

    async fn show(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError> {
        self.record("GET", Some(kind), Some(token), None)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        self.record("PUT", Some(kind), Some(token), Some(body))
    }

    async fn delete(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError> {
        self.record("DELETE", Some(kind), Some(token), None)
    }

    async fn query(&self, name_or_token: &str) -> Result<ApiResponse, TransportError> {
        self.record("QUERY", None, Some(name_or_token), None)
    }
}
