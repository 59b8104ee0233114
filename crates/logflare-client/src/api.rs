//! The outbound call seam used by the reconciler.

use crate::error::TransportError;
use logflare_model::ResourceKind;
use serde::de::DeserializeOwned;

/// Status and raw body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body carries anything besides whitespace.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Calls against the Logflare management API.
///
/// One method call issues exactly one request. Implementations are shared
/// across concurrent operations and hold no mutable state.
#[async_trait::async_trait]
pub trait LogflareApi: Send + Sync {
    async fn create(
        &self,
        kind: ResourceKind,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError>;

    async fn show(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError>;

    /// Whole-resource replace.
    async fn update(
        &self,
        kind: ResourceKind,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError>;

    async fn delete(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError>;

    /// Run a saved endpoint by name or token.
    async fn query(&self, name_or_token: &str) -> Result<ApiResponse, TransportError>;
}
