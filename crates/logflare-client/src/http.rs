//! `reqwest` implementation of [`LogflareApi`].

use crate::api::{ApiResponse, LogflareApi};
use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use logflare_model::{ResourceKind, Sensitive};
use reqwest::{Client, Method, Url};

/// HTTP client for the Logflare management API.
///
/// Routes:
///
/// - `POST   /api/{collection}`
/// - `GET    /api/{collection}/{token}`
/// - `PUT    /api/{collection}/{token}`
/// - `DELETE /api/{collection}/{token}`
/// - `GET    /api/endpoints/query/{name_or_token}`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    access_token: Sensitive<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.host).map_err(|e| ConfigError::InvalidHost {
            host: config.host.clone(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            client,
            base,
            access_token: config.access_token.clone(),
        })
    }

    // Segments are percent-encoded by the URL builder.
    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidBaseUrl)?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        route: &str,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, TransportError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(self.access_token.expose());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(%method, route, status, "Logflare API call completed");

        Ok(ApiResponse { status, body })
    }
}

#[async_trait::async_trait]
impl LogflareApi for HttpClient {
    async fn create(
        &self,
        kind: ResourceKind,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.url(&[kind.collection()])?;
        self.send(Method::POST, kind.collection(), url, Some(body))
            .await
    }

    async fn show(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError> {
        let url = self.url(&[kind.collection(), token])?;
        self.send(Method::GET, kind.collection(), url, None).await
    }

    async fn update(
        &self,
        kind: ResourceKind,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.url(&[kind.collection(), token])?;
        self.send(Method::PUT, kind.collection(), url, Some(body))
            .await
    }

    async fn delete(&self, kind: ResourceKind, token: &str) -> Result<ApiResponse, TransportError> {
        let url = self.url(&[kind.collection(), token])?;
        self.send(Method::DELETE, kind.collection(), url, None)
            .await
    }

    async fn query(&self, name_or_token: &str) -> Result<ApiResponse, TransportError> {
        let url = self.url(&["endpoints", "query", name_or_token])?;
        self.send(Method::GET, "endpoints/query", url, None).await
    }
}
