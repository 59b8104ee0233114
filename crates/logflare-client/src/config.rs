//! Client configuration, built once and shared read-only by every operation.

use crate::error::ConfigError;
use logflare_model::Sensitive;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://logflare.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub access_token: Sensitive<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Validate the host and token. An empty token is treated as missing.
    pub fn new(host: impl Into<String>, access_token: Option<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        let access_token = access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingAccessToken)?;

        let url = Url::parse(&host).map_err(|e| ConfigError::InvalidHost {
            host: host.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidHost {
                reason: format!("unsupported scheme '{}'", url.scheme()),
                host,
            });
        }

        Ok(Self {
            host,
            access_token: Sensitive::new(access_token),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
