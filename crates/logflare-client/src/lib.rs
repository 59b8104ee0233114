//! Client for the Logflare management API.
//!
//! [`LogflareApi`] is the seam the reconciler calls through; [`HttpClient`]
//! implements it over `reqwest` with bearer authentication.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{ApiResponse, LogflareApi};
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use error::{ConfigError, TransportError};
pub use http::HttpClient;
