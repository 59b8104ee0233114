//! Logflare reconciler library
//!
//! Drives Logflare sources and endpoints through a create/read/update/delete
//! lifecycle, keeping a local JSON state file in step with the server.
//!
//! # Crates
//!
//! - `value_core` - typed value model and diagnostics
//! - `json_values` - conversion between raw JSON and typed values
//! - `logflare_model` - source, endpoint and endpoint query records
//! - `logflare_client` - the Logflare management API client
//! - `reconcile` - the lifecycle state machine
//!
//! # CLI Usage
//!
//! ```bash
//! # Create a source from a desired record
//! logflare-reconcile source create --state source.state.json --desired source.json
//!
//! # Refresh server-owned fields and report drift
//! logflare-reconcile source read --state source.state.json
//!
//! # Replace an endpoint with a new desired record
//! logflare-reconcile endpoint update --state endpoint.state.json --desired endpoint.json
//!
//! # Run a saved endpoint
//! logflare-reconcile query errors-by-hour
//! ```

use clap::{Parser, ValueEnum};
use logflare_client::{ClientConfig, DEFAULT_HOST};
use std::time::Duration;

pub mod commands;
pub mod config;
pub mod state_file;

#[derive(Parser, Clone)]
pub struct ClientOpts {
    /// Logflare host URL
    #[arg(long, default_value = DEFAULT_HOST, env = "LOGFLARE_HOST")]
    pub host: String,

    /// Logflare management API access token
    #[arg(long, env = "LOGFLARE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Request timeout (e.g. "30s", "2m" or plain seconds)
    #[arg(long, default_value = "30s", value_parser = config::parse_duration)]
    pub timeout: Duration,
}

impl ClientOpts {
    /// Build the client configuration, failing when no access token is set.
    pub fn to_client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig::new(self.host.clone(), self.access_token.clone())?;
        Ok(config.with_timeout(self.timeout))
    }
}

/// Lifecycle operation requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Plan,
    Create,
    Read,
    Update,
    Delete,
}

impl From<Action> for reconcile::Operation {
    fn from(action: Action) -> Self {
        match action {
            Action::Plan => Self::Plan,
            Action::Create => Self::Create,
            Action::Read => Self::Read,
            Action::Update => Self::Update,
            Action::Delete => Self::Delete,
        }
    }
}
