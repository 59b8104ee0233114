//! Command-line interface for logflare-reconcile
//!
//! # Usage Examples
//!
//! ## Sources
//! ```bash
//! # Validate a desired source without calling the API
//! logflare-reconcile source plan --state source.state.json --desired source.json
//!
//! # Create it, then refresh it later
//! logflare-reconcile source create --state source.state.json --desired source.json
//! logflare-reconcile source read --state source.state.json
//! ```
//!
//! ## Endpoints
//! ```bash
//! logflare-reconcile endpoint update \
//!   --state endpoint.state.json \
//!   --desired endpoint.json
//!
//! logflare-reconcile endpoint delete --state endpoint.state.json
//! ```
//!
//! ## Endpoint Queries
//! ```bash
//! LOGFLARE_ACCESS_TOKEN=... logflare-reconcile query errors-by-hour
//! ```
//!
//! Diagnostics are printed one per line as `<severity>: <summary>: <detail>`.

use clap::{Parser, Subcommand};
use logflare_client::HttpClient;
use logflare_model::{EndpointRecord, SourceRecord};
use logflare_reconcile::commands::{self, CommandReport};
use logflare_reconcile::{Action, ClientOpts};
use std::path::PathBuf;
use value_core::Diagnostics;

#[derive(Parser)]
#[command(name = "logflare-reconcile")]
#[command(about = "Reconcile Logflare sources and endpoints against local state files")]
#[command(long_about = None)]
struct Cli {
    /// Logflare API options
    #[command(flatten)]
    client: ClientOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a log source
    Source {
        /// Lifecycle operation to run
        #[arg(value_enum)]
        action: Action,

        /// State file holding the current record
        #[arg(long, value_name = "PATH")]
        state: PathBuf,

        /// Desired record (required for plan, create and update)
        #[arg(long, value_name = "PATH")]
        desired: Option<PathBuf>,
    },

    /// Manage a query endpoint
    Endpoint {
        /// Lifecycle operation to run
        #[arg(value_enum)]
        action: Action,

        /// State file holding the current record
        #[arg(long, value_name = "PATH")]
        state: PathBuf,

        /// Desired record (required for plan, create and update)
        #[arg(long, value_name = "PATH")]
        desired: Option<PathBuf>,
    },

    /// Run a saved endpoint and print its rows as JSON
    Query {
        /// Endpoint name or token
        name_or_token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.client.to_client_config()?;
    let client = HttpClient::new(&config)?;

    let diagnostics = match cli.command {
        Commands::Source {
            action,
            state,
            desired,
        } => {
            let report = commands::apply::<SourceRecord, _>(
                &client,
                action,
                &state,
                desired.as_deref(),
                SourceRecord::with_defaults,
            )
            .await?;
            print_report(&report);
            report.diagnostics
        }
        Commands::Endpoint {
            action,
            state,
            desired,
        } => {
            let report = commands::apply::<EndpointRecord, _>(
                &client,
                action,
                &state,
                desired.as_deref(),
                EndpointRecord::with_defaults,
            )
            .await?;
            print_report(&report);
            report.diagnostics
        }
        Commands::Query { name_or_token } => {
            let outcome = commands::query(&client, &name_or_token).await;
            if let Some(result) = &outcome.record.result {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json_values::encode(result))?
                );
            }
            outcome.diagnostics
        }
    };

    print_diagnostics(&diagnostics);
    if diagnostics.has_error() {
        anyhow::bail!("{} error(s) reported", diagnostics.error_count());
    }
    Ok(())
}

fn print_report(report: &CommandReport) {
    if !report.drift.is_empty() {
        println!("drifted: {}", report.drift.join(", "));
    }
    println!("state: {}", report.state);
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for diag in diagnostics {
        eprintln!("{diag}");
    }
}
