//! Reconciliation of Logflare resources.
//!
//! A [`Reconciler`] takes the persisted lifecycle state and record of one
//! resource instance, issues at most one call through a [`LogflareApi`], and
//! returns the updated record together with the diagnostics of the
//! operation. It never persists anything itself.
//!
//! [`LogflareApi`]: logflare_client::LogflareApi

pub mod controller;
pub mod state;

pub use controller::{Outcome, QueryOutcome, Reconciler};
pub use state::{transition, IllegalTransition, LifecycleState, Operation};
