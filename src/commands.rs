//! Lifecycle commands run against a state file.

use crate::state_file::{read_desired, StateFile};
use crate::Action;
use anyhow::Context;
use logflare_client::LogflareApi;
use logflare_model::{EndpointQueryRecord, ResourceModel};
use reconcile::{LifecycleState, Outcome, QueryOutcome, Reconciler};
use std::path::Path;
use tracing::info;
use value_core::Diagnostics;

/// What a lifecycle command did.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    pub state: LifecycleState,
    pub diagnostics: Diagnostics,
    pub drift: Vec<&'static str>,
}

/// Run one lifecycle action for a resource kind.
///
/// The current record and state come from `state_path`; a missing file means
/// `Absent`. `desired_path` is read for plan, create and update, and
/// `defaults` fills schema defaults into the desired record. The state file
/// is only rewritten when the operation produced no error, and is removed
/// once the resource is destroyed.
pub async fn apply<R, A>(
    api: &A,
    action: Action,
    state_path: &Path,
    desired_path: Option<&Path>,
    defaults: fn(R) -> R,
) -> anyhow::Result<CommandReport>
where
    R: ResourceModel,
    A: LogflareApi + ?Sized,
{
    let current = StateFile::load(state_path)?;
    let (state, record) = match &current {
        Some(file) => (file.state, Some(file.parse::<R>()?)),
        None => (LifecycleState::Absent, None),
    };
    let op = reconcile::Operation::from(action);
    let desired = || -> anyhow::Result<R> {
        let path = desired_path.with_context(|| format!("--desired is required to {op}"))?;
        Ok(defaults(read_desired(path)?))
    };
    let existing = || -> anyhow::Result<R> {
        record.clone().with_context(|| {
            format!(
                "No {} state at {}, nothing to {}",
                R::KIND.name(),
                state_path.display(),
                op
            )
        })
    };

    let reconciler = Reconciler::new(api);
    let outcome: Outcome<R> = match action {
        Action::Plan => reconciler.plan(state, desired()?),
        Action::Create => reconciler.create(state, desired()?).await,
        Action::Read => reconciler.read(state, existing()?).await,
        Action::Update => reconciler.update(state, existing()?, desired()?).await,
        Action::Delete => reconciler.delete(state, existing()?).await,
    };

    if outcome.is_success() {
        persist(state_path, &outcome)?;
    }

    Ok(CommandReport {
        state: outcome.state,
        diagnostics: outcome.diagnostics,
        drift: outcome.drift,
    })
}

/// Run a saved endpoint by name or token.
pub async fn query<A: LogflareApi + ?Sized>(api: &A, name_or_token: &str) -> QueryOutcome {
    Reconciler::new(api)
        .query(EndpointQueryRecord::new(name_or_token))
        .await
}

fn persist<R: ResourceModel>(path: &Path, outcome: &Outcome<R>) -> anyhow::Result<()> {
    if outcome.state == LifecycleState::Destroyed {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove state file {}", path.display()))?;
        }
        info!(kind = %R::KIND, path = %path.display(), "State file removed");
        return Ok(());
    }

    StateFile::new(&outcome.record, outcome.state)?.save(path)?;
    info!(kind = %R::KIND, state = %outcome.state, path = %path.display(), "State file written");
    Ok(())
}
