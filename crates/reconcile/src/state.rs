//! Lifecycle states of a managed resource instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use value_core::Diagnostic;

/// Where a resource instance stands relative to the remote service.
///
/// `Drifted` is observed rather than stored: a read that finds changed
/// server-owned fields reports them in [`Outcome::drift`](crate::Outcome) and
/// the instance it started from was `Drifted`. The refreshed record matches
/// the server again, so the read itself ends in `Live`. A persisted `Drifted`
/// state is accepted wherever `Live` is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Absent,
    Planned,
    Live,
    Drifted,
    Destroyed,
}

impl LifecycleState {
    /// State the instance was in before a read that found `drift`.
    pub fn before_read(self, drift: &[&str]) -> Self {
        match self {
            Self::Live if !drift.is_empty() => Self::Drifted,
            other => other,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::Planned => "planned",
            Self::Live => "live",
            Self::Drifted => "drifted",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Plan,
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// State reached when `op` succeeds from `from`, or `None` if `op` is not
/// allowed there.
pub fn transition(from: LifecycleState, op: Operation) -> Option<LifecycleState> {
    use LifecycleState::*;

    match (op, from) {
        (Operation::Plan, Absent | Planned) => Some(Planned),
        (Operation::Create, Absent | Planned) => Some(Live),
        (Operation::Read, Live | Drifted) => Some(Live),
        (Operation::Update, Live | Drifted) => Some(Live),
        (Operation::Delete, Live | Drifted) => Some(Destroyed),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {op} a {kind} that is {from}")]
pub struct IllegalTransition {
    pub op: Operation,
    pub kind: &'static str,
    pub from: LifecycleState,
}

impl From<IllegalTransition> for Diagnostic {
    fn from(err: IllegalTransition) -> Self {
        Diagnostic::error("Invalid Lifecycle Transition", err.to_string())
    }
}
