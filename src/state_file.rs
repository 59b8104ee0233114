//! Persisted resource state.

use anyhow::Context;
use chrono::{DateTime, Utc};
use logflare_model::ResourceModel;
use reconcile::LifecycleState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// State file wrapper for one managed resource.
///
/// # File Format
///
/// ```json
/// {
///     "kind": "source",
///     "state": "live",
///     "record": {
///         "name": "my-cool-source",
///         "token": "0f1e2d3c-...",
///         "api_quota": 25
///     },
///     "updated_at": "2024-01-01T00:00:00Z"
/// }
/// ```
///
/// The record is stored in full, sensitive fields included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// Resource kind identifier ("source" or "endpoint")
    pub kind: String,
    pub state: LifecycleState,
    pub record: serde_json::Value,
    /// When this file was last written
    pub updated_at: DateTime<Utc>,
}

impl StateFile {
    pub fn new<R: ResourceModel>(record: &R, state: LifecycleState) -> anyhow::Result<Self> {
        Ok(Self {
            kind: R::KIND.name().to_string(),
            state,
            record: serde_json::to_value(record)?,
            updated_at: Utc::now(),
        })
    }

    /// Parse the stored record, checking it belongs to kind `R`.
    pub fn parse<R: ResourceModel>(&self) -> anyhow::Result<R> {
        if self.kind != R::KIND.name() {
            anyhow::bail!(
                "State file holds kind '{}', expected '{}'",
                self.kind,
                R::KIND.name()
            );
        }
        serde_json::from_value(self.record.clone())
            .with_context(|| format!("Failed to parse {} record from state file", self.kind))
    }

    /// Load a state file. A missing file means the resource was never created.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let file = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;
        Ok(Some(file))
    }

    /// Write the file atomically next to its final location.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.persist(path)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        Ok(())
    }
}

/// Read a desired record from a JSON file.
pub fn read_desired<R: DeserializeOwned>(path: &Path) -> anyhow::Result<R> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read desired record {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse desired record {}", path.display()))
}
