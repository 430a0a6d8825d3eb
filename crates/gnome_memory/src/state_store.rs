//! Single-record JSON snapshot store for the hibernation ledger.
//!
//! `save` writes to a temp file in the same directory and renames it over
//! the target, so `load` can never observe a partial record. Anything
//! unreadable — missing file, torn history, schema drift — loads as absent.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gnome_core::{PersistedState, StateStore};
use std::path::{Path, PathBuf};

pub struct JsonStateStore {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl JsonStateStore {
    /// Open (creating the directory if needed) the ledger at `dir/state.json`.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;
        Ok(Self {
            path: dir.join("state.json"),
            tmp_path: dir.join("state.json.tmp"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Option<PersistedState> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read state file {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(
                    "Malformed state file {}, treating as absent: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        let json =
            serde_json::to_string_pretty(state).context("Failed to serialize persisted state")?;
        tokio::fs::write(&self.tmp_path, json.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", self.tmp_path.display()))?;
        tokio::fs::rename(&self.tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
