//! Durable event log: one JSON object per line, append-only.
//!
//! Writers open the file in append mode per call, so a store never blocks
//! readers and the log needs no in-process coordination. Malformed lines are
//! skipped with a warning; a half-written tail line therefore costs one
//! record, never the log.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use gnome_core::{
    EventType, LongTermMemoryStore, LongTermRecord, MemoryStats, SessionSummary, SummaryError,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub struct JsonlMemoryStore {
    path: PathBuf,
}

impl JsonlMemoryStore {
    /// Open (creating the directory if needed) the log at `dir/memories.jsonl`.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create memory directory {}", dir.display()))?;
        Ok(Self {
            path: dir.join("memories.jsonl"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<LongTermRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let mut records: Vec<LongTermRecord> = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed memory line {} in {}: {}",
                        lineno + 1,
                        self.path.display(),
                        e
                    );
                }
            }
        }
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }
}

#[async_trait]
impl LongTermMemoryStore for JsonlMemoryStore {
    async fn store(&self, record: &LongTermRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("Failed to serialize memory")?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {} for append", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }

    async fn get_recent(&self, n: usize) -> Result<Vec<LongTermRecord>> {
        let records = self.read_all().await?;
        let skip = records.len().saturating_sub(n);
        Ok(records.into_iter().skip(skip).collect())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LongTermRecord>> {
        let needle = query.to_lowercase();
        let records = self.read_all().await?;
        // Most recent matches first.
        Ok(records
            .into_iter()
            .rev()
            .filter(|r| r.observation.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    async fn get_stats(&self) -> Result<MemoryStats> {
        let records = self.read_all().await?;
        Ok(MemoryStats {
            total_records: records.len(),
            oldest: records.first().map(|r| r.timestamp),
            newest: records.last().map(|r| r.timestamp),
        })
    }

    async fn get_session_summary(&self) -> Result<SessionSummary> {
        let records = self.read_all().await?;
        let start_time = records
            .iter()
            .rev()
            .find(|r| r.event_type == EventType::Startup)
            .map(|r| r.timestamp)
            .ok_or(SummaryError::NoStartupFound)?;

        let session: Vec<&LongTermRecord> =
            records.iter().filter(|r| r.timestamp >= start_time).collect();

        let mut event_counts: HashMap<EventType, usize> = HashMap::new();
        for record in &session {
            *event_counts.entry(record.event_type).or_insert(0) += 1;
        }

        // `session` is non-empty: it contains at least the startup record.
        let last = session[session.len() - 1];
        let end_time = if last.event_type == EventType::Shutdown {
            last.timestamp
        } else {
            Utc::now()
        };

        Ok(SessionSummary {
            start_time,
            end_time,
            duration_secs: (end_time - start_time).num_milliseconds() as f64 / 1000.0,
            total_records: session.len(),
            event_counts,
            final_state: last.state.clone(),
        })
    }
}
