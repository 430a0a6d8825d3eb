//! # Autognome core
//!
//! Shared vocabulary of the autognome runtime:
//!
//! - The agent's transient state and the enums that describe it
//! - The `Action` variants a mind can request
//! - The per-tick `ActionContext` snapshot handed to the mind
//! - Durable record types (long-term log entries, the hibernation ledger)
//! - The narrow traits the agent core talks through: `Mind`, `Sensor`,
//!   `LongTermMemoryStore`, `StateStore`
//! - TOML configuration

pub mod action;
pub mod config;
pub mod context;
pub mod persist;
pub mod record;
pub mod state;

pub use action::{Action, ActionKind, ActionResult};
pub use config::{
    AutognomeConfig, ConfigError, CoreConfig, MemoryConfig, MindConfig, ObservationConfig,
    ObservationPrecedence, PersonalityConfig, RuntimeConfig,
};
pub use context::{ActionContext, ConversationTurn, PatternSummary, Role, StateView};
pub use persist::PersistedState;
pub use record::{
    EventType, LongTermRecord, MemoryStats, RecordContext, SessionSummary, StateSnapshot,
    SummaryError,
};
pub use state::{AgentState, EnergyTier, MindState, Mood};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Discrete environment reading produced by a [`Sensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightLevel {
    Light,
    Dark,
}

impl LightLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightLevel::Light => "light",
            LightLevel::Dark => "dark",
        }
    }
}

impl std::fmt::Display for LightLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single environment sensor. The core only ever reads it; simulation
/// harnesses may write through their own concrete type.
pub trait Sensor: Send + Sync {
    fn read(&self) -> LightLevel;
}

/// Pluggable decision strategy.
///
/// `think` failures (errors or budget expiry) degrade to an empty action
/// list at the call site; `reflect` failures are swallowed entirely. A mind
/// implementation is never required to self-recover.
#[async_trait]
pub trait Mind: Send + Sync {
    /// Decide what actions to take this tick.
    async fn think(&self, context: &ActionContext) -> anyhow::Result<Vec<Action>>;

    /// Side-effect-only pass over the tick's results.
    async fn reflect(
        &self,
        context: &ActionContext,
        results: &[ActionResult],
    ) -> anyhow::Result<()>;
}

/// Append-only durable event log.
#[async_trait]
pub trait LongTermMemoryStore: Send + Sync {
    /// Append one record. Never mutates or reorders existing records.
    async fn store(&self, record: &LongTermRecord) -> anyhow::Result<()>;

    /// Last `n` records in chronological order.
    async fn get_recent(&self, n: usize) -> anyhow::Result<Vec<LongTermRecord>>;

    /// Case-insensitive substring match over observation text,
    /// most recent matches first, capped at `limit`.
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<LongTermRecord>>;

    /// Aggregate counts for the log itself.
    async fn get_stats(&self) -> anyhow::Result<MemoryStats>;

    /// Summary of everything since the most recent Startup record.
    /// Fails with [`SummaryError::NoStartupFound`] if none exists.
    async fn get_session_summary(&self) -> anyhow::Result<SessionSummary>;
}

/// Durable snapshot of cross-session state (the hibernation ledger).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Last persisted state, or None if absent or unreadable.
    async fn load(&self) -> Option<PersistedState>;

    /// Overwrite the single ledger record. Must be atomic: a partial write
    /// can never be observed by a subsequent `load`.
    async fn save(&self, state: &PersistedState) -> anyhow::Result<()>;
}
