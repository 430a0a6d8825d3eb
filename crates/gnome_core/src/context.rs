//! Per-tick context snapshot handed to the mind.

use crate::record::LongTermRecord;
use crate::state::{EnergyTier, Mood};
use crate::LightLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of the agent state at the start of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateView {
    pub energy: f64,
    pub mood: Mood,
    pub pulse_count: u64,
    pub rest_count: u64,
    pub running: bool,
    pub energy_tier: EnergyTier,
}

/// Rolling pattern analysis produced by short-term memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternSummary {
    pub transitions_last_minute: usize,
    pub transitions_last_5_minutes: usize,
    /// Seconds spent in the current sensed state.
    pub current_state_duration_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Immutable snapshot built fresh each tick; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionContext {
    pub state: StateView,
    pub patterns: PatternSummary,
    /// Last few long-term records, chronological.
    pub recent_memories: Vec<LongTermRecord>,
    pub light: LightLevel,
    /// Tail of the conversation, chronological.
    pub conversation: Vec<ConversationTurn>,
    pub last_user_message: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

impl ActionContext {
    /// A neutral context for tests and degenerate paths.
    pub fn empty() -> Self {
        Self {
            state: StateView {
                energy: 0.0,
                mood: Mood::Normal,
                pulse_count: 0,
                rest_count: 0,
                running: true,
                energy_tier: EnergyTier::Optimal,
            },
            patterns: PatternSummary::default(),
            recent_memories: Vec::new(),
            light: LightLevel::Light,
            conversation: Vec::new(),
            last_user_message: None,
            timestamp: Utc::now(),
        }
    }

    /// Seconds since the user last spoke, if they ever did.
    pub fn secs_since_user_message(&self) -> Option<f64> {
        self.last_user_message
            .map(|t| (self.timestamp - t).num_milliseconds() as f64 / 1000.0)
    }
}
