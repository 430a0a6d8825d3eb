//! Display-ready status snapshot, consumed by any UI.

use chrono::{DateTime, Utc};
use gnome_core::{LightLevel, MindState, Mood};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub time: DateTime<Utc>,
    /// "active" or "stopped".
    pub state: String,
    pub energy: f64,
    pub pulse_count: u64,
    pub rest_count: u64,
    pub version: String,
    pub name: String,
    pub light_level: LightLevel,
    pub mood: Mood,
    /// True when this query produced a fresh observation.
    pub is_observing: bool,
    /// Current observation text, empty if none.
    pub observation: String,
    pub mind_state: MindState,
}
