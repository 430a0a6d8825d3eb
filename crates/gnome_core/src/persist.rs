//! The hibernation ledger: one record per agent identity, overwritten on
//! every save, read once at startup.

use crate::state::Mood;
use crate::LightLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cross-session counters and last-known state.
///
/// `wake_count` is monotonically increasing across restarts and
/// `total_hibernation_time` only ever grows; both are maintained by the
/// agent at rehydration time, not by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub energy: f64,
    pub mood: Mood,
    pub last_light_level: LightLevel,
    pub last_active: DateTime<Utc>,
    pub last_hibernation: Option<DateTime<Utc>>,
    pub total_pulses: u64,
    pub total_rests: u64,
    /// Seconds of runtime across all sessions.
    pub total_runtime: f64,
    /// Seconds spent hibernating between sessions.
    pub total_hibernation_time: f64,
    pub wake_count: u64,
}
