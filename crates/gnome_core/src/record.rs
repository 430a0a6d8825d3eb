//! Durable long-term memory records and their aggregate views.

use crate::state::Mood;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic category of a long-term record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Startup,
    Shutdown,
    Observation,
    EmotionalChange,
    EnergyHigh,
    EnergyWarning,
    EnergyCritical,
    Command,
    Warning,
    Error,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Startup => "startup",
            EventType::Shutdown => "shutdown",
            EventType::Observation => "observation",
            EventType::EmotionalChange => "emotional_change",
            EventType::EnergyHigh => "energy_high",
            EventType::EnergyWarning => "energy_warning",
            EventType::EnergyCritical => "energy_critical",
            EventType::Command => "command",
            EventType::Warning => "warning",
            EventType::Error => "error",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent state captured when a memory was formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub energy: f64,
    pub pulse_count: u64,
    pub rest_count: u64,
    pub running: bool,
}

/// Sensed surroundings captured alongside the record. During shutdown no
/// sensors are read, so both fields fall back to fixed labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordContext {
    pub light_level: String,
    pub energy_tier: String,
}

/// One durable semantic event. Append-only; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermRecord {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub state: StateSnapshot,
    pub observation: String,
    pub mood: Mood,
    pub context: RecordContext,
}

/// Aggregate counts over the whole log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_records: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

/// Summary of the records since the most recent startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_secs: f64,
    pub total_records: usize,
    pub event_counts: HashMap<EventType, usize>,
    pub final_state: StateSnapshot,
}

/// Typed failure for session summaries; carried inside `anyhow::Error` so
/// callers can downcast on the condition they care about.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("no startup record found in long-term memory")]
    NoStartupFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&EventType::EmotionalChange).unwrap();
        assert_eq!(json, "\"emotional_change\"");
        let back: EventType = serde_json::from_str("\"energy_critical\"").unwrap();
        assert_eq!(back, EventType::EnergyCritical);
    }

    #[test]
    fn test_record_roundtrip() {
        let record = LongTermRecord {
            timestamp: Utc::now(),
            event_type: EventType::Observation,
            state: StateSnapshot {
                energy: 7.5,
                pulse_count: 12,
                rest_count: 3,
                running: true,
            },
            observation: "The light changed 2 times in the last minute.".into(),
            mood: Mood::Normal,
            context: RecordContext {
                light_level: "light".into(),
                energy_tier: "high".into(),
            },
        };
        let line = serde_json::to_string(&record).unwrap();
        let back: LongTermRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(record, back);
    }
}
