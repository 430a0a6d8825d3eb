//! Rolling transition detector over sensed state changes.
//!
//! Recording is rate-limited: anything arriving less than the configured
//! interval after the previous recording is dropped. Only *transitions*
//! (value different from the last seen) produce events; repeats just refresh
//! nothing.

use chrono::{DateTime, Utc};
use gnome_core::{LightLevel, PatternSummary};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A detected state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub timestamp: DateTime<Utc>,
    pub from: LightLevel,
    pub to: LightLevel,
    pub detail: String,
}

/// Bounded ring buffer of transition events plus the bookkeeping needed for
/// duration analysis.
#[derive(Debug)]
pub struct ShortTermMemory {
    events: VecDeque<MemoryEvent>,
    capacity: usize,
    min_record_interval_secs: f64,
    last_value: Option<LightLevel>,
    last_transition_time: Option<DateTime<Utc>>,
    last_record_time: Option<DateTime<Utc>>,
}

impl ShortTermMemory {
    pub fn new(capacity: usize, min_record_interval_secs: f64) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            min_record_interval_secs,
            last_value: None,
            last_transition_time: None,
            last_record_time: None,
        }
    }

    /// Record a sensed value now. Returns the transition event, if this
    /// recording produced one.
    pub fn record(&mut self, value: LightLevel, detail: &str) -> Option<MemoryEvent> {
        self.record_at(value, detail, Utc::now())
    }

    /// Record with an explicit clock, so rate-limit behavior is testable
    /// without sleeping.
    pub fn record_at(
        &mut self,
        value: LightLevel,
        detail: &str,
        now: DateTime<Utc>,
    ) -> Option<MemoryEvent> {
        if let Some(last) = self.last_record_time {
            let elapsed = (now - last).num_milliseconds() as f64 / 1000.0;
            if elapsed < self.min_record_interval_secs {
                return None;
            }
        }
        self.last_record_time = Some(now);

        match self.last_value {
            // First recording seeds the state without an event.
            None => {
                self.last_value = Some(value);
                self.last_transition_time = Some(now);
                None
            }
            Some(prior) if prior != value => {
                let event = MemoryEvent {
                    timestamp: now,
                    from: prior,
                    to: value,
                    detail: if detail.is_empty() {
                        format!("Changed from {prior} to {value}.")
                    } else {
                        format!("Changed from {prior} to {value}. {detail}")
                    },
                };
                self.push(event.clone());
                self.last_value = Some(value);
                self.last_transition_time = Some(now);
                Some(event)
            }
            Some(_) => None,
        }
    }

    fn push(&mut self, event: MemoryEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Last sensed value, if anything has been recorded yet.
    pub fn last_value(&self) -> Option<LightLevel> {
        self.last_value
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Transitions within the last `seconds` before `now`.
    fn transitions_since(&self, now: DateTime<Utc>, seconds: i64) -> usize {
        let cutoff = now - chrono::Duration::seconds(seconds);
        self.events.iter().filter(|e| e.timestamp >= cutoff).count()
    }

    /// Analyze recent transition patterns at the current instant.
    pub fn analyze_patterns(&self) -> PatternSummary {
        self.analyze_patterns_at(Utc::now())
    }

    /// Analyze with an explicit clock.
    pub fn analyze_patterns_at(&self, now: DateTime<Utc>) -> PatternSummary {
        let current_state_duration_secs = self
            .last_transition_time
            .map(|t| (now - t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0)
            .max(0.0);

        PatternSummary {
            transitions_last_minute: self.transitions_since(now, 60),
            transitions_last_5_minutes: self.transitions_since(now, 300),
            current_state_duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_first_record_seeds_without_event() {
        let mut stm = ShortTermMemory::new(60, 1.0);
        let event = stm.record_at(LightLevel::Light, "", t0());
        assert!(event.is_none());
        assert_eq!(stm.last_value(), Some(LightLevel::Light));
        assert!(stm.is_empty());
    }

    #[test]
    fn test_rate_limit_drops_fast_followup() {
        let mut stm = ShortTermMemory::new(60, 1.0);
        stm.record_at(LightLevel::Light, "", t0());
        // 0.5s later: under the 1s limit, dropped even though it transitions
        let event = stm.record_at(LightLevel::Dark, "", t0() + Duration::milliseconds(500));
        assert!(event.is_none());
        assert_eq!(stm.last_value(), Some(LightLevel::Light));
    }

    #[test]
    fn test_transition_recorded_after_rate_window() {
        let mut stm = ShortTermMemory::new(60, 1.0);
        stm.record_at(LightLevel::Light, "", t0());
        let event = stm
            .record_at(LightLevel::Dark, "", t0() + Duration::milliseconds(1100))
            .expect("transition should be recorded");
        assert_eq!(event.from, LightLevel::Light);
        assert_eq!(event.to, LightLevel::Dark);
        assert!(event.detail.contains("light"));
        assert!(event.detail.contains("dark"));
        assert_eq!(stm.len(), 1);
    }

    #[test]
    fn test_same_value_produces_no_event() {
        let mut stm = ShortTermMemory::new(60, 1.0);
        stm.record_at(LightLevel::Light, "", t0());
        let event = stm.record_at(LightLevel::Light, "", t0() + Duration::seconds(2));
        assert!(event.is_none());
        assert!(stm.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stm = ShortTermMemory::new(2, 0.0);
        let mut now = t0();
        // Alternate light/dark to force a transition on every record
        for i in 0..5 {
            let value = if i % 2 == 0 {
                LightLevel::Dark
            } else {
                LightLevel::Light
            };
            now = now + Duration::seconds(1);
            stm.record_at(value, "", now);
        }
        assert_eq!(stm.len(), 2);
    }

    #[test]
    fn test_analyze_patterns_windows() {
        let mut stm = ShortTermMemory::new(60, 0.0);
        let start = t0();
        // Transition at t+10s (old, outside last minute relative to `now`)
        stm.record_at(LightLevel::Light, "", start);
        stm.record_at(LightLevel::Dark, "", start + Duration::seconds(10));
        // Transition at t+250s (inside 5 minutes, inside last minute too)
        stm.record_at(LightLevel::Light, "", start + Duration::seconds(250));

        let now = start + Duration::seconds(290);
        let patterns = stm.analyze_patterns_at(now);
        assert_eq!(patterns.transitions_last_minute, 1);
        assert_eq!(patterns.transitions_last_5_minutes, 2);
        assert!((patterns.current_state_duration_secs - 40.0).abs() < 0.01);
    }

    #[test]
    fn test_duration_zero_before_any_record() {
        let stm = ShortTermMemory::new(60, 1.0);
        let patterns = stm.analyze_patterns_at(t0());
        assert_eq!(patterns.transitions_last_minute, 0);
        assert_eq!(patterns.current_state_duration_secs, 0.0);
    }

    #[test]
    fn test_zero_interval_disables_rate_limit() {
        let mut stm = ShortTermMemory::new(60, 0.0);
        stm.record_at(LightLevel::Light, "", t0());
        let event = stm.record_at(LightLevel::Dark, "", t0());
        assert!(event.is_some());
    }
}
