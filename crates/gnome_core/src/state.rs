//! Transient run state of a single agent.
//!
//! `AgentState` is mutated only by the agent core. The energy field carries
//! the one invariant worth being paranoid about: it stays within
//! `[0, energy_cap]` no matter what sequence of depletions and recoveries
//! the tick loop applies.

use serde::{Deserialize, Serialize};

/// Guard against NaN and Infinity sneaking into energy arithmetic.
/// Non-finite values reset to the provided fallback.
#[inline]
fn sanitize_f64(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in energy value, resetting to {}", fallback);
        fallback
    }
}

/// Discrete emotional state, derived from the sensed environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Normal,
    Afraid,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Normal => "normal",
            Mood::Afraid => "afraid",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the mind is doing right now, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MindState {
    #[default]
    Idle,
    Thinking,
    Speaking,
    Resting,
    Researching,
    Reflecting,
    Error,
    Sleeping,
}

impl MindState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MindState::Idle => "idle",
            MindState::Thinking => "thinking",
            MindState::Speaking => "speaking",
            MindState::Resting => "resting",
            MindState::Researching => "researching",
            MindState::Reflecting => "reflecting",
            MindState::Error => "error",
            MindState::Sleeping => "sleeping",
        }
    }
}

impl std::fmt::Display for MindState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy relative to the configured optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyTier {
    High,
    Optimal,
    Low,
}

impl EnergyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyTier::High => "high",
            EnergyTier::Optimal => "optimal",
            EnergyTier::Low => "low",
        }
    }
}

impl std::fmt::Display for EnergyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient per-process agent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    /// Current energy, clamped to `[0, energy_cap]`.
    pub energy: f64,

    /// Upper clamp for energy (the configured initial energy).
    pub energy_cap: f64,

    pub mood: Mood,

    /// Pulses in the current session.
    pub pulse_count: u64,

    /// Rest actions taken in the current session.
    pub rest_count: u64,

    pub running: bool,

    pub mind_state: MindState,

    /// Resting ticks still owed after a Rest action. The tick that executed
    /// the Rest counts as the first rest pulse, so `Rest(n)` leaves `n - 1`
    /// here.
    pub remaining_rest_pulses: u32,
}

impl AgentState {
    pub fn new(initial_energy: f64) -> Self {
        Self {
            energy: initial_energy,
            energy_cap: initial_energy,
            mood: Mood::Normal,
            pulse_count: 0,
            rest_count: 0,
            running: true,
            mind_state: MindState::Idle,
            remaining_rest_pulses: 0,
        }
    }

    /// Whether the next tick is a resting tick.
    pub fn is_resting(&self) -> bool {
        self.remaining_rest_pulses > 0
    }

    /// Deplete energy by `amount`, clamping at zero.
    /// Returns true if energy reached zero.
    pub fn deplete(&mut self, amount: f64) -> bool {
        self.energy = sanitize_f64(self.energy - amount, 0.0).clamp(0.0, self.energy_cap);
        self.energy <= 0.0
    }

    /// Recover energy by `amount`, clamping at the cap.
    pub fn recover(&mut self, amount: f64) {
        self.energy = sanitize_f64(self.energy + amount, self.energy_cap).clamp(0.0, self.energy_cap);
    }

    /// Energy tier relative to the configured optimum.
    pub fn energy_tier(&self, optimal_energy: f64) -> EnergyTier {
        if self.energy >= optimal_energy + 0.5 {
            EnergyTier::High
        } else if self.energy <= optimal_energy - 0.5 {
            EnergyTier::Low
        } else {
            EnergyTier::Optimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = AgentState::new(10.0);
        assert_eq!(state.energy, 10.0);
        assert_eq!(state.energy_cap, 10.0);
        assert!(state.running);
        assert_eq!(state.mood, Mood::Normal);
        assert_eq!(state.mind_state, MindState::Idle);
        assert!(!state.is_resting());
    }

    #[test]
    fn test_deplete_clamps_at_zero() {
        let mut state = AgentState::new(2.0);
        assert!(!state.deplete(1.0));
        assert!(state.deplete(5.0));
        assert_eq!(state.energy, 0.0);
    }

    #[test]
    fn test_recover_clamps_at_cap() {
        let mut state = AgentState::new(10.0);
        state.deplete(3.0);
        state.recover(100.0);
        assert_eq!(state.energy, 10.0);
    }

    #[test]
    fn test_deplete_sanitizes_nan() {
        let mut state = AgentState::new(10.0);
        state.deplete(f64::NAN);
        assert!(state.energy.is_finite());
        assert!(state.energy >= 0.0 && state.energy <= 10.0);
    }

    #[test]
    fn test_energy_tier() {
        let mut state = AgentState::new(10.0);
        assert_eq!(state.energy_tier(7.0), EnergyTier::High);
        state.energy = 7.0;
        assert_eq!(state.energy_tier(7.0), EnergyTier::Optimal);
        state.energy = 6.0;
        assert_eq!(state.energy_tier(7.0), EnergyTier::Low);
    }

    #[test]
    fn test_tier_boundaries() {
        let mut state = AgentState::new(10.0);
        state.energy = 7.5;
        assert_eq!(state.energy_tier(7.0), EnergyTier::High);
        state.energy = 6.5;
        assert_eq!(state.energy_tier(7.0), EnergyTier::Low);
        state.energy = 6.6;
        assert_eq!(state.energy_tier(7.0), EnergyTier::Optimal);
    }
}
