//! The agent core: one tick of sense → think → act → reflect.
//!
//! `AgentCore` exclusively owns the transient state, the short-term memory
//! and the mind; the long-term store, the hibernation ledger and the sensor
//! are shared with the surrounding process and reached through narrow
//! traits. A tick mutex serializes mutation; no lock is held across
//! `think`/`reflect`/action awaits, so status queries interleave freely.

use crate::observation::compose_observation;
use crate::status::StatusSnapshot;
use anyhow::Result;
use chrono::{DateTime, Utc};
use gnome_core::{
    ActionContext, ActionKind, ActionResult, AgentState, AutognomeConfig, ConversationTurn,
    EventType, LightLevel, LongTermMemoryStore, LongTermRecord, MemoryStats, Mind, MindState,
    Mood, PersistedState, RecordContext, Role, Sensor, SessionSummary, StateSnapshot, StateStore,
    StateView,
};
use gnome_memory::ShortTermMemory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Snapshot cadence: every Nth pulse persists the ledger.
const SNAPSHOT_EVERY: u64 = 10;

/// How many long-term records the mind sees each tick.
const RECENT_MEMORY_COUNT: usize = 5;

/// How many conversation turns the mind sees each tick.
const CONTEXT_CONVERSATION_TURNS: usize = 10;

/// Upper bound on retained conversation history.
const MAX_CONVERSATION_TURNS: usize = 100;

/// Lifetime counters carried across sessions. Fixed at rehydration; the
/// current session's counts are added on top when persisting or reporting.
#[derive(Debug, Clone, Copy, Default)]
struct LifetimeLedger {
    total_pulses: u64,
    total_rests: u64,
    total_runtime: f64,
    total_hibernation_time: f64,
    wake_count: u64,
}

/// Lifetime statistics, session totals folded in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LifetimeStats {
    pub total_pulses: u64,
    pub total_rests: u64,
    pub total_runtime: f64,
    pub total_hibernation_time: f64,
    pub wake_count: u64,
    pub current_session_runtime: f64,
}

pub struct AgentCore {
    config: AutognomeConfig,
    state: RwLock<AgentState>,
    short_term: RwLock<ShortTermMemory>,
    mind: Arc<dyn Mind>,
    sensor: Arc<dyn Sensor>,
    long_term: Arc<dyn LongTermMemoryStore>,
    state_store: Arc<dyn StateStore>,
    conversation: RwLock<Vec<ConversationTurn>>,
    last_user_message: RwLock<Option<DateTime<Utc>>>,
    last_observation: RwLock<String>,
    last_energy_note: RwLock<Option<EventType>>,
    last_sensed: RwLock<LightLevel>,
    ledger: LifetimeLedger,
    startup_time: DateTime<Utc>,
    has_shutdown: AtomicBool,
    /// Serializes tick execution and other state-mutating entry points.
    tick_lock: Mutex<()>,
}

impl AgentCore {
    /// Construct and rehydrate the agent.
    ///
    /// If a prior persisted state exists, energy and mood are restored
    /// verbatim, the hibernation gap since `last_active` is added to the
    /// ledger and the wake count advances. A startup record and an initial
    /// snapshot are written before this returns.
    pub async fn new(
        config: AutognomeConfig,
        mind: Arc<dyn Mind>,
        sensor: Arc<dyn Sensor>,
        long_term: Arc<dyn LongTermMemoryStore>,
        state_store: Arc<dyn StateStore>,
    ) -> Result<Self> {
        let now = Utc::now();
        let mut state = AgentState::new(config.core.initial_energy);

        let ledger = match state_store.load().await {
            Some(prev) => {
                let hibernation =
                    ((now - prev.last_active).num_milliseconds() as f64 / 1000.0).max(0.0);
                state.energy = prev.energy.clamp(0.0, state.energy_cap);
                state.mood = prev.mood;
                tracing::info!(
                    "Rehydrated from ledger: wake #{}, hibernated {:.0}s",
                    prev.wake_count + 1,
                    hibernation
                );
                LifetimeLedger {
                    total_pulses: prev.total_pulses,
                    total_rests: prev.total_rests,
                    total_runtime: prev.total_runtime,
                    total_hibernation_time: prev.total_hibernation_time + hibernation,
                    wake_count: prev.wake_count + 1,
                }
            }
            None => {
                tracing::info!("No prior state found, starting fresh");
                LifetimeLedger {
                    wake_count: 1,
                    ..LifetimeLedger::default()
                }
            }
        };

        let short_term = ShortTermMemory::new(
            config.memory.short_term_capacity,
            config.memory.min_record_interval_secs,
        );
        let initial_light = sensor.read();

        let agent = Self {
            state: RwLock::new(state),
            short_term: RwLock::new(short_term),
            mind,
            sensor,
            long_term,
            state_store,
            conversation: RwLock::new(Vec::new()),
            last_user_message: RwLock::new(None),
            last_observation: RwLock::new(String::new()),
            last_energy_note: RwLock::new(None),
            last_sensed: RwLock::new(initial_light),
            ledger,
            startup_time: now,
            has_shutdown: AtomicBool::new(false),
            tick_lock: Mutex::new(()),
            config,
        };

        agent
            .store_memory(
                EventType::Startup,
                format!(
                    "I am {}, and I have awakened for the {} time!",
                    agent.config.name, agent.ledger.wake_count
                ),
            )
            .await?;
        agent.save_state().await?;
        Ok(agent)
    }

    pub fn config(&self) -> &AutognomeConfig {
        &self.config
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    /// Snapshot of the transient state, for inspection.
    pub async fn state(&self) -> AgentState {
        self.state.read().await.clone()
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Run one action cycle. Returns the narrated message, if the tick
    /// produced one.
    pub async fn tick(&self) -> Result<Option<String>> {
        let _guard = self.tick_lock.lock().await;
        if !self.state.read().await.running {
            return Ok(None);
        }

        let pulse = {
            let mut state = self.state.write().await;
            state.pulse_count += 1;
            state.pulse_count
        };
        if pulse % SNAPSHOT_EVERY == 0 {
            self.save_state().await?;
        }

        // Resting tick: recover, count down, and that's the whole cycle.
        {
            let mut state = self.state.write().await;
            if state.is_resting() {
                state.recover(self.config.core.energy_recovery_rate);
                state.remaining_rest_pulses -= 1;
                state.mind_state = MindState::Resting;
                return Ok(None);
            }
        }

        let context = self.build_context().await;

        self.set_mind_state(MindState::Thinking).await;
        let actions = match tokio::time::timeout(
            self.config.mind.think_timeout(),
            self.mind.think(&context),
        )
        .await
        {
            Ok(Ok(actions)) => actions,
            Ok(Err(e)) => {
                self.store_memory(EventType::Error, format!("Mind error during thinking: {e}"))
                    .await?;
                Vec::new()
            }
            Err(_) => {
                self.store_memory(EventType::Warning, "Mind took too long to think")
                    .await?;
                Vec::new()
            }
        };

        let mut message: Option<String> = None;
        let mut results: Vec<ActionResult> = Vec::new();
        let mut rested = false;

        for action in &actions {
            self.set_mind_state(action.display_state()).await;
            match tokio::time::timeout(
                self.config.mind.action_timeout(),
                action.execute(&context),
            )
            .await
            {
                Ok(Ok(result)) => {
                    match &result.kind {
                        ActionKind::Speak => {
                            message = Some(result.message.clone());
                            self.push_turn(Role::Assistant, result.message.clone()).await;
                        }
                        ActionKind::Rest { pulses } => {
                            // Rest short-circuits the tick: this pulse counts
                            // as the first rest pulse, the rest are owed.
                            let mut state = self.state.write().await;
                            state.recover(self.config.core.energy_recovery_rate);
                            state.rest_count += 1;
                            state.remaining_rest_pulses = pulses.saturating_sub(1);
                            state.mind_state = MindState::Resting;
                            rested = true;
                        }
                        ActionKind::Research { .. } | ActionKind::Error => {}
                    }
                    results.push(result);
                    if rested {
                        break;
                    }
                }
                Ok(Err(e)) => {
                    self.store_memory(EventType::Error, format!("Action execution error: {e}"))
                        .await?;
                    results.push(ActionResult::failure(e.to_string()));
                }
                Err(_) => {
                    self.store_memory(
                        EventType::Error,
                        format!("Action timed out while {}", action.display_state()),
                    )
                    .await?;
                    results.push(ActionResult::failure("action timed out"));
                }
            }
        }

        if rested {
            return Ok(message);
        }

        // Active pulses always consume energy.
        let exhausted = {
            let mut state = self.state.write().await;
            state.deplete(self.config.core.energy_depletion_rate)
        };
        if exhausted {
            self.store_memory(EventType::EnergyCritical, "Energy completely depleted!")
                .await?;
            self.stop().await?;
            return Ok(Some("My energy is depleted. Shutting down...".to_string()));
        }
        self.note_energy_tier().await?;

        self.set_mind_state(MindState::Reflecting).await;
        match tokio::time::timeout(
            self.config.mind.reflect_timeout(),
            self.mind.reflect(&context, &results),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.store_memory(EventType::Warning, format!("Reflection error: {e}"))
                    .await?;
            }
            Err(_) => {
                self.store_memory(EventType::Warning, "Reflection took too long")
                    .await?;
            }
        }

        self.set_mind_state(MindState::Idle).await;
        Ok(message)
    }

    // ========================================================================
    // Status / observation read path
    // ========================================================================

    /// Current display-ready status. Senses the environment and may write
    /// mood-change and observation memories; nothing else mutates.
    pub async fn get_status(&self) -> Result<StatusSnapshot> {
        let light = self.sense_environment().await;
        self.update_mood(light).await?;
        let (observation, is_new) = self.generate_observation().await?;

        let state = self.state.read().await.clone();
        Ok(StatusSnapshot {
            time: Utc::now(),
            state: if state.running { "active" } else { "stopped" }.to_string(),
            energy: state.energy,
            pulse_count: state.pulse_count,
            rest_count: state.rest_count,
            version: self.config.version.clone(),
            name: self.config.name.clone(),
            light_level: light,
            mood: state.mood,
            is_observing: is_new,
            observation,
            mind_state: state.mind_state,
        })
    }

    /// Read the sensor and feed the short-term transition detector.
    async fn sense_environment(&self) -> LightLevel {
        let level = self.sensor.read();
        self.short_term.write().await.record(level, "");
        *self.last_sensed.write().await = level;
        level
    }

    /// Derive mood from the sensed light level, remembering changes.
    async fn update_mood(&self, light: LightLevel) -> Result<()> {
        let new_mood = match light {
            LightLevel::Light => Mood::Normal,
            LightLevel::Dark => Mood::Afraid,
        };
        let old_mood = self.state.read().await.mood;
        if new_mood != old_mood {
            self.store_memory(
                EventType::EmotionalChange,
                format!("I'm feeling {new_mood} now... (was {old_mood})"),
            )
            .await?;
            self.state.write().await.mood = new_mood;
        }
        Ok(())
    }

    /// Generate the pattern observation for this instant. Returns the text
    /// and whether it is new (deduplicated against the previous one); a new
    /// observation is also written to long-term memory.
    async fn generate_observation(&self) -> Result<(String, bool)> {
        let (patterns, current) = {
            let stm = self.short_term.read().await;
            (stm.analyze_patterns(), stm.last_value())
        };
        let current_state = current.map(|l| l.to_string()).unwrap_or_else(|| "unknown".into());

        let observation = compose_observation(
            &patterns,
            &current_state,
            self.config.observation.precedence,
        )
        .unwrap_or_default();

        let is_new = {
            let mut last = self.last_observation.write().await;
            if !observation.is_empty() && *last != observation {
                *last = observation.clone();
                true
            } else {
                false
            }
        };
        if is_new {
            self.store_memory(EventType::Observation, observation.clone())
                .await?;
        }
        Ok((observation, is_new))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Record a message from the user.
    pub async fn record_user_message(&self, content: impl Into<String>) {
        let now = Utc::now();
        *self.last_user_message.write().await = Some(now);
        let mut conversation = self.conversation.write().await;
        conversation.push(ConversationTurn {
            role: Role::User,
            content: content.into(),
            timestamp: now,
        });
        let len = conversation.len();
        if len > MAX_CONVERSATION_TURNS {
            conversation.drain(0..len - MAX_CONVERSATION_TURNS);
        }
    }

    /// Take one commanded rest pulse, outside the mind's control.
    pub async fn start_rest(&self) -> Result<Option<String>> {
        let _guard = self.tick_lock.lock().await;
        if !self.state.read().await.running {
            return Ok(None);
        }
        self.store_memory(EventType::Command, "Taking a moment to rest...")
            .await?;
        {
            let mut state = self.state.write().await;
            state.pulse_count += 1;
            state.rest_count += 1;
            state.recover(self.config.core.energy_recovery_rate);
            state.mind_state = MindState::Resting;
        }
        let light = self.sense_environment().await;
        let (observation, _) = self.generate_observation().await?;
        if !observation.is_empty() {
            return Ok(Some(observation));
        }
        let expression = match light {
            LightLevel::Light => &self.config.personality.rest_light,
            LightLevel::Dark => &self.config.personality.rest_dark,
        };
        Ok(Some(expression.clone()))
    }

    /// Stop the agent. Safe to call from anywhere at any time; the shutdown
    /// memory and final snapshot are written exactly once.
    pub async fn stop(&self) -> Result<()> {
        if self.has_shutdown.swap(true, Ordering::SeqCst) {
            self.state.write().await.running = false;
            return Ok(());
        }
        let final_energy = {
            let mut state = self.state.write().await;
            state.running = false;
            state.mind_state = MindState::Sleeping;
            state.energy
        };
        self.store_memory(
            EventType::Shutdown,
            format!("Going to sleep... Final energy: {final_energy:.1}"),
        )
        .await?;
        self.save_state().await?;
        Ok(())
    }

    // ========================================================================
    // Stats and summaries
    // ========================================================================

    /// Lifetime statistics with the current session folded in.
    pub async fn lifetime_stats(&self) -> LifetimeStats {
        let state = self.state.read().await;
        let runtime = (Utc::now() - self.startup_time).num_milliseconds() as f64 / 1000.0;
        LifetimeStats {
            total_pulses: self.ledger.total_pulses + state.pulse_count,
            total_rests: self.ledger.total_rests + state.rest_count,
            total_runtime: self.ledger.total_runtime + runtime,
            total_hibernation_time: self.ledger.total_hibernation_time,
            wake_count: self.ledger.wake_count,
            current_session_runtime: runtime,
        }
    }

    pub async fn session_summary(&self) -> Result<SessionSummary> {
        self.long_term.get_session_summary().await
    }

    pub async fn memory_stats(&self) -> Result<MemoryStats> {
        self.long_term.get_stats().await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn set_mind_state(&self, mind_state: MindState) {
        self.state.write().await.mind_state = mind_state;
    }

    async fn push_turn(&self, role: Role, content: String) {
        let mut conversation = self.conversation.write().await;
        conversation.push(ConversationTurn {
            role,
            content,
            timestamp: Utc::now(),
        });
        let len = conversation.len();
        if len > MAX_CONVERSATION_TURNS {
            conversation.drain(0..len - MAX_CONVERSATION_TURNS);
        }
    }

    /// Snapshot everything the mind is allowed to see. No locks survive
    /// past this call.
    async fn build_context(&self) -> ActionContext {
        let state = self.state.read().await.clone();
        let patterns = self.short_term.read().await.analyze_patterns();
        let recent_memories = match self.long_term.get_recent(RECENT_MEMORY_COUNT).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to read recent memories for context: {}", e);
                Vec::new()
            }
        };
        let conversation = {
            let conversation = self.conversation.read().await;
            let skip = conversation.len().saturating_sub(CONTEXT_CONVERSATION_TURNS);
            conversation[skip..].to_vec()
        };

        ActionContext {
            state: StateView {
                energy: state.energy,
                mood: state.mood,
                pulse_count: state.pulse_count,
                rest_count: state.rest_count,
                running: state.running,
                energy_tier: state.energy_tier(self.config.core.optimal_energy),
            },
            patterns,
            recent_memories,
            light: self.sensor.read(),
            conversation,
            last_user_message: *self.last_user_message.read().await,
            timestamp: Utc::now(),
        }
    }

    /// Emit an energy-tier memory when depletion crosses into a new band.
    async fn note_energy_tier(&self) -> Result<()> {
        let energy = self.state.read().await.energy;
        let initial = self.config.core.initial_energy;
        let note = if energy >= initial * 0.9 {
            Some((EventType::EnergyHigh, "Feeling full of energy!"))
        } else if energy <= initial * 0.3 {
            Some((EventType::EnergyCritical, "Energy reserves are nearly gone..."))
        } else if energy <= initial * 0.5 {
            Some((EventType::EnergyWarning, "Energy is getting low..."))
        } else {
            None
        };

        match note {
            Some((kind, text)) => {
                let is_new_band = {
                    let mut last = self.last_energy_note.write().await;
                    if *last != Some(kind) {
                        *last = Some(kind);
                        true
                    } else {
                        false
                    }
                };
                if is_new_band {
                    self.store_memory(kind, text).await?;
                }
            }
            // Back in the comfortable band: re-entering a band later
            // produces a fresh note.
            None => *self.last_energy_note.write().await = None,
        }
        Ok(())
    }

    /// Append one long-term record. During shutdown no sensors are read.
    async fn store_memory(
        &self,
        event_type: EventType,
        observation: impl Into<String>,
    ) -> Result<()> {
        let state = self.state.read().await.clone();
        let (light_level, energy_tier) = if event_type == EventType::Shutdown {
            ("unknown".to_string(), "shutdown".to_string())
        } else {
            (
                self.sensor.read().to_string(),
                state.energy_tier(self.config.core.optimal_energy).to_string(),
            )
        };
        let record = LongTermRecord {
            timestamp: Utc::now(),
            event_type,
            state: StateSnapshot {
                energy: state.energy,
                pulse_count: state.pulse_count,
                rest_count: state.rest_count,
                running: state.running,
            },
            observation: observation.into(),
            mood: state.mood,
            context: RecordContext {
                light_level,
                energy_tier,
            },
        };
        self.long_term.store(&record).await
    }

    /// Persist the hibernation ledger.
    async fn save_state(&self) -> Result<()> {
        let now = Utc::now();
        let runtime = (now - self.startup_time).num_milliseconds() as f64 / 1000.0;
        let state = self.state.read().await.clone();
        let persisted = PersistedState {
            energy: state.energy,
            mood: state.mood,
            last_light_level: *self.last_sensed.read().await,
            last_active: now,
            last_hibernation: if state.running { None } else { Some(now) },
            total_pulses: self.ledger.total_pulses + state.pulse_count,
            total_rests: self.ledger.total_rests + state.rest_count,
            total_runtime: self.ledger.total_runtime + runtime,
            total_hibernation_time: self.ledger.total_hibernation_time,
            wake_count: self.ledger.wake_count,
        };
        self.state_store.save(&persisted).await
    }
}
