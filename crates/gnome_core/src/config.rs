use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutognomeConfig {
    /// Identity of this agent; also names its data directory.
    pub version: String,
    pub name: String,
    pub description: String,

    pub core: CoreConfig,
    pub mind: MindConfig,
    pub memory: MemoryConfig,
    pub observation: ObservationConfig,
    pub personality: PersonalityConfig,
    pub runtime: RuntimeConfig,
}

impl Default for AutognomeConfig {
    fn default() -> Self {
        Self {
            version: "ag1".to_string(),
            name: "Autognome".to_string(),
            description: "A self-asserting pulse with memory and moods".to_string(),
            core: CoreConfig::default(),
            mind: MindConfig::default(),
            memory: MemoryConfig::default(),
            observation: ObservationConfig::default(),
            personality: PersonalityConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AutognomeConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. Env var overrides are applied after parsing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: AutognomeConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Try to load from path; if the file doesn't exist, return defaults with
    /// env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("AG_VERSION") {
            self.version = v;
        }
        if let Ok(v) = std::env::var("AG_MIND_KIND") {
            self.mind.kind = v;
        }
        if let Ok(v) = std::env::var("AG_DATA_DIR") {
            self.runtime.data_dir = v;
        }
        if let Ok(v) = std::env::var("AG_TICK_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                self.runtime.tick_interval_secs = n;
            }
        }
        if let Ok(v) = std::env::var("AG_INITIAL_ENERGY") {
            if let Ok(n) = v.parse() {
                self.core.initial_energy = n;
            }
        }
    }

    /// Reject configurations the runtime cannot start with.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.core.initial_energy <= 0.0 {
            return Err(ConfigError::Invalid("initial_energy must be > 0".into()));
        }
        if self.core.energy_depletion_rate <= 0.0 {
            return Err(ConfigError::Invalid(
                "energy_depletion_rate must be > 0".into(),
            ));
        }
        if self.runtime.tick_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid("tick_interval_secs must be > 0".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub initial_energy: f64,
    pub optimal_energy: f64,
    /// Energy consumed by each active pulse.
    pub energy_depletion_rate: f64,
    /// Energy regained by each rest pulse.
    pub energy_recovery_rate: f64,
    /// Probability of resting when in darkness.
    pub dark_fear_threshold: f64,
    /// Additional probability of pulsing when in light.
    pub light_confidence_boost: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            initial_energy: 10.0,
            optimal_energy: 7.0,
            energy_depletion_rate: 1.0,
            energy_recovery_rate: 1.0,
            dark_fear_threshold: 0.7,
            light_confidence_boost: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MindConfig {
    /// Which Mind implementation to build ("mock" is the only in-tree kind).
    pub kind: String,
    pub think_timeout_secs: f64,
    pub reflect_timeout_secs: f64,
    /// Budget for each individual action execution.
    pub action_timeout_secs: f64,
    /// A user message younger than this gets an acknowledgement response.
    pub wait_for_user_secs: f64,
    /// Cooldown between spontaneous research actions.
    pub research_interval_secs: f64,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            kind: "mock".to_string(),
            think_timeout_secs: 5.0,
            reflect_timeout_secs: 2.0,
            action_timeout_secs: 5.0,
            wait_for_user_secs: 30.0,
            research_interval_secs: 30.0,
        }
    }
}

impl MindConfig {
    pub fn think_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.think_timeout_secs)
    }
    pub fn reflect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.reflect_timeout_secs)
    }
    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.action_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Ring capacity of the short-term transition buffer.
    pub short_term_capacity: usize,
    /// Rate limit between short-term recordings.
    pub min_record_interval_secs: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: 60,
            min_record_interval_secs: 1.0,
        }
    }
}

/// Which candidate wins when both observation policies fire on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationPrecedence {
    /// Transition-count observations override duration ones.
    #[default]
    TransitionsFirst,
    /// Duration observations override transition-count ones.
    DurationFirst,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    pub precedence: ObservationPrecedence,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersonalityConfig {
    pub rest_light: String,
    pub rest_dark: String,
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            rest_light: "Resting in the warm light...".to_string(),
            rest_dark: "Resting in the dark... staying calm.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tick_interval_secs: f64,
    pub data_dir: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1.0,
            data_dir: "data/autognomes".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_secs)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Fatal at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown mind kind: {0}")]
    UnknownMindKind(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
