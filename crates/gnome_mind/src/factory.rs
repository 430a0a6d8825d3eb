//! Config-driven mind construction.

use crate::mock::MockMind;
use gnome_core::{ConfigError, Mind, MindConfig};
use std::sync::Arc;

/// Build the configured mind. An unknown kind is fatal at construction time.
///
/// `seed` forces a reproducible RNG; None draws from entropy.
pub fn build_mind(config: &MindConfig, seed: Option<u64>) -> Result<Arc<dyn Mind>, ConfigError> {
    match config.kind.as_str() {
        "mock" => {
            let mind = match seed {
                Some(seed) => MockMind::with_seed(config.clone(), seed),
                None => MockMind::new(config.clone()),
            };
            Ok(Arc::new(mind))
        }
        other => Err(ConfigError::UnknownMindKind(other.to_string())),
    }
}
