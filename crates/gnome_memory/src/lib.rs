//! # Autognome memory
//!
//! Two subsystems with very different lifetimes:
//!
//! - [`ShortTermMemory`]: a bounded in-process ring of sensed state
//!   transitions, feeding the agent's pattern observations
//! - [`JsonlMemoryStore`] / [`JsonStateStore`]: durable storage — an
//!   append-only JSONL event log and a single atomically-overwritten JSON
//!   snapshot (the hibernation ledger)

pub mod long_term;
pub mod short_term;
pub mod state_store;

pub use long_term::JsonlMemoryStore;
pub use short_term::{MemoryEvent, ShortTermMemory};
pub use state_store::JsonStateStore;
