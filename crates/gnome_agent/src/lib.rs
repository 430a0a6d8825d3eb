//! # Autognome agent core
//!
//! [`AgentCore`] orchestrates one tick of the sense → think → act → reflect
//! cycle, owns the energy/mood state machine, and keeps both memory
//! subsystems and the hibernation ledger up to date. [`AgentRunner`] drives
//! it on a fixed cadence from a background task.

mod agent;
mod observation;
mod runner;
mod status;

pub use agent::{AgentCore, LifetimeStats};
pub use runner::{AgentEvent, AgentRunner};
pub use status::StatusSnapshot;
