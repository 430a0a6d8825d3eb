//! # Autognome minds
//!
//! Concrete [`gnome_core::Mind`] strategies. Only the mock strategy lives in
//! this tree; anything backed by an external model plugs in through the same
//! factory seam.

mod factory;
mod mock;

pub use factory::build_mind;
pub use mock::MockMind;
