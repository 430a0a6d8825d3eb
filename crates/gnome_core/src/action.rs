//! Actions a mind can request.
//!
//! Exactly one concrete variant per instance; produced by `Mind::think`,
//! consumed once by the agent core, in order.

use crate::context::ActionContext;
use crate::state::MindState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A requested effect with an executable behavior and a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Speak { message: String },
    Rest { pulses: u32 },
    Research { query: String },
}

/// Discriminant carried on results so the agent can react per kind without
/// re-matching the originating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    Speak,
    Rest { pulses: u32 },
    Research { query: String },
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    pub kind: ActionKind,
}

impl ActionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            kind: ActionKind::Error,
        }
    }
}

impl Action {
    /// How this action shows up in the UI while executing.
    pub fn display_state(&self) -> MindState {
        match self {
            Action::Speak { .. } => MindState::Speaking,
            Action::Rest { .. } => MindState::Resting,
            Action::Research { .. } => MindState::Researching,
        }
    }

    /// Execute the action against the tick's context snapshot.
    pub async fn execute(&self, _context: &ActionContext) -> anyhow::Result<ActionResult> {
        match self {
            Action::Speak { message } => Ok(ActionResult {
                success: true,
                message: message.clone(),
                kind: ActionKind::Speak,
            }),
            Action::Rest { pulses } => Ok(ActionResult {
                success: true,
                message: "...".to_string(),
                kind: ActionKind::Rest { pulses: *pulses },
            }),
            Action::Research { query } => {
                // Research is a stand-in effect: it takes noticeable time and
                // reports what it looked into.
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(ActionResult {
                    success: true,
                    message: format!("I researched: {query}"),
                    kind: ActionKind::Research {
                        query: query.clone(),
                    },
                })
            }
        }
    }
}
