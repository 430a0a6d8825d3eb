//! Background tick driver.
//!
//! The core itself never spawns threads; this runner is the one external
//! driver, calling `tick()` on a fixed cadence and relaying narrated
//! messages to whoever holds the receiver. It shuts down when the agent
//! stops or the receiver is dropped.

use crate::agent::AgentCore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A tick produced a narrated message.
    Message(String),
    /// The agent is no longer running; no further events will arrive.
    Stopped,
}

pub struct AgentRunner {
    agent: Arc<AgentCore>,
    tick_interval: Duration,
    event_tx: mpsc::Sender<AgentEvent>,
}

impl AgentRunner {
    /// Returns `(runner, receiver)` — the receiver yields the agent's
    /// narrated output.
    pub fn new(
        agent: Arc<AgentCore>,
        tick_interval: Duration,
    ) -> (Self, mpsc::Receiver<AgentEvent>) {
        let (event_tx, event_rx) = mpsc::channel(64);
        (
            Self {
                agent,
                tick_interval,
                event_tx,
            },
            event_rx,
        )
    }

    /// Spawn the tick loop. Runs until the agent stops or the receiver is
    /// dropped.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if !self.agent.is_running().await {
                    let _ = self.event_tx.send(AgentEvent::Stopped).await;
                    return;
                }

                match self.agent.tick().await {
                    Ok(Some(message)) => {
                        match self.event_tx.try_send(AgentEvent::Message(message)) {
                            Ok(()) => {}
                            Err(mpsc::error::TrySendError::Full(_)) => {
                                tracing::warn!("AgentRunner: event channel full, dropping message");
                            }
                            Err(mpsc::error::TrySendError::Closed(_)) => {
                                tracing::info!("AgentRunner: receiver dropped, shutting down");
                                return;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("AgentRunner tick error: {}", e);
                    }
                }
            }
        })
    }
}
