//! crates/wellness_core/src/chat_bridge.rs
//!
//! The bridge between a session and its remote dialogue, plus the chat-turn
//! pathway that records both sides of an exchange in the session store.

use crate::domain::Turn;
use crate::ports::{ConversationService, DialogueContext, PortResult};
use crate::reply::FragmentFallback;
use crate::session_store::{SessionStore, StoreError};
use tracing::{info, warn};

/// Returned for every message while no API credential is configured.
pub const FALLBACK_REPLY: &str = "I'm sorry, but I'm not connected to the Gemini API right now. Please check your API key configuration.";

enum BridgeState {
    Uninitialized,
    Connected(Box<dyn DialogueContext>),
}

/// Owns one session's remote dialogue.
pub struct ChatBridge {
    state: BridgeState,
    fallback: FragmentFallback,
}

impl ChatBridge {
    /// A bridge that answers every message with [`FALLBACK_REPLY`].
    pub fn uninitialized() -> Self {
        Self {
            state: BridgeState::Uninitialized,
            fallback: FragmentFallback::default(),
        }
    }

    pub fn connected(dialogue: Box<dyn DialogueContext>, fallback: FragmentFallback) -> Self {
        Self {
            state: BridgeState::Connected(dialogue),
            fallback,
        }
    }

    /// Opens a dialogue on `service` if there is one.
    ///
    /// A missing service or a failure to open the dialogue leaves the bridge
    /// uninitialized for the rest of the session.
    pub async fn connect(
        service: Option<&dyn ConversationService>,
        fallback: FragmentFallback,
    ) -> Self {
        let Some(service) = service else {
            return Self::uninitialized();
        };

        match service.start_dialogue().await {
            Ok(dialogue) => {
                info!("Remote dialogue established.");
                Self::connected(dialogue, fallback)
            }
            Err(e) => {
                warn!("API connection error: {}", e);
                Self::uninitialized()
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, BridgeState::Connected(_))
    }

    /// Sends one utterance and waits for the whole reply.
    pub async fn send(&mut self, question: &str) -> PortResult<String> {
        match &mut self.state {
            BridgeState::Uninitialized => Ok(FALLBACK_REPLY.to_string()),
            BridgeState::Connected(dialogue) => {
                let reply = dialogue.send(question).await?;
                reply.accumulate(self.fallback).await
            }
        }
    }
}

//=========================================================================================
// Chat-turn pathway
//=========================================================================================

/// What happened to one submitted chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The input was blank; nothing was sent or recorded.
    Skipped,
    /// Both turns were recorded.
    Replied(String),
    /// The user's turn was recorded but the remote call failed.
    Failed { warning: String },
}

/// Runs one chat exchange against `bridge`, recording it in `store`.
pub async fn submit_turn(
    bridge: &mut ChatBridge,
    store: &mut SessionStore,
    input: &str,
) -> Result<TurnOutcome, StoreError> {
    if input.trim().is_empty() {
        return Ok(TurnOutcome::Skipped);
    }

    store.record_turn(Turn::user(input))?;

    match bridge.send(input).await {
        Ok(reply) => {
            store.record_turn(Turn::assistant(reply.clone()))?;
            Ok(TurnOutcome::Replied(reply))
        }
        Err(e) => {
            warn!("Error getting response: {}", e);
            Ok(TurnOutcome::Failed {
                warning: format!("Error getting response: {}", e),
            })
        }
    }
}
