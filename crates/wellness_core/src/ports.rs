//! crates/wellness_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete conversational API it talks to.

use async_trait::async_trait;
use crate::reply::Reply;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Remote service error: {0}")]
    Remote(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A factory for remote dialogue contexts, built once from the API credential.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Opens a fresh dialogue with an empty history.
    async fn start_dialogue(&self) -> PortResult<Box<dyn DialogueContext>>;
}

/// One running conversation on the remote side.
///
/// The context owns the conversational memory; callers only hand it the next
/// user utterance.
#[async_trait]
pub trait DialogueContext: Send {
    async fn send(&mut self, text: &str) -> PortResult<Reply>;
}
