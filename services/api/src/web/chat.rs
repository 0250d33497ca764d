//! services/api/src/web/chat.rs
//!
//! Handlers for sending chat messages and reading the transcript.

use crate::web::{
    protocol::{ChatRequest, ChatResponse, TurnDto},
    state::SharedSession,
};
use axum::{http::StatusCode, response::Json, Extension};
use std::time::Instant;
use tracing::{error, info};
use wellness_core::{submit_turn, TurnOutcome};

/// Send a message to the wellness companion.
///
/// Blocks until the whole reply has been received. Blank messages are skipped.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The outcome of the message", body = ChatResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn chat_handler(
    Extension(session): Extension<SharedSession>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let start_time = Instant::now();
    let mut guard = session.lock().await;
    let session = &mut *guard;

    let outcome = submit_turn(&mut session.bridge, &mut session.store, &req.message)
        .await
        .map_err(|e| {
            error!("Failed to record chat turn: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record chat turn".to_string(),
            )
        })?;

    let response = match outcome {
        TurnOutcome::Skipped => ChatResponse {
            skipped: true,
            ..Default::default()
        },
        TurnOutcome::Replied(reply) => {
            info!("⏱️ Chat turn took: {:?}", start_time.elapsed());
            ChatResponse {
                reply: Some(reply),
                ..Default::default()
            }
        }
        TurnOutcome::Failed { warning } => ChatResponse {
            warning: Some(warning),
            ..Default::default()
        },
    };

    Ok(Json(response))
}

/// The chat transcript in display order.
#[utoipa::path(
    get,
    path = "/chat/history",
    responses(
        (status = 200, description = "The transcript", body = [TurnDto]),
        (status = 404, description = "Session not found")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn history_handler(Extension(session): Extension<SharedSession>) -> Json<Vec<TurnDto>> {
    let session = session.lock().await;
    Json(session.store.transcript().iter().map(TurnDto::from).collect())
}
