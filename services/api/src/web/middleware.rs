//! services/api/src/web/middleware.rs
//!
//! Session-resolution middleware for the session-scoped routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::web::state::{AppState, SessionId};

/// The request header carrying the session ID returned by `POST /sessions`.
pub const SESSION_HEADER: &str = "x-session-id";

/// Middleware that resolves the `x-session-id` header to a live session.
///
/// If found, inserts the `SharedSession` and its `SessionId` into request extensions
/// for handlers to use.
/// A missing or malformed header yields 400, an unknown session 404.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    // 1. Extract and parse the session header
    let session_id = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                format!("{} header is required", SESSION_HEADER),
            )
        })?;

    let session_id = Uuid::parse_str(session_id.trim()).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid {} format", SESSION_HEADER),
        )
    })?;

    // 2. Look up the live session
    let session = state.sessions.get(session_id).await.ok_or_else(|| {
        warn!("Request for unknown session {}", session_id);
        (StatusCode::NOT_FOUND, "Session not found".to_string())
    })?;

    // 3. Insert the session into request extensions
    req.extensions_mut().insert(session);
    req.extensions_mut().insert(SessionId(session_id));

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
