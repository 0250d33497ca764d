//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the session lifecycle endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    chat, trackers,
    protocol::{
        BreathingResponse, ChatRequest, ChatResponse, CreateSessionResponse, EmotionCheckInRequest,
        EmotionCheckInResponse, EmotionDto, JournalEntryDto, JournalRequest, MoodEntryDto,
        MoodRequest, PromptsResponse, ReliefTechniqueDto, SpeakerDto, StatusResponse,
        StressEntryDto, StressRequest, TurnDto,
    },
    state::{AppState, SessionId, SharedSession},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use wellness_core::{content::SETUP_NOTICE, QUICK_PROMPTS};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        status_handler,
        create_session_handler,
        delete_session_handler,
        reset_session_handler,
        prompts_handler,
        chat::chat_handler,
        chat::history_handler,
        trackers::save_mood_handler,
        trackers::list_moods_handler,
        trackers::log_stress_handler,
        trackers::list_stress_handler,
        trackers::save_journal_handler,
        trackers::list_journal_handler,
        trackers::breathing_handler,
        trackers::stress_relief_handler,
        trackers::emotions_handler,
        trackers::emotion_check_in_handler,
    ),
    components(
        schemas(
            StatusResponse, CreateSessionResponse, PromptsResponse, ChatRequest, ChatResponse,
            TurnDto, SpeakerDto, MoodRequest, MoodEntryDto, StressRequest, StressEntryDto,
            JournalRequest, JournalEntryDto, BreathingResponse, ReliefTechniqueDto, EmotionDto,
            EmotionCheckInRequest, EmotionCheckInResponse,
        )
    ),
    tags(
        (name = "Wellness Companion API", description = "Chat and self-tracking endpoints for the wellness companion.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Report whether the chat API is configured.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    )
)]
pub async fn status_handler(State(app_state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let chat_connected = app_state.chat_configured();
    Json(StatusResponse {
        chat_connected,
        notice: (!chat_connected).then(|| SETUP_NOTICE.to_string()),
    })
}

/// Create a new session with empty trackers and a fresh chat dialogue.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let (session_id, session) = app_state.open_session().await;
    let chat_connected = session.lock().await.bridge.is_connected();

    let response = CreateSessionResponse {
        session_id,
        chat_connected,
    };
    (StatusCode::CREATED, Json(response))
}

/// End a session, dropping its trackers, transcript and remote dialogue.
#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> StatusCode {
    if app_state.sessions.remove(session_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Clear every tracker and the chat transcript of the session.
///
/// The remote dialogue is kept.
#[utoipa::path(
    post,
    path = "/session/reset",
    responses(
        (status = 204, description = "Session state cleared"),
        (status = 404, description = "Session not found")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn reset_session_handler(Extension(session): Extension<SharedSession>) -> StatusCode {
    session.lock().await.store.reset();
    info!("Session state reset.");
    StatusCode::NO_CONTENT
}

/// List the quick conversation starters.
#[utoipa::path(
    get,
    path = "/prompts",
    responses(
        (status = 200, description = "Quick prompts", body = PromptsResponse)
    )
)]
pub async fn prompts_handler() -> Json<PromptsResponse> {
    Json(PromptsResponse {
        prompts: QUICK_PROMPTS.iter().map(|p| p.to_string()).collect(),
    })
}
