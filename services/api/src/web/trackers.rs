//! services/api/src/web/trackers.rs
//!
//! Handlers for the self-tracking widgets: mood, stress, journal, breathing and
//! the emotion wheel.

use crate::web::{
    protocol::{
        BreathingResponse, EmotionCheckInRequest, EmotionCheckInResponse, EmotionDto,
        JournalEntryDto, JournalRequest, MoodEntryDto, MoodQuery, MoodRequest,
        ReliefTechniqueDto, StressEntryDto, StressRequest,
    },
    state::SharedSession,
};
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Local;
use tracing::{error, info};
use wellness_core::{
    content::{breathing_message, BREATHING_INSTRUCTIONS},
    EmotionCheckIn, Mood, MoodEntry, PrimaryEmotion, StoreError, StressEntry, StressLevel,
    STRESS_RELIEF_TECHNIQUES,
};

/// How many mood entries `GET /mood` returns unless asked otherwise.
const DEFAULT_RECENT_MOODS: usize = 5;

fn store_failure(e: StoreError) -> (StatusCode, String) {
    error!("Session store rejected a write: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to save entry".to_string(),
    )
}

//=========================================================================================
// Mood
//=========================================================================================

/// Save today's mood.
#[utoipa::path(
    post,
    path = "/mood",
    request_body = MoodRequest,
    responses(
        (status = 201, description = "Mood saved successfully", body = MoodEntryDto),
        (status = 400, description = "Unknown mood")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn save_mood_handler(
    Extension(session): Extension<SharedSession>,
    Json(req): Json<MoodRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mood = match req.mood.as_deref() {
        Some(mood) => mood
            .parse::<Mood>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Mood::default(),
    };

    let entry = MoodEntry::new(Local::now().date_naive(), mood, req.notes);
    let response = MoodEntryDto::from(&entry);

    session
        .lock()
        .await
        .store
        .record_mood(entry)
        .map_err(store_failure)?;

    info!("Mood saved: {}", mood);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Recent mood entries, newest first.
#[utoipa::path(
    get,
    path = "/mood",
    responses(
        (status = 200, description = "Recent entries", body = [MoodEntryDto])
    ),
    params(
        MoodQuery,
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn list_moods_handler(
    Extension(session): Extension<SharedSession>,
    Query(query): Query<MoodQuery>,
) -> Json<Vec<MoodEntryDto>> {
    let session = session.lock().await;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_MOODS);
    Json(
        session
            .store
            .recent_moods(limit)
            .into_iter()
            .map(MoodEntryDto::from)
            .collect(),
    )
}

//=========================================================================================
// Stress
//=========================================================================================

/// Log the current stress level.
#[utoipa::path(
    post,
    path = "/stress",
    request_body = StressRequest,
    responses(
        (status = 201, description = "Stress level logged", body = StressEntryDto),
        (status = 400, description = "Level out of range")
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn log_stress_handler(
    Extension(session): Extension<SharedSession>,
    Json(req): Json<StressRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let level = match req.level {
        Some(level) => {
            StressLevel::new(level).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
        }
        None => StressLevel::default(),
    };

    let entry = StressEntry::new(Local::now().naive_local(), level);
    let response = StressEntryDto::from(&entry);

    session
        .lock()
        .await
        .store
        .log_stress(entry)
        .map_err(store_failure)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// All logged stress levels in the order they were logged.
#[utoipa::path(
    get,
    path = "/stress",
    responses(
        (status = 200, description = "Logged stress levels", body = [StressEntryDto])
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn list_stress_handler(
    Extension(session): Extension<SharedSession>,
) -> Json<Vec<StressEntryDto>> {
    let session = session.lock().await;
    Json(
        session
            .store
            .stress_entries()
            .iter()
            .map(StressEntryDto::from)
            .collect(),
    )
}

//=========================================================================================
// Journal
//=========================================================================================

/// Save the journal entry for a date, replacing any earlier entry for that date.
#[utoipa::path(
    post,
    path = "/journal",
    request_body = JournalRequest,
    responses(
        (status = 200, description = "Journal entry saved", body = JournalEntryDto)
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn save_journal_handler(
    Extension(session): Extension<SharedSession>,
    Json(req): Json<JournalRequest>,
) -> Result<Json<JournalEntryDto>, (StatusCode, String)> {
    let date = req.date.unwrap_or_else(|| Local::now().date_naive());

    let previous = session
        .lock()
        .await
        .store
        .save_journal(date, req.text.clone())
        .map_err(store_failure)?;

    if previous.is_some() {
        info!("Journal entry for {} overwritten.", date);
    }

    Ok(Json(JournalEntryDto {
        date,
        text: req.text,
    }))
}

/// All journal entries ordered by date.
#[utoipa::path(
    get,
    path = "/journal",
    responses(
        (status = 200, description = "Journal entries", body = [JournalEntryDto])
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn list_journal_handler(
    Extension(session): Extension<SharedSession>,
) -> Json<Vec<JournalEntryDto>> {
    let session = session.lock().await;
    Json(
        session
            .store
            .journal_entries()
            .into_iter()
            .map(JournalEntryDto::from)
            .collect(),
    )
}

//=========================================================================================
// Breathing Exercise
//=========================================================================================

/// Record a completed breathing exercise.
///
/// The response repeats the exercise instructions.
#[utoipa::path(
    post,
    path = "/breathing",
    responses(
        (status = 200, description = "Exercise counted", body = BreathingResponse)
    ),
    params(
        ("x-session-id" = uuid::Uuid, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn breathing_handler(
    Extension(session): Extension<SharedSession>,
) -> Result<Json<BreathingResponse>, (StatusCode, String)> {
    let count = session
        .lock()
        .await
        .store
        .complete_breathing_exercise()
        .map_err(store_failure)?;

    Ok(Json(BreathingResponse {
        count,
        message: breathing_message(count),
        instructions: BREATHING_INSTRUCTIONS.to_string(),
    }))
}

/// Quick stress relief exercises.
#[utoipa::path(
    get,
    path = "/stress-relief",
    responses(
        (status = 200, description = "Relief techniques", body = [ReliefTechniqueDto])
    )
)]
pub async fn stress_relief_handler() -> Json<Vec<ReliefTechniqueDto>> {
    Json(
        STRESS_RELIEF_TECHNIQUES
            .iter()
            .map(ReliefTechniqueDto::from)
            .collect(),
    )
}

//=========================================================================================
// Emotion Wheel
//=========================================================================================

/// The primary emotions and the feelings grouped under each.
#[utoipa::path(
    get,
    path = "/emotions",
    responses(
        (status = 200, description = "The emotion wheel", body = [EmotionDto])
    )
)]
pub async fn emotions_handler() -> Json<Vec<EmotionDto>> {
    Json(
        PrimaryEmotion::ALL
            .iter()
            .map(|emotion| EmotionDto {
                primary: emotion.label().to_string(),
                secondaries: emotion.secondaries().iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
    )
}

/// Name a feeling from the emotion wheel.
#[utoipa::path(
    post,
    path = "/emotions/check-in",
    request_body = EmotionCheckInRequest,
    responses(
        (status = 200, description = "The identified feeling", body = EmotionCheckInResponse),
        (status = 400, description = "Unknown emotion or mismatched pair")
    )
)]
pub async fn emotion_check_in_handler(
    Json(req): Json<EmotionCheckInRequest>,
) -> Result<Json<EmotionCheckInResponse>, (StatusCode, String)> {
    let check_in = EmotionCheckIn::new(&req.primary, &req.secondary)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(EmotionCheckInResponse {
        primary: check_in.primary.label().to_string(),
        secondary: check_in.secondary.to_string(),
        message: check_in.summary(),
    }))
}
