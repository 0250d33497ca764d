//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use wellness_core::{JournalEntry, MoodEntry, ReliefTechnique, Speaker, StressEntry, Turn};

//=========================================================================================
// Payloads Sent FROM the Client (Browser) TO the Server
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct MoodRequest {
    /// One of "Very Bad", "Bad", "Neutral", "Good", "Very Good". Defaults to "Neutral".
    pub mood: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MoodQuery {
    /// How many recent entries to return. Defaults to 5.
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct StressRequest {
    /// 0 to 10. Defaults to 5.
    pub level: Option<u8>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct JournalRequest {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub text: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct EmotionCheckInRequest {
    pub primary: String,
    pub secondary: String,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
pub struct StatusResponse {
    pub chat_connected: bool,
    /// Setup instructions shown while the chat is unavailable.
    pub notice: Option<String>,
}

/// The response payload sent after successfully creating a session.
#[derive(Serialize, Debug, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub chat_connected: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PromptsResponse {
    pub prompts: Vec<String>,
}

/// The result of one chat message.
///
/// `skipped` is set for blank input. A failed remote call leaves `reply` empty
/// and sets `warning`.
#[derive(Serialize, Debug, Default, ToSchema)]
pub struct ChatResponse {
    pub reply: Option<String>,
    pub warning: Option<String>,
    pub skipped: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerDto {
    User,
    Assistant,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TurnDto {
    pub speaker: SpeakerDto,
    pub text: String,
}

impl From<&Turn> for TurnDto {
    fn from(turn: &Turn) -> Self {
        let speaker = match turn.speaker {
            Speaker::User => SpeakerDto::User,
            Speaker::Assistant => SpeakerDto::Assistant,
        };
        Self {
            speaker,
            text: turn.text.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MoodEntryDto {
    pub date: NaiveDate,
    pub mood: String,
    pub notes: Option<String>,
}

impl From<&MoodEntry> for MoodEntryDto {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            date: entry.date,
            mood: entry.mood.label().to_string(),
            notes: entry.notes.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StressEntryDto {
    /// Formatted as `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    pub level: u8,
}

impl From<&StressEntry> for StressEntryDto {
    fn from(entry: &StressEntry) -> Self {
        Self {
            timestamp: entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            level: entry.level.value(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct JournalEntryDto {
    pub date: NaiveDate,
    pub text: String,
}

impl From<JournalEntry> for JournalEntryDto {
    fn from(entry: JournalEntry) -> Self {
        Self {
            date: entry.date,
            text: entry.text,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BreathingResponse {
    pub count: u64,
    pub message: String,
    pub instructions: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ReliefTechniqueDto {
    pub name: String,
    pub steps: Vec<String>,
}

impl From<&ReliefTechnique> for ReliefTechniqueDto {
    fn from(technique: &ReliefTechnique) -> Self {
        Self {
            name: technique.name.to_string(),
            steps: technique.steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct EmotionDto {
    pub primary: String,
    pub secondaries: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct EmotionCheckInResponse {
    pub primary: String,
    pub secondary: String,
    pub message: String,
}
