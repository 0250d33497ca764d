pub mod chat_bridge;
pub mod content;
pub mod domain;
pub mod ports;
pub mod reply;
pub mod session_store;

pub use chat_bridge::{submit_turn, ChatBridge, TurnOutcome, FALLBACK_REPLY};
pub use content::{
    EmotionCheckIn, PrimaryEmotion, ReliefTechnique, QUICK_PROMPTS, STRESS_RELIEF_TECHNIQUES,
};
pub use domain::{
    DomainError, JournalEntry, Mood, MoodEntry, Speaker, StressEntry, StressLevel, Turn,
};
pub use ports::{ConversationService, DialogueContext, PortError, PortResult};
pub use reply::{Fragment, FragmentFallback, FragmentStream, Reply};
pub use session_store::{BucketItem, BucketName, BucketValue, SessionStore, StoreError};
