//! crates/wellness_core/src/content.rs
//!
//! Fixed wellness content: quick prompts, relaxation exercises, the emotion wheel
//! and user-facing notices.

use crate::domain::DomainError;
use std::fmt;
use std::str::FromStr;

/// Conversation starters offered next to the chat box.
pub const QUICK_PROMPTS: [&str; 4] = [
    "How are you feeling today?",
    "Suggest something to help reduce stress",
    "Can you help me track my mood?",
    "I'd like a quick journaling prompt",
];

/// Shown once when the chat API credential is missing.
pub const SETUP_NOTICE: &str = "Not connected to Gemini API. To enable the chatbot: \
1. Create a .env file in your project directory \
2. Add your Gemini API key: GOOGLE_API_KEY=your_api_key_here \
3. Restart the application. \
You can still use the wellness tools while offline.";

/// The paced breathing exercise counted by the breathing tracker.
pub const BREATHING_INSTRUCTIONS: &str =
    "Take a deep breath in for 4 seconds, hold for 4 seconds, exhale for 4 seconds.";

pub fn breathing_message(completed: u64) -> String {
    format!(
        "Great job! You've completed {} breathing exercises.",
        completed
    )
}

/// A short exercise offered under "Quick Stress Relief".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliefTechnique {
    pub name: &'static str,
    pub steps: &'static [&'static str],
}

pub const STRESS_RELIEF_TECHNIQUES: [ReliefTechnique; 2] = [
    ReliefTechnique {
        name: "3-3-3 Grounding Technique",
        steps: &[
            "Name 3 things you see",
            "Name 3 things you hear",
            "Move 3 parts of your body",
        ],
    },
    ReliefTechnique {
        name: "Body Scan",
        steps: &[
            "Take a moment to mentally scan your body from head to toe.",
            "Notice any areas of tension and consciously relax them.",
        ],
    },
];

//=========================================================================================
// Emotion Wheel
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryEmotion {
    Joy,
    Sadness,
    Fear,
    Disgust,
    Anger,
    Surprise,
}

impl PrimaryEmotion {
    pub const ALL: [PrimaryEmotion; 6] = [
        PrimaryEmotion::Joy,
        PrimaryEmotion::Sadness,
        PrimaryEmotion::Fear,
        PrimaryEmotion::Disgust,
        PrimaryEmotion::Anger,
        PrimaryEmotion::Surprise,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "Joy",
            PrimaryEmotion::Sadness => "Sadness",
            PrimaryEmotion::Fear => "Fear",
            PrimaryEmotion::Disgust => "Disgust",
            PrimaryEmotion::Anger => "Anger",
            PrimaryEmotion::Surprise => "Surprise",
        }
    }

    /// The more specific feelings grouped under this emotion.
    pub fn secondaries(&self) -> &'static [&'static str] {
        match self {
            PrimaryEmotion::Joy => &["Happy", "Grateful", "Inspired", "Proud", "Excited", "Content"],
            PrimaryEmotion::Sadness => &[
                "Disappointed",
                "Grieving",
                "Lonely",
                "Vulnerable",
                "Despair",
                "Neglected",
            ],
            PrimaryEmotion::Fear => &["Scared", "Anxious", "Insecure", "Helpless", "Worried", "Overwhelmed"],
            PrimaryEmotion::Disgust => &[
                "Disapproval",
                "Judgmental",
                "Avoidance",
                "Revulsion",
                "Aversion",
                "Loathing",
            ],
            PrimaryEmotion::Anger => &[
                "Frustrated",
                "Annoyed",
                "Irritated",
                "Resentful",
                "Enraged",
                "Exasperated",
            ],
            PrimaryEmotion::Surprise => &[
                "Amazed",
                "Confused",
                "Stunned",
                "Shocked",
                "Dismayed",
                "Disoriented",
            ],
        }
    }
}

impl fmt::Display for PrimaryEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PrimaryEmotion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimaryEmotion::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownEmotion(s.to_string()))
    }
}

/// A validated primary/secondary emotion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionCheckIn {
    pub primary: PrimaryEmotion,
    pub secondary: &'static str,
}

impl EmotionCheckIn {
    pub fn new(primary: &str, secondary: &str) -> Result<Self, DomainError> {
        let primary: PrimaryEmotion = primary.parse()?;
        let secondary = primary
            .secondaries()
            .iter()
            .copied()
            .find(|s| s.eq_ignore_ascii_case(secondary.trim()))
            .ok_or_else(|| DomainError::EmotionMismatch {
                primary: primary.label().to_string(),
                secondary: secondary.to_string(),
            })?;
        Ok(Self { primary, secondary })
    }

    pub fn summary(&self) -> String {
        format!("You're feeling: {} (a form of {})", self.secondary, self.primary)
    }
}
