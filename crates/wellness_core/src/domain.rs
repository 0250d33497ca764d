//! crates/wellness_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Domain Errors
//=========================================================================================

/// Errors raised when user-supplied values cannot form a valid domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Stress level must be between 0 and {max}, got {0}", max = StressLevel::MAX)]
    StressLevelOutOfRange(u8),
    #[error("Unknown mood: {0}")]
    UnknownMood(String),
    #[error("Unknown primary emotion: {0}")]
    UnknownEmotion(String),
    #[error("'{secondary}' is not a form of {primary}")]
    EmotionMismatch { primary: String, secondary: String },
}

//=========================================================================================
// Chat Transcript
//=========================================================================================

/// Who produced a turn in the chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// A single entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

//=========================================================================================
// Mood Tracking
//=========================================================================================

/// The 5-point ordinal mood scale, from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Mood {
    VeryBad,
    Bad,
    #[default]
    Neutral,
    Good,
    VeryGood,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::VeryBad,
        Mood::Bad,
        Mood::Neutral,
        Mood::Good,
        Mood::VeryGood,
    ];

    /// The label shown to the user, e.g. "Very Good".
    pub fn label(&self) -> &'static str {
        match self {
            Mood::VeryBad => "Very Bad",
            Mood::Bad => "Bad",
            Mood::Neutral => "Neutral",
            Mood::Good => "Good",
            Mood::VeryGood => "Very Good",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = DomainError;

    /// Accepts both display labels ("Very Good") and snake case ("very_good").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "verybad" => Ok(Mood::VeryBad),
            "bad" => Ok(Mood::Bad),
            "neutral" => Ok(Mood::Neutral),
            "good" => Ok(Mood::Good),
            "verygood" => Ok(Mood::VeryGood),
            _ => Err(DomainError::UnknownMood(s.to_string())),
        }
    }
}

/// One saved mood check-in. Several entries may share the same date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
    pub notes: Option<String>,
}

impl MoodEntry {
    /// Blank notes are stored as `None`.
    pub fn new(date: NaiveDate, mood: Mood, notes: Option<String>) -> Self {
        let notes = notes.filter(|n| !n.trim().is_empty());
        Self { date, mood, notes }
    }
}

//=========================================================================================
// Stress Tracking
//=========================================================================================

/// A stress rating on the 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StressLevel(u8);

impl StressLevel {
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, DomainError> {
        if level > Self::MAX {
            return Err(DomainError::StressLevelOutOfRange(level));
        }
        Ok(Self(level))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for StressLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for StressLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

/// One logged stress reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressEntry {
    pub timestamp: NaiveDateTime,
    pub level: StressLevel,
}

impl StressEntry {
    /// Stress readings are kept with minute precision.
    pub fn new(timestamp: NaiveDateTime, level: StressLevel) -> Self {
        let timestamp = timestamp
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(timestamp);
        Self { timestamp, level }
    }
}

//=========================================================================================
// Journal
//=========================================================================================

/// A journal entry; there is at most one per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_parses_labels_and_snake_case() {
        assert_eq!("Very Good".parse::<Mood>().unwrap(), Mood::VeryGood);
        assert_eq!("very_bad".parse::<Mood>().unwrap(), Mood::VeryBad);
        assert_eq!(" neutral ".parse::<Mood>().unwrap(), Mood::Neutral);
        assert!(matches!(
            "ecstatic".parse::<Mood>(),
            Err(DomainError::UnknownMood(_))
        ));
    }

    #[test]
    fn mood_scale_is_ordered() {
        assert!(Mood::VeryBad < Mood::Bad);
        assert!(Mood::Good < Mood::VeryGood);
        assert_eq!(Mood::default(), Mood::Neutral);
        assert_eq!(Mood::VeryGood.to_string(), "Very Good");
    }

    #[test]
    fn blank_mood_notes_become_none() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = MoodEntry::new(date, Mood::Good, Some("   ".to_string()));
        assert_eq!(entry.notes, None);

        let entry = MoodEntry::new(date, Mood::Good, Some("slept well".to_string()));
        assert_eq!(entry.notes.as_deref(), Some("slept well"));
    }

    #[test]
    fn stress_level_bounds() {
        assert_eq!(StressLevel::new(0).unwrap().value(), 0);
        assert_eq!(StressLevel::new(10).unwrap().value(), 10);
        assert_eq!(
            StressLevel::new(11),
            Err(DomainError::StressLevelOutOfRange(11))
        );
        assert_eq!(StressLevel::default().value(), 5);
    }

    #[test]
    fn stress_entry_truncates_to_minutes() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(14, 32, 47, 250)
            .unwrap();
        let entry = StressEntry::new(timestamp, StressLevel::default());
        assert_eq!(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 14:32:00");
    }
}
