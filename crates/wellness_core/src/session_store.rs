//! crates/wellness_core/src/session_store.rs
//!
//! The per-session, in-memory store of everything the user enters.
//!
//! State is kept in named buckets that are created lazily on first write. The
//! store is owned by exactly one session and is never shared, so it carries no
//! locking of its own.

use crate::domain::{JournalEntry, MoodEntry, StressEntry, Turn};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

//=========================================================================================
// Buckets
//=========================================================================================

/// The named slots a session can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketName {
    ChatHistory,
    MoodHistory,
    StressLevel,
    JournalEntries,
    BreathingCount,
}

impl BucketName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketName::ChatHistory => "chat_history",
            BucketName::MoodHistory => "mood_history",
            BucketName::StressLevel => "stress_level",
            BucketName::JournalEntries => "journal_entries",
            BucketName::BreathingCount => "breathing_count",
        }
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value held by a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketValue {
    Transcript(Vec<Turn>),
    Moods(Vec<MoodEntry>),
    Stress(Vec<StressEntry>),
    Journal(BTreeMap<NaiveDate, String>),
    Counter(u64),
}

impl BucketValue {
    /// The empty value a bucket starts out with.
    pub fn empty_for(name: BucketName) -> Self {
        match name {
            BucketName::ChatHistory => BucketValue::Transcript(Vec::new()),
            BucketName::MoodHistory => BucketValue::Moods(Vec::new()),
            BucketName::StressLevel => BucketValue::Stress(Vec::new()),
            BucketName::JournalEntries => BucketValue::Journal(BTreeMap::new()),
            BucketName::BreathingCount => BucketValue::Counter(0),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            BucketValue::Transcript(_) => "transcript",
            BucketValue::Moods(_) => "mood list",
            BucketValue::Stress(_) => "stress list",
            BucketValue::Journal(_) => "journal",
            BucketValue::Counter(_) => "counter",
        }
    }
}

/// An item that can be appended to a sequence bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketItem {
    Turn(Turn),
    Mood(MoodEntry),
    Stress(StressEntry),
}

impl BucketItem {
    fn kind(&self) -> &'static str {
        match self {
            BucketItem::Turn(_) => "chat turn",
            BucketItem::Mood(_) => "mood entry",
            BucketItem::Stress(_) => "stress entry",
        }
    }
}

/// Misuse of a bucket: writing before initialization or with the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Bucket '{0}' has not been initialized")]
    Uninitialized(BucketName),
    #[error("Bucket '{bucket}' holds a {found}, not a sequence")]
    NotASequence { bucket: BucketName, found: &'static str },
    #[error("Bucket '{bucket}' holds a {found}, not a keyed mapping")]
    NotKeyed { bucket: BucketName, found: &'static str },
    #[error("Bucket '{bucket}' holds a {found}, not a counter")]
    NotACounter { bucket: BucketName, found: &'static str },
    #[error("Cannot append a {item} to bucket '{bucket}' holding a {found}")]
    ItemMismatch {
        bucket: BucketName,
        item: &'static str,
        found: &'static str,
    },
}

//=========================================================================================
// SessionStore
//=========================================================================================

/// All state entered during one session.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    buckets: HashMap<BucketName, BucketValue>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket's value, storing `default` first if the bucket is absent.
    pub fn get_or_init(&mut self, name: BucketName, default: BucketValue) -> &mut BucketValue {
        self.buckets.entry(name).or_insert(default)
    }

    pub fn get(&self, name: BucketName) -> Option<&BucketValue> {
        self.buckets.get(&name)
    }

    /// Adds `item` to the end of the sequence held by `name`.
    pub fn append(&mut self, name: BucketName, item: BucketItem) -> Result<(), StoreError> {
        let bucket = self
            .buckets
            .get_mut(&name)
            .ok_or(StoreError::Uninitialized(name))?;

        match (bucket, item) {
            (BucketValue::Transcript(turns), BucketItem::Turn(turn)) => turns.push(turn),
            (BucketValue::Moods(moods), BucketItem::Mood(entry)) => moods.push(entry),
            (BucketValue::Stress(levels), BucketItem::Stress(entry)) => levels.push(entry),
            (bucket, item) => {
                let found = bucket.kind();
                return Err(match bucket {
                    BucketValue::Journal(_) | BucketValue::Counter(_) => StoreError::NotASequence {
                        bucket: name,
                        found,
                    },
                    _ => StoreError::ItemMismatch {
                        bucket: name,
                        item: item.kind(),
                        found,
                    },
                });
            }
        }
        Ok(())
    }

    /// Inserts or overwrites the value stored under `key`, returning the previous value.
    pub fn set(
        &mut self,
        name: BucketName,
        key: NaiveDate,
        value: String,
    ) -> Result<Option<String>, StoreError> {
        match self.buckets.get_mut(&name) {
            Some(BucketValue::Journal(entries)) => Ok(entries.insert(key, value)),
            Some(other) => Err(StoreError::NotKeyed {
                bucket: name,
                found: other.kind(),
            }),
            None => Err(StoreError::Uninitialized(name)),
        }
    }

    /// Adds one to a counter bucket and returns the new count.
    pub fn increment(&mut self, name: BucketName) -> Result<u64, StoreError> {
        match self.buckets.get_mut(&name) {
            Some(BucketValue::Counter(count)) => {
                *count += 1;
                Ok(*count)
            }
            Some(other) => Err(StoreError::NotACounter {
                bucket: name,
                found: other.kind(),
            }),
            None => Err(StoreError::Uninitialized(name)),
        }
    }

    /// Drops every bucket; the next access starts from empty again.
    pub fn reset(&mut self) {
        self.buckets.clear();
    }

    fn ensure(&mut self, name: BucketName) {
        self.get_or_init(name, BucketValue::empty_for(name));
    }

    // --- Typed writers ---

    pub fn record_turn(&mut self, turn: Turn) -> Result<(), StoreError> {
        self.ensure(BucketName::ChatHistory);
        self.append(BucketName::ChatHistory, BucketItem::Turn(turn))
    }

    pub fn record_mood(&mut self, entry: MoodEntry) -> Result<(), StoreError> {
        self.ensure(BucketName::MoodHistory);
        self.append(BucketName::MoodHistory, BucketItem::Mood(entry))
    }

    pub fn log_stress(&mut self, entry: StressEntry) -> Result<(), StoreError> {
        self.ensure(BucketName::StressLevel);
        self.append(BucketName::StressLevel, BucketItem::Stress(entry))
    }

    /// Saves the journal text for `date`, replacing any earlier text for that date.
    pub fn save_journal(&mut self, date: NaiveDate, text: String) -> Result<Option<String>, StoreError> {
        self.ensure(BucketName::JournalEntries);
        self.set(BucketName::JournalEntries, date, text)
    }

    pub fn complete_breathing_exercise(&mut self) -> Result<u64, StoreError> {
        self.ensure(BucketName::BreathingCount);
        self.increment(BucketName::BreathingCount)
    }

    // --- Typed readers (an absent bucket reads as empty) ---

    pub fn transcript(&self) -> &[Turn] {
        match self.get(BucketName::ChatHistory) {
            Some(BucketValue::Transcript(turns)) => turns,
            _ => &[],
        }
    }

    pub fn mood_entries(&self) -> &[MoodEntry] {
        match self.get(BucketName::MoodHistory) {
            Some(BucketValue::Moods(moods)) => moods,
            _ => &[],
        }
    }

    /// The last `limit` mood entries, newest first.
    pub fn recent_moods(&self, limit: usize) -> Vec<&MoodEntry> {
        self.mood_entries().iter().rev().take(limit).collect()
    }

    pub fn stress_entries(&self) -> &[StressEntry] {
        match self.get(BucketName::StressLevel) {
            Some(BucketValue::Stress(levels)) => levels,
            _ => &[],
        }
    }

    pub fn journal_entry(&self, date: NaiveDate) -> Option<&str> {
        match self.get(BucketName::JournalEntries) {
            Some(BucketValue::Journal(entries)) => entries.get(&date).map(String::as_str),
            _ => None,
        }
    }

    /// All journal entries ordered by date.
    pub fn journal_entries(&self) -> Vec<JournalEntry> {
        match self.get(BucketName::JournalEntries) {
            Some(BucketValue::Journal(entries)) => entries
                .iter()
                .map(|(date, text)| JournalEntry {
                    date: *date,
                    text: text.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn breathing_count(&self) -> u64 {
        match self.get(BucketName::BreathingCount) {
            Some(BucketValue::Counter(count)) => *count,
            _ => 0,
        }
    }
}
