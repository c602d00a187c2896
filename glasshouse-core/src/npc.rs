//! Per-character mutable state — mood, relationships, history, memory.
//!
//! One [`Npc`] record exists per cast member, created once at world seed
//! time and mutated continuously through the session. Relationships are
//! seeded once and read-only thereafter; everything else (mood, history,
//! memory, topics) is append-or-update only.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::profile;
use crate::types::{Affiliation, NpcId, Personality, Relationship, Volatility};

/// Importance below or at this value is not worth remembering.
///
/// Call sites pass whole-number importances, so in practice only
/// importance >= 1 qualifies. Preserved as observed; flagged for review.
const MEMORY_THRESHOLD: f32 = 0.5;

/// One recorded mood change. Written only when the value actually moved.
#[derive(Debug, Clone, Serialize)]
pub struct MoodShift {
    /// Wall-clock time of the change.
    pub at: DateTime<Utc>,
    /// Mood before the update.
    pub from: i32,
    /// Mood after the update.
    pub to: i32,
    /// Signed delta (`to - from`).
    pub delta: i32,
}

/// A long-term memory entry.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryFact {
    /// The remembered statement.
    pub fact: String,
    /// When it was stored.
    pub at: DateTime<Utc>,
    /// How much it mattered at storage time.
    pub importance: f32,
}

/// Running sentiment statistics for one conversation topic.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TopicStat {
    /// Incrementally maintained weighted-average sentiment.
    pub sentiment: f32,
    /// How many times the topic has come up.
    pub count: u32,
}

/// Mutable state for one cast member.
#[derive(Debug, Clone)]
pub struct Npc {
    /// Stable roster id.
    pub id: NpcId,
    /// Display name.
    pub name: String,
    /// Personality archetype.
    pub personality: Personality,
    /// Gang affiliation; determines the mood clamp range.
    pub affiliation: Affiliation,
    /// Current mood, always within `affiliation.mood_bounds()`.
    pub mood: i32,
    /// Directed relationship edges, seeded once at startup.
    relationships: BTreeMap<NpcId, Relationship>,
    /// Full conversation log (player and NPC lines, alternating). Only the
    /// most recent lines feed prompts; the whole log persists for reports.
    pub conversation_history: Vec<String>,
    /// Timestamped mood deltas.
    pub mood_history: Vec<MoodShift>,
    /// Facts retained past the importance threshold.
    pub long_term_memory: Vec<MemoryFact>,
    /// Topic → running weighted-average sentiment.
    pub topics: BTreeMap<String, TopicStat>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Npc {
    /// Create a cast member at neutral mood with no history.
    #[must_use]
    pub fn new(
        id: NpcId,
        name: impl Into<String>,
        personality: Personality,
        affiliation: Affiliation,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            personality,
            affiliation,
            mood: 50,
            relationships: BTreeMap::new(),
            conversation_history: Vec::new(),
            mood_history: Vec::new(),
            long_term_memory: Vec::new(),
            topics: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Apply a sentiment score in [-1, 1] to the mood.
    ///
    /// Tiered deltas (±15 past ±0.5, ±8 past ±0.2), then volatility jitter,
    /// then the affiliation clamp. A mood-history entry is recorded only if
    /// the value actually changed.
    pub fn update_mood<R: Rng + ?Sized>(&mut self, sentiment_score: f32, rng: &mut R) {
        let old_mood = self.mood;

        self.mood += if sentiment_score < -0.5 {
            -15
        } else if sentiment_score < -0.2 {
            -8
        } else if sentiment_score > 0.5 {
            15
        } else if sentiment_score > 0.2 {
            8
        } else {
            0
        };

        match self.personality.volatility() {
            Volatility::Volatile => self.mood += rng.gen_range(-5..=5),
            Volatility::Steady => self.mood += rng.gen_range(-2..=2),
            Volatility::Flat => {}
        }

        let (lo, hi) = self.affiliation.mood_bounds();
        self.mood = self.mood.clamp(lo, hi);

        if self.mood != old_mood {
            debug!(npc = %self.name, from = old_mood, to = self.mood, "mood shifted");
            self.mood_history.push(MoodShift {
                at: Utc::now(),
                from: old_mood,
                to: self.mood,
                delta: self.mood - old_mood,
            });
        }
    }

    /// Seed a directed relationship edge toward another cast member.
    pub fn add_relationship(&mut self, target: NpcId, description: impl Into<String>, strength: u8) {
        self.relationships
            .insert(target, Relationship::new(description, strength));
    }

    /// How this NPC views the target. An unset pair yields the neutral
    /// default tie; absence is never an error.
    #[must_use]
    pub fn relationship_to(&self, target: NpcId) -> Relationship {
        self.relationships
            .get(&target)
            .cloned()
            .unwrap_or_else(Relationship::default_tie)
    }

    /// All seeded relationship edges in target-id order.
    #[must_use]
    pub fn relationships(&self) -> &BTreeMap<NpcId, Relationship> {
        &self.relationships
    }

    /// Store a fact, if it clears the importance threshold.
    pub fn remember_fact(&mut self, fact: impl Into<String>, importance: f32) {
        if importance > MEMORY_THRESHOLD {
            self.long_term_memory.push(MemoryFact {
                fact: fact.into(),
                at: Utc::now(),
                importance,
            });
        }
    }

    /// Fold a new sentiment sample into the topic's running average.
    pub fn track_topic(&mut self, topic: impl Into<String>, sentiment: f32) {
        let stat = self.topics.entry(topic.into()).or_default();
        let count = stat.count as f32;
        stat.sentiment = (stat.sentiment * count + sentiment) / (count + 1.0);
        stat.count += 1;
    }

    /// Current mood descriptor from the personality vocabulary.
    #[must_use]
    pub fn mood_descriptor(&self) -> &'static str {
        profile::mood_descriptor(self.personality, self.mood)
    }

    /// Short personality description for menus and reports.
    #[must_use]
    pub fn personality_description(&self) -> String {
        profile::description(self.personality)
    }

    /// Read-only status projection. Pure; takes no locks and mutates
    /// nothing.
    #[must_use]
    pub fn snapshot(&self) -> NpcSnapshot {
        let last = |n: usize, len: usize| len.saturating_sub(n);
        NpcSnapshot {
            id: self.id,
            name: self.name.clone(),
            personality_id: self.personality.id(),
            personality_description: self.personality_description(),
            traits: profile::traits(self.personality)
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            affiliation: self.affiliation.label().to_string(),
            mood: self.mood,
            mood_descriptor: self.mood_descriptor().to_string(),
            recent_mood_shifts: self.mood_history[last(5, self.mood_history.len())..].to_vec(),
            relationships: self.relationships.clone(),
            recent_history: self.conversation_history
                [last(3, self.conversation_history.len())..]
                .to_vec(),
            recent_facts: self.long_term_memory[last(3, self.long_term_memory.len())..]
                .iter()
                .map(|m| m.fact.clone())
                .collect(),
            topics: self.topics.clone(),
            created_at: self.created_at,
        }
    }
}

/// Read-only status report for one NPC — the operator-facing projection.
#[derive(Debug, Clone, Serialize)]
pub struct NpcSnapshot {
    /// Roster id.
    pub id: NpcId,
    /// Display name.
    pub name: String,
    /// Stable personality id (1..=7).
    pub personality_id: u8,
    /// Primary trait plus two secondaries.
    pub personality_description: String,
    /// Full trait adjective list.
    pub traits: Vec<String>,
    /// Affiliation label.
    pub affiliation: String,
    /// Current mood value.
    pub mood: i32,
    /// Current mood descriptor.
    pub mood_descriptor: String,
    /// Last 5 mood deltas.
    pub recent_mood_shifts: Vec<MoodShift>,
    /// Full relationship map.
    pub relationships: BTreeMap<NpcId, Relationship>,
    /// Last 3 conversation lines.
    pub recent_history: Vec<String>,
    /// Last 3 remembered facts.
    pub recent_facts: Vec<String>,
    /// Full topic-sentiment map.
    pub topics: BTreeMap<String, TopicStat>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
