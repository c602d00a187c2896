//! Core type definitions for the glasshouse engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable numeric identifier for a cast member (1..=7).
///
/// Ids are externally addressable — the operator interface takes them
/// directly — and `Ord` so registry iteration order is deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NpcId(pub u8);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// One of the seven fixed personality archetypes.
///
/// The archetype governs tone vocabulary, the shaping transform applied to
/// generated text, mood jitter volatility, and the phrasing used when
/// revealing another character's location. The numbering 1..=7 matches the
/// roster ids and is stable across the operator interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    /// 1 — theatrical, ruthless, obsessed with appearances.
    Flamboyant,
    /// 2 — clinical, meticulous, speaks of itself in the third person.
    Detached,
    /// 3 — conspiracy-minded, never says the word "trust" unguarded.
    Paranoid,
    /// 4 — terse, guarded, loyal to the gang.
    Stoic,
    /// 5 — world-weary, cynical, delivers everything sideways.
    Wry,
    /// 6 — exhausted, sharp-tongued, hates the bar they drink in.
    Bitter,
    /// 7 — cryptic, poetic, speaks in fragments.
    Enigmatic,
}

impl Personality {
    /// All personalities in id order.
    pub const ALL: [Personality; 7] = [
        Self::Flamboyant,
        Self::Detached,
        Self::Paranoid,
        Self::Stoic,
        Self::Wry,
        Self::Bitter,
        Self::Enigmatic,
    ];

    /// Look up a personality by its stable 1..=7 id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id.checked_sub(1)? as usize).copied()
    }

    /// The stable 1..=7 id for this personality.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Flamboyant => 1,
            Self::Detached => 2,
            Self::Paranoid => 3,
            Self::Stoic => 4,
            Self::Wry => 5,
            Self::Bitter => 6,
            Self::Enigmatic => 7,
        }
    }

    /// How strongly this personality's mood reacts beyond the sentiment
    /// deltas.
    #[must_use]
    pub fn volatility(self) -> Volatility {
        match self {
            Self::Flamboyant | Self::Paranoid | Self::Bitter => Volatility::Volatile,
            Self::Detached | Self::Stoic | Self::Enigmatic => Volatility::Steady,
            // Wry gets no jitter at all. Observed behavior, preserved.
            Self::Wry => Volatility::Flat,
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flamboyant => "flamboyant",
            Self::Detached => "detached",
            Self::Paranoid => "paranoid",
            Self::Stoic => "stoic",
            Self::Wry => "wry",
            Self::Bitter => "bitter",
            Self::Enigmatic => "enigmatic",
        };
        write!(f, "{name}")
    }
}

/// Mood jitter class, applied after the sentiment-tier delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    /// Symmetric jitter in [-5, 5].
    Volatile,
    /// Symmetric jitter in [-2, 2].
    Steady,
    /// No jitter.
    Flat,
}

// ---------------------------------------------------------------------------
// Affiliation
// ---------------------------------------------------------------------------

/// Gang affiliation. Narrows the mood clamp range and changes the label
/// shown in persona framing and status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affiliation {
    /// Exodyne gang member — mood clamped to [20, 80].
    Exodyne,
    /// Unaffiliated — mood clamped to [0, 100].
    Stray,
}

impl Affiliation {
    /// Inclusive mood bounds for this affiliation.
    #[must_use]
    pub fn mood_bounds(self) -> (i32, i32) {
        match self {
            Self::Exodyne => (20, 80),
            Self::Stray => (0, 100),
        }
    }

    /// Display label used in prompts and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Exodyne => "Exodyne",
            Self::Stray => "Stray",
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// One directed relationship edge: how the holder views the target.
///
/// Edges are asymmetric — A's view of B is independent of B's view of A —
/// and seeded once at startup; they are never mutated in-session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Free-text description of the tie.
    pub description: String,
    /// Strength 0–100. 50 is neutral.
    pub strength: u8,
}

impl Relationship {
    /// Create a relationship edge.
    #[must_use]
    pub fn new(description: impl Into<String>, strength: u8) -> Self {
        Self {
            description: description.into(),
            strength: strength.min(100),
        }
    }

    /// The default tie returned for an unset pair. Absence of a
    /// relationship is never an error.
    #[must_use]
    pub fn default_tie() -> Self {
        Self::new("no relationship", 50)
    }
}
