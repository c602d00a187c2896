//! # Glasshouse Core Library
//!
//! Conversational state engine for a small fixed cast of bar patrons.
//!
//! Every character gets a mutable [`Npc`] record — mood, relationship map,
//! conversation log, long-term memory, topic tracker — owned by a single
//! [`World`] registry. The [`DialogueEngine`] turns free-text player input
//! into an in-character line of dialogue:
//!
//! - **Disclosure** — "where is X?" questions resolved by a
//!   relationship/mood-weighted reveal policy, bypassing generation.
//! - **Sentiment** — player text scored in [-1, 1] with a per-call street
//!   lexicon overlay, driving tiered mood updates.
//! - **Generation** — a structured persona prompt sent to an external
//!   backend behind the [`TextGenerator`] seam, retried with a temperature
//!   ramp until a validator accepts the candidate.
//! - **Shaping** — deterministic + seeded-random transforms that force the
//!   raw candidate back into personality, mood, and relationship register.
//!
//! Every failure path terminates in a displayable in-character string;
//! nothing raw ever reaches the player.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod disclosure;
pub mod error;
pub mod npc;
pub mod pipeline;
pub mod profile;
pub mod sentiment;
pub mod shaping;
pub mod types;
pub mod world;

pub use config::EngineConfig;
pub use error::EngineError;
pub use npc::{Npc, NpcSnapshot};
pub use pipeline::{DialogueEngine, SamplingParams, TextGenerator};
pub use sentiment::SentimentScorer;
pub use types::*;
pub use world::World;
