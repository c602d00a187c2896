//! Response generation pipeline and the engine façade.
//!
//! The [`DialogueEngine`] is the explicit context object the operator
//! interface talks to. For each player line it runs: disclosure policy →
//! sentiment/mood update → prompt assembly → backend attempts with a
//! temperature ramp → shaping → history append. Every failure terminates
//! in an in-character string; callers never see a raw error from
//! [`DialogueEngine::generate`].
//!
//! Lock discipline: the engine RNG lock is always taken before any NPC
//! lock, and no lock is ever held across the backend `.await`.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::disclosure;
use crate::error::{EngineError, Result};
use crate::npc::{Npc, NpcSnapshot};
use crate::profile;
use crate::sentiment::SentimentScorer;
use crate::shaping::{self, MentionedTie};
use crate::types::{NpcId, Personality};
use crate::world::{RosterEntry, SystemEvent, World};

/// Player lines this polarized get written into long-term memory.
const MEMORABLE_POLARITY: f32 = 0.75;
/// Beyond this the line is memorable enough to count double.
const SEARING_POLARITY: f32 = 0.9;

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// Sampling parameters for one backend request.
///
/// Derived from [`GenerationConfig`](crate::config::GenerationConfig), with
/// the temperature ramped per retry attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Top-k cutoff.
    pub top_k: u32,
    /// Maximum new tokens.
    pub max_new_tokens: u32,
    /// No-repeat n-gram constraint size.
    pub no_repeat_ngram: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// The external text-generation backend.
///
/// Given a prompt, returns the generated continuation only (no prompt
/// echo). Implementations should honor `params.timeout_ms`; an `Err` from
/// this seam maps to the in-character fallback path, never to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `prompt`.
    async fn complete(&self, prompt: &str, params: SamplingParams) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Candidate validation and the retry state machine
// ---------------------------------------------------------------------------

/// Validator verdict on one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject,
}

/// Character-consistency validation for a raw candidate.
///
/// Rejection is not an error — it triggers a hotter retry.
fn validate(candidate: &str, personality: Personality) -> Verdict {
    if candidate.is_empty() {
        return Verdict::Reject;
    }
    if personality == Personality::Paranoid && candidate.to_lowercase().contains("trust") {
        return Verdict::Reject;
    }
    if personality == Personality::Enigmatic && candidate.split_whitespace().count() < 4 {
        // Short responses are in character here.
        return Verdict::Accept;
    }
    Verdict::Accept
}

/// State of the attempt loop: try → validate → accept, retry hotter, or
/// exhaust and keep the last candidate.
#[derive(Debug)]
enum AttemptState {
    Pending { attempt: u32, last: String },
    Accepted(String),
    Exhausted(String),
}

impl AttemptState {
    fn advance(self, candidate: String, personality: Personality, max_attempts: u32) -> Self {
        let Self::Pending { attempt, .. } = self else {
            return self;
        };
        match validate(&candidate, personality) {
            Verdict::Accept => Self::Accepted(candidate),
            Verdict::Reject if attempt + 1 >= max_attempts => Self::Exhausted(candidate),
            Verdict::Reject => Self::Pending {
                attempt: attempt + 1,
                last: candidate,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The conversational engine: world registry, sentiment scorer, generation
/// backend, and a seeded RNG, behind one context object.
pub struct DialogueEngine {
    world: World,
    scorer: SentimentScorer,
    generator: Arc<dyn TextGenerator>,
    config: EngineConfig,
    rng: Mutex<StdRng>,
}

impl DialogueEngine {
    /// Build an engine over a freshly seeded world.
    ///
    /// The RNG comes from `config.general.seed` when set, otherwise from
    /// entropy.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, config: EngineConfig) -> Self {
        let rng = match config.general.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::seed(),
            scorer: SentimentScorer::lexicon(),
            generator,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// The underlying world registry (event log, locations).
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Roster listing for the operator interface.
    #[must_use]
    pub fn list(&self) -> Vec<RosterEntry> {
        self.world.roster()
    }

    /// Status snapshot for one character.
    ///
    /// # Errors
    /// Returns [`EngineError::UnknownNpc`] for an id outside the roster.
    pub fn status(&self, npc_id: NpcId) -> Result<NpcSnapshot> {
        self.world
            .snapshot(npc_id)
            .ok_or(EngineError::UnknownNpc(npc_id))
    }

    /// Recent system events, oldest first.
    #[must_use]
    pub fn recent_events(&self, n: usize) -> Vec<SystemEvent> {
        self.world.recent_events(n)
    }

    /// Opening line for a conversation with this character.
    #[must_use]
    pub fn greeting(&self, npc_id: NpcId) -> String {
        self.pool_line(npc_id, profile::greeting_pool)
    }

    /// Closing line when the operator walks away.
    #[must_use]
    pub fn farewell(&self, npc_id: NpcId) -> String {
        self.pool_line(npc_id, profile::farewell_pool)
    }

    fn pool_line(
        &self,
        npc_id: NpcId,
        pool: fn(Personality) -> &'static [&'static str],
    ) -> String {
        let mut rng = self.rng.lock();
        self.world
            .with_npc(npc_id, |npc| {
                profile::pick_line(pool(npc.personality), &mut *rng).to_string()
            })
            .unwrap_or_else(|| profile::SHRUG.to_string())
    }

    /// Produce an in-character response to a player line.
    ///
    /// Never fails: unknown ids shrug, backend failures fall back, empty
    /// input is a no-op turn that leaves all state untouched.
    pub async fn generate(&self, npc_id: NpcId, player_input: &str) -> String {
        if player_input.trim().is_empty() {
            return profile::SHRUG.to_string();
        }
        let Some(asker) = self.world.with_npc(npc_id, |npc| npc.clone()) else {
            return profile::SHRUG.to_string();
        };

        // Location queries bypass generation and leave mood alone.
        let disclosed = {
            let mut rng = self.rng.lock();
            disclosure::respond(&self.world, &asker, player_input, &mut *rng)
        };
        if let Some(line) = disclosed {
            debug!(npc = %asker.name, "disclosure policy engaged");
            return line;
        }

        let score = self.scorer.score(player_input);
        let mentioned = self.mentioned_npc(npc_id, player_input);

        {
            let mut rng = self.rng.lock();
            self.world.with_npc(npc_id, |npc| {
                npc.update_mood(score, &mut *rng);
                if let Some((_, name)) = &mentioned {
                    npc.track_topic(name.to_lowercase(), score);
                }
                if score.abs() > MEMORABLE_POLARITY {
                    let importance = if score.abs() > SEARING_POLARITY { 2.0 } else { 1.0 };
                    npc.remember_fact(format!("Player said: {player_input}"), importance);
                }
            });
        }

        // Re-read after the mood update so the prompt sees fresh state.
        let Some(asker) = self.world.with_npc(npc_id, |npc| npc.clone()) else {
            return profile::SHRUG.to_string();
        };

        let tie = mentioned.as_ref().map(|(id, name)| MentionedTie {
            name: name.clone(),
            strength: asker.relationship_to(*id).strength,
        });

        let prompt = self.build_prompt(&asker, mentioned.as_ref(), player_input);

        let candidate = match self.attempt_candidates(&prompt, asker.personality).await {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(npc = %asker.name, error = %e, "generation backend failed");
                self.world
                    .log_event(format!("Error generating response: {e}"));
                let mut rng = self.rng.lock();
                return shaping::fallback_line(asker.personality, &mut *rng);
            }
        };

        let response = {
            let mut rng = self.rng.lock();
            let shaped = shaping::enforce_consistency(&candidate, &asker, tie.as_ref(), &mut *rng);
            if shaped.is_empty() {
                shaping::fallback_line(asker.personality, &mut *rng)
            } else {
                shaped
            }
        };

        self.world.with_npc(npc_id, |npc| {
            npc.conversation_history.push(format!("Player: {player_input}"));
            npc.conversation_history
                .push(format!("{}: {response}", npc.name));
        });

        response
    }

    /// Run the attempt state machine: up to `max_attempts` backend calls
    /// with the temperature ramped each retry; an exhausted loop keeps the
    /// last candidate regardless.
    async fn attempt_candidates(&self, prompt: &str, personality: Personality) -> Result<String> {
        let generation = &self.config.generation;
        let max_attempts = generation.max_attempts.max(1);

        let mut state = AttemptState::Pending {
            attempt: 0,
            last: String::new(),
        };
        loop {
            let attempt = match &state {
                AttemptState::Pending { attempt, .. } => *attempt,
                AttemptState::Accepted(_) | AttemptState::Exhausted(_) => break,
            };
            let params = SamplingParams {
                temperature: generation.base_temperature
                    + generation.temperature_step * attempt as f32,
                top_p: generation.top_p,
                top_k: generation.top_k,
                max_new_tokens: generation.max_new_tokens,
                no_repeat_ngram: generation.no_repeat_ngram,
                timeout_ms: generation.timeout_ms,
            };
            debug!(attempt, temperature = params.temperature, "requesting candidate");
            let raw = self.generator.complete(prompt, params).await?;
            let candidate = first_line(&raw);
            state = state.advance(candidate, personality, max_attempts);
        }

        match state {
            AttemptState::Accepted(candidate) => Ok(candidate),
            AttemptState::Exhausted(candidate) => {
                debug!("validator exhausted; using last candidate");
                Ok(candidate)
            }
            AttemptState::Pending { last, .. } => Ok(last),
        }
    }

    /// First other character whose name appears in the player line, in
    /// registry order.
    fn mentioned_npc(&self, speaker: NpcId, player_input: &str) -> Option<(NpcId, String)> {
        let input = player_input.to_lowercase();
        self.world
            .names()
            .into_iter()
            .filter(|(id, _)| *id != speaker)
            .find(|(_, name)| input.contains(&name.to_lowercase()))
    }

    /// Assemble the structured persona prompt.
    fn build_prompt(
        &self,
        npc: &Npc,
        mentioned: Option<&(NpcId, String)>,
        player_input: &str,
    ) -> String {
        let traits = profile::traits(npc.personality);
        let location = self.world.location_of(npc.id).unwrap_or("in the bar");

        let mut relationship_context = Vec::new();
        if let Some((id, name)) = mentioned {
            let tie = npc.relationship_to(*id);
            relationship_context.push(format!(
                "Relationship with {name}: {} (strength: {}/100)",
                tie.description, tie.strength
            ));
        }
        for (id, tie) in npc.relationships() {
            if mentioned.is_some_and(|(m, _)| m == id) {
                continue;
            }
            if let Some(other) = self.world.with_npc(*id, |other| other.name.clone()) {
                relationship_context.push(format!("Knows {other} as: {}", tie.description));
            }
        }

        let history = npc.conversation_history
            [npc.conversation_history.len().saturating_sub(3)..]
            .join("\n");
        let history = if history.is_empty() {
            "First interaction".to_string()
        } else {
            history
        };

        format!(
            "You are {name}, a character with these strict traits: {traits} ({affiliation}).\n\
             Current location: {location}\n\
             Core personality rules you MUST follow:\n\
             - Never break character or acknowledge being an AI\n\
             - Always respond according to your primary trait: {primary}\n\
             - Mood only affects tone, not core behavior\n\
             - Relationships must strongly influence responses\n\
             \n\
             Current emotional state: {mood}\n\
             Relationship context:\n\
             {relationships}\n\
             \n\
             Recent conversation:\n\
             {history}\n\
             \n\
             Player: {input}\n\
             {name}:",
            name = npc.name,
            traits = traits.join(", "),
            affiliation = npc.affiliation.label(),
            location = location,
            primary = traits.first().copied().unwrap_or("mysterious"),
            mood = npc.mood_descriptor(),
            relationships = relationship_context.join("\n"),
            history = history,
            input = player_input,
        )
    }

}

fn first_line(raw: &str) -> String {
    raw.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_rejected() {
        assert_eq!(validate("", Personality::Wry), Verdict::Reject);
    }

    #[test]
    fn paranoid_rejects_trust_talk() {
        assert_eq!(
            validate("You can Trust me completely.", Personality::Paranoid),
            Verdict::Reject
        );
        assert_eq!(
            validate("You can trust me.", Personality::Wry),
            Verdict::Accept
        );
    }

    #[test]
    fn enigmatic_short_lines_accepted() {
        assert_eq!(validate("The glass...", Personality::Enigmatic), Verdict::Accept);
    }

    #[test]
    fn attempt_machine_accepts_first_valid() {
        let state = AttemptState::Pending {
            attempt: 0,
            last: String::new(),
        };
        let state = state.advance("Fine.".to_string(), Personality::Wry, 3);
        assert!(matches!(state, AttemptState::Accepted(s) if s == "Fine."));
    }

    #[test]
    fn attempt_machine_exhausts_to_last() {
        let mut state = AttemptState::Pending {
            attempt: 0,
            last: String::new(),
        };
        for i in 0..3 {
            state = state.advance(format!("trust me {i}"), Personality::Paranoid, 3);
        }
        assert!(matches!(state, AttemptState::Exhausted(s) if s == "trust me 2"));
    }

    #[test]
    fn first_line_takes_head_and_trims() {
        assert_eq!(first_line("  one line \nsecond"), "one line");
        assert_eq!(first_line(""), "");
    }
}
