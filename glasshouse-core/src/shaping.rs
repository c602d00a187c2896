//! Response shaping — the consistency enforcer.
//!
//! A raw candidate from the generation backend is rarely safe to print.
//! This stage runs a fixed-order transform pipeline over it: meta-commentary
//! guard, aside stripping, terminal punctuation, the per-personality rewrite,
//! thematic word substitutions, mood tone shifts, and the relationship-colored
//! prefix. Order matters; the guard short-circuits everything else.

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::OnceLock;

use crate::npc::Npc;
use crate::profile;
use crate::types::Personality;

/// Phrases that break character. Any hit anywhere in the candidate swaps
/// the whole response for a fallback line.
const FORBIDDEN_PHRASES: &[&str] = &[
    "as an ai",
    "language model",
    "i don't have personal",
    "i don't actually",
    "i'm just an ai",
    "my programming",
];

/// Below this mood the tone shifts kick in.
const SOUR_MOOD: i32 = 30;

/// A mentioned character and the speaker's tie to them, for the
/// relationship prefix step.
#[derive(Debug, Clone)]
pub struct MentionedTie {
    /// Display name of the mentioned character.
    pub name: String,
    /// The speaker's relationship strength toward them.
    pub strength: u8,
}

fn aside_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(.*?\)|\[.*?\]").expect("aside regex is valid"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

/// In-character fallback line for a personality.
#[must_use]
pub fn fallback_line<R: Rng + ?Sized>(personality: Personality, rng: &mut R) -> String {
    profile::pick_line(profile::fallback_pool(personality), rng).to_string()
}

/// Whether the candidate contains meta-commentary that breaks character.
#[must_use]
pub fn breaks_character(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    FORBIDDEN_PHRASES.iter().any(|p| lower.contains(p))
}

/// Run the full shaping pipeline over a raw candidate.
///
/// Deterministic given the RNG; an empty result is possible (asides-only
/// input) and is the caller's cue to fall back.
#[must_use]
pub fn enforce_consistency<R: Rng + ?Sized>(
    raw: &str,
    npc: &Npc,
    mentioned: Option<&MentionedTie>,
    rng: &mut R,
) -> String {
    // 1. Meta-commentary guard — short-circuits every other step.
    if breaks_character(raw) {
        return fallback_line(npc.personality, rng);
    }

    // 2. Strip parenthetical/bracketed asides, collapse whitespace.
    let stripped = aside_re().replace_all(raw, "");
    let mut response = whitespace_re()
        .replace_all(stripped.trim(), " ")
        .into_owned();

    // 3. Terminal punctuation.
    if !response.is_empty() && !response.ends_with(['.', '!', '?']) {
        let ending = ['.', '!']
            .choose(rng)
            .copied()
            .unwrap_or('.');
        if rng.gen_bool(1.0 / 3.0) {
            response.push_str("...");
        } else {
            response.push(ending);
        }
    }

    // 4. Personality rewrite.
    response = personality_rewrite(response, npc.personality, rng);

    // 5. Thematic substitutions.
    response = thematic_substitution(response, npc.personality);

    // 6. Mood tone shift.
    if npc.mood < SOUR_MOOD {
        response = sour_tone(response, npc.personality);
    }

    // 7. Relationship-colored prefix.
    if let Some(tie) = mentioned {
        response = relationship_prefix(response, tie);
    }

    response
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn personality_rewrite<R: Rng + ?Sized>(
    mut response: String,
    personality: Personality,
    rng: &mut R,
) -> String {
    match personality {
        Personality::Flamboyant => {
            if word_count(&response) < 5 && !response.contains(['!', '~']) {
                response = format!("{response} Darling~");
            } else if rng.gen_bool(0.3) {
                response = response.replacen("I ", "I, darling, ", 1);
            }
        }
        Personality::Detached => {
            if word_count(&response) > 15 {
                if let Some(first) = response.split(". ").next() {
                    response = format!("{first}.");
                }
            }
            response = response
                .replace("I ", "This unit ")
                .replace(" me ", " this unit ");
        }
        Personality::Paranoid => {
            if response.contains('?') && rng.gen_bool(0.6) {
                response = response.replace('?', "??");
            }
            if !response.ends_with(['!', '?']) {
                while response.ends_with('.') {
                    response.pop();
                }
                response.push_str("...");
            }
        }
        Personality::Stoic => {
            if word_count(&response) > 8 {
                let head: Vec<&str> = response.split_whitespace().take(5).collect();
                response = format!("{}.", head.join(" "));
            }
        }
        Personality::Enigmatic => {
            if word_count(&response) > 8 {
                let head: Vec<&str> = response.split_whitespace().take(8).collect();
                response = format!("{}...", head.join(" "));
            }
        }
        Personality::Wry | Personality::Bitter => {}
    }
    response
}

fn thematic_substitution(mut response: String, personality: Personality) -> String {
    if matches!(
        personality,
        Personality::Flamboyant | Personality::Wry | Personality::Enigmatic
    ) && response.to_lowercase().contains("window")
    {
        response = response.replace("window", "glass");
    }

    if response.to_lowercase().contains("bar") {
        match personality {
            // Jinx owns the taps.
            Personality::Paranoid => response = response.replace("bar", "my bar"),
            Personality::Bitter => response = response.replace("bar", "this dump"),
            _ => {}
        }
    }

    response
}

fn sour_tone(mut response: String, personality: Personality) -> String {
    match personality {
        Personality::Flamboyant | Personality::Bitter => {
            if !response.contains(['!', '?']) && !response.contains("...") {
                if response.ends_with('.') {
                    response.pop();
                }
                response.push('!');
            }
        }
        Personality::Stoic | Personality::Wry => {
            response = response.to_lowercase();
        }
        _ => {}
    }
    response
}

fn relationship_prefix(response: String, tie: &MentionedTie) -> String {
    let lower = response.to_lowercase();
    if tie.strength > 60 {
        let already_warm = ["friend", "trust", "good", "like"]
            .iter()
            .any(|w| lower.contains(w));
        if !already_warm {
            return format!("{}'s alright. {response}", tie.name);
        }
    } else if tie.strength < 40 {
        let already_cold = ["hate", "dislike", "annoy", "problem"]
            .iter()
            .any(|w| lower.contains(w));
        if !already_cold {
            return format!("Don't talk to me about {}. {response}", tie.name);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Affiliation, NpcId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn npc(personality: Personality) -> Npc {
        Npc::new(NpcId(1), "Test", personality, Affiliation::Stray)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn meta_commentary_always_yields_fallback() {
        let npc = npc(Personality::Detached);
        let cases = [
            "As an AI, I cannot say.",
            "well, my PROGRAMMING forbids it",
            "I don't have personal opinions about Rook",
            "I'm just an AI (sorry)",
        ];
        for raw in cases {
            let mut rng = rng();
            let shaped = enforce_consistency(raw, &npc, None, &mut rng);
            assert!(
                profile::fallback_pool(Personality::Detached).contains(&shaped.as_str()),
                "{raw:?} -> {shaped:?}"
            );
        }
    }

    #[test]
    fn strips_asides_and_collapses_whitespace() {
        let npc = npc(Personality::Wry);
        let mut rng = rng();
        let shaped = enforce_consistency(
            "Fine (rolls eyes)   by   me [stage direction].",
            &npc,
            None,
            &mut rng,
        );
        assert_eq!(shaped, "Fine by me .");
    }

    #[test]
    fn appends_terminal_punctuation() {
        let npc = npc(Personality::Wry);
        let mut rng = rng();
        let shaped = enforce_consistency("sure whatever", &npc, None, &mut rng);
        let last = shaped.chars().last().expect("non-empty");
        assert!(matches!(last, '.' | '!'));
    }

    #[test]
    fn flamboyant_pads_short_lines() {
        let npc = npc(Personality::Flamboyant);
        let mut rng = rng();
        let shaped = enforce_consistency("How rude.", &npc, None, &mut rng);
        assert!(shaped.ends_with("Darling~"), "{shaped:?}");
    }

    #[test]
    fn detached_truncates_and_depersonalizes() {
        let npc = npc(Personality::Detached);
        let mut rng = rng();
        let raw = "I counted the glasses twice tonight because the totals did not reconcile at all. The second count matched.";
        let shaped = enforce_consistency(raw, &npc, None, &mut rng);
        assert!(shaped.starts_with("This unit counted"));
        assert!(!shaped.contains("The second count"));
    }

    #[test]
    fn paranoid_forces_ellipsis() {
        let npc = npc(Personality::Paranoid);
        let mut rng = rng();
        let shaped = enforce_consistency("They watch the door.", &npc, None, &mut rng);
        assert!(shaped.ends_with("..."), "{shaped:?}");
        assert!(!shaped.ends_with("...."), "{shaped:?}");
    }

    #[test]
    fn stoic_truncates_to_five_words() {
        let npc = npc(Personality::Stoic);
        let mut rng = rng();
        let shaped = enforce_consistency(
            "The shipment comes in late tonight through the old service door.",
            &npc,
            None,
            &mut rng,
        );
        assert_eq!(shaped, "The shipment comes in late.");
    }

    #[test]
    fn enigmatic_truncates_to_eight_words() {
        let npc = npc(Personality::Enigmatic);
        let mut rng = rng();
        let shaped = enforce_consistency(
            "The glass remembers every face that ever looked into it at night.",
            &npc,
            None,
            &mut rng,
        );
        assert_eq!(shaped, "The glass remembers every face that ever looked...");
    }

    #[test]
    fn window_becomes_glass_for_dreamers() {
        let npc = npc(Personality::Enigmatic);
        let mut rng = rng();
        let shaped = enforce_consistency("Look at the window.", &npc, None, &mut rng);
        assert!(shaped.contains("glass"));
        assert!(!shaped.contains("window"));
    }

    #[test]
    fn bitter_renames_the_bar() {
        let npc = npc(Personality::Bitter);
        let mut rng = rng();
        let shaped = enforce_consistency("I work at this bar.", &npc, None, &mut rng);
        assert!(shaped.contains("this dump"));
    }

    #[test]
    fn sour_stoic_goes_lowercase() {
        let mut stoic = npc(Personality::Stoic);
        stoic.mood = 20;
        let mut rng = rng();
        let shaped = enforce_consistency("Leave It Alone.", &stoic, None, &mut rng);
        assert_eq!(shaped, "leave it alone.");
    }

    #[test]
    fn sour_bitter_gets_exclamation() {
        let mut bitter = npc(Personality::Bitter);
        bitter.mood = 20;
        let mut rng = rng();
        let shaped = enforce_consistency("Go away.", &bitter, None, &mut rng);
        assert!(shaped.ends_with('!'), "{shaped:?}");
    }

    #[test]
    fn warm_tie_gets_prefix_unless_already_warm() {
        let npc = npc(Personality::Wry);
        let tie = MentionedTie {
            name: "Rook".to_string(),
            strength: 80,
        };
        let mut rng = rng();
        let shaped = enforce_consistency("He was here earlier.", &npc, Some(&tie), &mut rng);
        assert!(shaped.starts_with("Rook's alright. "), "{shaped:?}");

        let mut rng = self::rng();
        let already = enforce_consistency("He is a good man.", &npc, Some(&tie), &mut rng);
        assert!(!already.starts_with("Rook's"), "{already:?}");
    }

    #[test]
    fn cold_tie_gets_dismissal_unless_already_cold() {
        let npc = npc(Personality::Wry);
        let tie = MentionedTie {
            name: "Vesper".to_string(),
            strength: 25,
        };
        let mut rng = rng();
        let shaped = enforce_consistency("She was here earlier.", &npc, Some(&tie), &mut rng);
        assert!(shaped.starts_with("Don't talk to me about Vesper. "), "{shaped:?}");

        let mut rng = self::rng();
        let already = enforce_consistency("I hate her.", &npc, Some(&tie), &mut rng);
        assert!(!already.starts_with("Don't talk"), "{already:?}");
    }

    #[test]
    fn neutral_tie_gets_no_prefix() {
        let npc = npc(Personality::Wry);
        let tie = MentionedTie {
            name: "Vesper".to_string(),
            strength: 50,
        };
        let mut rng = rng();
        let shaped = enforce_consistency("She was here earlier.", &npc, Some(&tie), &mut rng);
        assert_eq!(shaped, "She was here earlier.");
    }

    #[test]
    fn asides_only_input_shapes_to_empty() {
        let npc = npc(Personality::Wry);
        let mut rng = rng();
        let shaped = enforce_consistency("(nothing but stage direction)", &npc, None, &mut rng);
        assert!(shaped.is_empty());
    }
}
