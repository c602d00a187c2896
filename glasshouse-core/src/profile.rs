//! Character profile table — static, read-only data keyed by personality.
//!
//! Trait adjective lists, mood-tier vocabulary, and the greeting, farewell,
//! and fallback line pools. Every personality has a complete entry in each
//! pool; lookups that somehow miss fall back to a generic default rather
//! than failing.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::Personality;

/// Ordered trait adjectives for a personality. The first entry is the
/// primary trait and leads the persona framing in prompts.
#[must_use]
pub fn traits(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Flamboyant => &[
            "flamboyant",
            "ruthless",
            "obsessed with appearances",
            "charismatic",
            "never modest",
            "always dramatic",
        ],
        Personality::Detached => &[
            "detached",
            "meticulous",
            "amoral",
            "perfectionist",
            "never emotional",
            "always analytical",
        ],
        Personality::Paranoid => &[
            "paranoid",
            "conspiracy-minded",
            "highly intelligent",
            "volatile",
            "never trusting",
            "always suspicious",
        ],
        Personality::Stoic => &[
            "stoic",
            "adaptable",
            "fiercely independent",
            "loyal to the gang",
            "never talkative",
            "always guarded",
        ],
        Personality::Wry => &[
            "wry",
            "world-weary",
            "calculating",
            "intuitive",
            "never naive",
            "always cynical",
        ],
        Personality::Bitter => &[
            "bitter",
            "manipulative",
            "morally compromised",
            "exhausted",
            "never kind",
            "always sharp-tongued",
        ],
        Personality::Enigmatic => &[
            "enigmatic",
            "unsettling",
            "visionary",
            "poetic",
            "never direct",
            "always cryptic",
        ],
    }
}

/// Short personality description: primary trait plus the next two.
#[must_use]
pub fn description(personality: Personality) -> String {
    let traits = traits(personality);
    format!("{} ({}, {})", traits[0], traits[1], traits[2])
}

/// Mood descriptor for a mood value, personality-colored at the elated and
/// negative tiers.
#[must_use]
pub fn mood_descriptor(personality: Personality, mood: i32) -> &'static str {
    if mood > 75 {
        match personality {
            Personality::Flamboyant => "exuberant",
            Personality::Detached => "pleased",
            Personality::Paranoid => "unusually calm",
            Personality::Stoic => "content",
            Personality::Wry => "amused",
            Personality::Bitter => "satisfied",
            Personality::Enigmatic => "transcendent",
        }
    } else if mood > 60 {
        "positive"
    } else if mood > 40 {
        "neutral"
    } else if mood > 25 {
        match personality {
            Personality::Flamboyant => "irritated",
            Personality::Detached => "displeased",
            Personality::Paranoid => "agitated",
            Personality::Stoic => "tense",
            Personality::Wry => "sarcastic",
            Personality::Bitter => "hostile",
            Personality::Enigmatic => "withdrawn",
        }
    } else {
        match personality {
            Personality::Flamboyant => "furious",
            Personality::Detached => "cold",
            Personality::Paranoid => "paranoid",
            Personality::Stoic => "dangerous",
            Personality::Wry => "bitter",
            Personality::Bitter => "vicious",
            Personality::Enigmatic => "catatonic",
        }
    }
}

/// Opening line pool, drawn when the operator starts a conversation.
#[must_use]
pub fn greeting_pool(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Flamboyant => &[
            "What do you want? Can't you see I'm busy?",
            "Make it quick, I've got appearances to maintain.",
        ],
        Personality::Detached => &["State your business.", "Speak. I'm listening."],
        Personality::Paranoid => &[
            "Who sent you? What do you want?",
            "This isn't a good time... but go ahead.",
        ],
        Personality::Stoic => &["Talk.", "What is it?"],
        Personality::Wry => &["Well? What brings you here?", "Let's hear it then."],
        Personality::Bitter => &["Ugh. What now?", "Make it worth my time."],
        Personality::Enigmatic => &["...", "*silent stare*"],
    }
}

/// Closing line pool, drawn when the operator ends a conversation.
#[must_use]
pub fn farewell_pool(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Flamboyant => &[
            "Finally. Don't waste my time again.",
            "I have better things to do.",
        ],
        Personality::Detached => &["This conversation is concluded.", "We're done here."],
        Personality::Paranoid => &[
            "I knew this was a bad idea...",
            "*looks around nervously* Later.",
        ],
        Personality::Stoic => &["Enough.", "*nods*"],
        Personality::Wry => &["That's all then.", "Interesting chat. Now go."],
        Personality::Bitter => &["About damn time.", "*waves dismissively*"],
        Personality::Enigmatic => &["...", "*turns away silently*"],
    }
}

/// In-character fallback pool, used whenever generation or shaping cannot
/// produce a usable line.
#[must_use]
pub fn fallback_pool(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Flamboyant => &["*adjusts tie* How crude.", "I don't have time for this."],
        Personality::Detached => &["Irrelevant.", "Data not found."],
        Personality::Paranoid => &[
            "*looks around nervously* Not here...",
            "I can't talk about that.",
        ],
        Personality::Stoic => &["*silent stare*", "No."],
        Personality::Wry => &["*sighs* Really?", "That's not important."],
        Personality::Bitter => &["Ugh. No.", "*rolls eyes*"],
        Personality::Enigmatic => &["...", "*turns away*"],
    }
}

/// Generic shrug used when nothing more specific applies (unknown NPC,
/// empty pools).
pub const SHRUG: &str = "*shrugs*";

/// Pick a line from a pool with the injected RNG, shrugging if the pool is
/// somehow empty.
#[must_use]
pub fn pick_line<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or(SHRUG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_personality_has_complete_pools() {
        for p in Personality::ALL {
            assert!(!traits(p).is_empty());
            assert!(traits(p).len() >= 3, "description needs three traits");
            assert!(!greeting_pool(p).is_empty());
            assert!(!farewell_pool(p).is_empty());
            assert!(!fallback_pool(p).is_empty());
        }
    }

    #[test]
    fn mood_tiers_cover_full_range() {
        for p in Personality::ALL {
            for mood in [0, 25, 26, 40, 41, 60, 61, 75, 76, 100] {
                assert!(!mood_descriptor(p, mood).is_empty());
            }
        }
    }

    #[test]
    fn mid_tiers_are_shared_vocabulary() {
        assert_eq!(mood_descriptor(Personality::Flamboyant, 70), "positive");
        assert_eq!(mood_descriptor(Personality::Enigmatic, 50), "neutral");
    }

    #[test]
    fn empty_pool_falls_back_to_shrug() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_line(&[], &mut rng), SHRUG);
    }
}
