//! Sentiment scoring with a per-call lexicon overlay.
//!
//! The engine only needs a scalar compound polarity in [-1, 1] per player
//! line, plus a handful of in-universe words the stock lexicon cannot know
//! ("exodyne" is a threat, not a noun). The overlay is an immutable
//! per-call argument rather than a mutate-and-revert on shared state, so
//! concurrent calls can never observe each other's injected terms and no
//! critical section is needed.

use std::sync::Arc;

/// A compound-polarity sentiment backend.
///
/// `overlay` extends the model's lexicon for this call only; overlay
/// valences win over the base lexicon on conflict. Implementations must
/// not retain overlay terms across calls.
pub trait SentimentModel: Send + Sync {
    /// Score `text`, returning a compound polarity in [-1, 1].
    fn polarity(&self, text: &str, overlay: &[(&str, f32)]) -> f32;
}

/// Fixed valences for in-universe jargon, applied on every scorer call.
/// Same -4..4 scale as the base lexicon.
const STREET_LEXICON: &[(&str, f32)] = &[
    ("exodyne", -1.5),
    ("stray", -0.5),
    ("target", -1.0),
    ("rumor", -0.7),
];

/// Domain adapter over a [`SentimentModel`].
///
/// Applies the street lexicon as a call-scoped overlay and clamps the
/// result. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn SentimentModel>,
}

impl SentimentScorer {
    /// Wrap a sentiment backend.
    #[must_use]
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self { model }
    }

    /// Scorer backed by the built-in lexicon model.
    #[must_use]
    pub fn lexicon() -> Self {
        Self::new(Arc::new(LexiconModel::default()))
    }

    /// Compound polarity of `text` in [-1, 1], street lexicon applied.
    #[must_use]
    pub fn score(&self, text: &str) -> f32 {
        self.model
            .polarity(text, STREET_LEXICON)
            .clamp(-1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Built-in lexicon model
// ---------------------------------------------------------------------------

/// Normalization constant: compound = sum / sqrt(sum² + ALPHA).
const ALPHA: f32 = 15.0;
/// Valence multiplier when a token is negated.
const NEGATION_SCALAR: f32 = -0.74;
/// Valence multiplier when a token is boosted ("very", "really", ...).
const BOOST_SCALAR: f32 = 1.25;
/// Emphasis added per trailing exclamation mark (capped at 3).
const EXCLAIM_EMPHASIS: f32 = 0.292;

/// Rule-based compound scorer over a small conversational lexicon.
///
/// Token valences on a -4..4 scale, a two-token negation window, booster
/// words, exclamation emphasis, and the usual x/sqrt(x²+α) squash. Not a
/// research-grade model — just enough signal to drive mood tiers.
#[derive(Debug, Default)]
pub struct LexiconModel;

/// Base valences. Deliberately small: the mood update only distinguishes
/// five tiers, so coverage matters more than precision.
const BASE_LEXICON: &[(&str, f32)] = &[
    // positive
    ("amazing", 2.8),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("friend", 2.2),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("help", 1.7),
    ("kind", 2.4),
    ("like", 1.5),
    ("love", 3.2),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("respect", 2.1),
    ("safe", 1.8),
    ("thank", 1.9),
    ("thanks", 1.9),
    ("trust", 2.3),
    ("wonderful", 2.7),
    // negative
    ("afraid", -1.9),
    ("annoying", -1.8),
    ("awful", -2.7),
    ("bad", -2.5),
    ("coward", -2.0),
    ("dangerous", -2.2),
    ("dead", -2.9),
    ("die", -2.9),
    ("dump", -1.5),
    ("enemy", -2.2),
    ("fear", -1.9),
    ("hate", -2.7),
    ("idiot", -2.3),
    ("kill", -3.1),
    ("liar", -2.6),
    ("lie", -1.8),
    ("pathetic", -2.6),
    ("problem", -1.6),
    ("scum", -2.8),
    ("stupid", -2.4),
    ("terrible", -2.8),
    ("threat", -2.3),
    ("trash", -2.2),
    ("ugly", -2.1),
    ("useless", -1.9),
    ("worthless", -2.7),
    ("wrong", -1.4),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "ain't", "can't", "didn't", "doesn't",
    "don't", "isn't", "shouldn't", "wasn't", "won't", "wouldn't",
];

const BOOSTERS: &[&str] = &["very", "really", "so", "extremely", "absolutely", "totally"];

impl LexiconModel {
    fn valence_of(token: &str, overlay: &[(&str, f32)]) -> Option<f32> {
        overlay
            .iter()
            .chain(BASE_LEXICON.iter())
            .find(|(word, _)| *word == token)
            .map(|(_, v)| *v)
    }
}

impl SentimentModel for LexiconModel {
    fn polarity(&self, text: &str, overlay: &[(&str, f32)]) -> f32 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .collect();

        let mut sum = 0.0_f32;
        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = Self::valence_of(token, overlay) else {
                continue;
            };
            // Look back two tokens for negation and boosting.
            let window = &tokens[i.saturating_sub(2)..i];
            if window.iter().any(|t| NEGATORS.contains(t)) {
                valence *= NEGATION_SCALAR;
            }
            if window.iter().any(|t| BOOSTERS.contains(t)) {
                valence *= BOOST_SCALAR;
            }
            sum += valence;
        }

        if sum != 0.0 {
            let exclaims = text.chars().filter(|&c| c == '!').take(3).count();
            let emphasis = exclaims as f32 * EXCLAIM_EMPHASIS;
            sum += if sum > 0.0 { emphasis } else { -emphasis };
        }

        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn neutral_text_scores_zero() {
        let scorer = SentimentScorer::lexicon();
        assert_eq!(scorer.score("where is the door"), 0.0);
    }

    #[test]
    fn insult_crosses_strong_negative_tier() {
        let scorer = SentimentScorer::lexicon();
        let score = scorer.score("You're worthless");
        assert!(score < -0.5, "got {score}");
    }

    #[test]
    fn praise_scores_positive() {
        let scorer = SentimentScorer::lexicon();
        assert!(scorer.score("you did a great job, thanks") > 0.5);
    }

    #[test]
    fn negation_flips_valence() {
        let scorer = SentimentScorer::lexicon();
        let plain = scorer.score("you are good");
        let negated = scorer.score("you are not good");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn exclamation_amplifies() {
        let scorer = SentimentScorer::lexicon();
        assert!(scorer.score("I hate you!!!") < scorer.score("I hate you"));
    }

    #[test]
    fn street_lexicon_applies_per_call() {
        let scorer = SentimentScorer::lexicon();
        // "exodyne" means nothing to the bare model, but the scorer's
        // overlay gives it weight.
        let bare = LexiconModel.polarity("exodyne is after you", &[]);
        let scored = scorer.score("exodyne is after you");
        assert_eq!(bare, 0.0);
        assert!(scored < 0.0);
    }

    #[test]
    fn overlay_does_not_leak_between_calls() {
        let model = LexiconModel;
        let with_overlay = model.polarity("the package arrived", &[("package", -2.0)]);
        let after = model.polarity("the package arrived", &[]);
        assert!(with_overlay < 0.0);
        assert_eq!(after, 0.0);
    }

    #[test]
    fn concurrent_calls_match_sequential() {
        let scorer = SentimentScorer::lexicon();
        let text_a = "exodyne put a target on you";
        let text_b = "heard a rumor about a stray";
        let seq_a = scorer.score(text_a);
        let seq_b = scorer.score(text_b);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let scorer = scorer.clone();
                thread::spawn(move || {
                    let text = if i % 2 == 0 { text_a } else { text_b };
                    (i % 2 == 0, scorer.score(text))
                })
            })
            .collect();
        for handle in handles {
            let (is_a, score) = handle.join().expect("thread panicked");
            assert_eq!(score, if is_a { seq_a } else { seq_b });
        }
    }

    #[test]
    fn result_always_in_unit_interval() {
        let scorer = SentimentScorer::lexicon();
        let pile = "kill die hate scum trash worthless awful terrible pathetic";
        let score = scorer.score(pile);
        assert!((-1.0..=1.0).contains(&score));
        assert!(score < -0.8);
    }
}
