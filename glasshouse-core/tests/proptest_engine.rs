//! Property-based tests — structural invariants under random input.
//!
//! Mood clamping, sentiment range, reveal-chance bounds, and shaping
//! guarantees must hold for arbitrary inputs, not just the scripted cases.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use glasshouse_core::disclosure::reveal_chance;
use glasshouse_core::npc::Npc;
use glasshouse_core::sentiment::SentimentScorer;
use glasshouse_core::shaping::{self, MentionedTie};
use glasshouse_core::{Affiliation, NpcId, Personality};

fn personality_strategy() -> impl Strategy<Value = Personality> {
    prop::sample::select(Personality::ALL.to_vec())
}

fn affiliation_strategy() -> impl Strategy<Value = Affiliation> {
    prop_oneof![Just(Affiliation::Exodyne), Just(Affiliation::Stray)]
}

proptest! {
    #[test]
    fn mood_never_leaves_affiliation_bounds(
        personality in personality_strategy(),
        affiliation in affiliation_strategy(),
        scores in prop::collection::vec(-1.0_f32..=1.0, 0..100),
        seed in any::<u64>(),
    ) {
        let mut npc = Npc::new(NpcId(1), "Subject", personality, affiliation);
        let mut rng = StdRng::seed_from_u64(seed);
        let (lo, hi) = affiliation.mood_bounds();
        for score in scores {
            npc.update_mood(score, &mut rng);
            prop_assert!((lo..=hi).contains(&npc.mood), "mood {} outside [{lo}, {hi}]", npc.mood);
        }
    }

    #[test]
    fn mood_history_deltas_reconstruct_the_walk(
        scores in prop::collection::vec(-1.0_f32..=1.0, 1..50),
        seed in any::<u64>(),
    ) {
        let mut npc = Npc::new(NpcId(5), "Sloane", Personality::Wry, Affiliation::Stray);
        let mut rng = StdRng::seed_from_u64(seed);
        for score in scores {
            npc.update_mood(score, &mut rng);
        }
        let mut mood = 50;
        for shift in &npc.mood_history {
            prop_assert_eq!(shift.from, mood);
            prop_assert_eq!(shift.to - shift.from, shift.delta);
            prop_assert_ne!(shift.delta, 0);
            mood = shift.to;
        }
        prop_assert_eq!(mood, npc.mood);
    }

    #[test]
    fn reveal_chance_stays_clamped(strength in any::<u8>(), mood in -1000_i32..=1000) {
        let chance = reveal_chance(strength, mood);
        prop_assert!((10.0..=90.0).contains(&chance), "chance {chance}");
    }

    #[test]
    fn sentiment_compound_stays_in_unit_interval(text in ".{0,200}") {
        let scorer = SentimentScorer::lexicon();
        let score = scorer.score(&text);
        prop_assert!((-1.0..=1.0).contains(&score), "score {score} for {text:?}");
    }

    #[test]
    fn topic_average_bounded_by_samples(
        samples in prop::collection::vec(-1.0_f32..=1.0, 1..50),
    ) {
        let mut npc = Npc::new(NpcId(5), "Sloane", Personality::Wry, Affiliation::Stray);
        for sample in &samples {
            npc.track_topic("exodyne", *sample);
        }
        let stat = npc.topics["exodyne"];
        let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assert_eq!(stat.count as usize, samples.len());
        // Small epsilon for incremental-average rounding.
        prop_assert!(stat.sentiment >= min - 1e-4 && stat.sentiment <= max + 1e-4);
    }

    #[test]
    fn shaping_never_emits_meta_commentary(
        raw in ".{0,120}",
        personality in personality_strategy(),
        seed in any::<u64>(),
    ) {
        let npc = Npc::new(NpcId(1), "Subject", personality, Affiliation::Stray);
        let mut rng = StdRng::seed_from_u64(seed);
        let shaped = shaping::enforce_consistency(&raw, &npc, None, &mut rng);
        prop_assert!(!shaping::breaks_character(&shaped), "{shaped:?}");
    }

    #[test]
    fn warm_prefix_always_names_the_friend(
        strength in 61_u8..=100,
        seed in any::<u64>(),
    ) {
        let npc = Npc::new(NpcId(5), "Sloane", Personality::Wry, Affiliation::Stray);
        let tie = MentionedTie { name: "Rook".to_string(), strength };
        let mut rng = StdRng::seed_from_u64(seed);
        let shaped = shaping::enforce_consistency("She left an hour ago.", &npc, Some(&tie), &mut rng);
        prop_assert!(shaped.starts_with("Rook's alright. "), "{shaped:?}");
    }
}
