//! World registry — owns the cast, the location map, and the event log.
//!
//! The [`World`] is an explicit context object, never a process-wide
//! singleton, so multiple independent simulations can coexist (and tests
//! stay deterministic). NPC state sits behind a per-id mutex: mutation is
//! read-modify-write and must be serialized per character, but no
//! cross-character transaction ever takes two locks — relationships are
//! seeded once and read-only at runtime.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::info;

use crate::npc::{Npc, NpcSnapshot};
use crate::types::{Affiliation, NpcId, Personality};

/// One timestamped entry in the append-only system event log.
#[derive(Debug, Clone)]
pub struct SystemEvent {
    /// Wall-clock time of the event.
    pub at: DateTime<Utc>,
    /// What happened.
    pub event: String,
}

/// A roster listing entry for the operator interface.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RosterEntry {
    /// Roster id.
    pub id: NpcId,
    /// Display name.
    pub name: String,
    /// Primary trait plus two secondaries.
    pub personality_description: String,
    /// Affiliation label.
    pub affiliation: String,
}

/// The single source of truth for cast state, locations, and events.
pub struct World {
    npcs: BTreeMap<NpcId, Mutex<Npc>>,
    locations: BTreeMap<NpcId, &'static str>,
    events: Mutex<Vec<SystemEvent>>,
}

impl World {
    /// Build the fixed seven-character roster with its relationship graph
    /// and location map.
    #[must_use]
    pub fn seed() -> Self {
        let mut world = Self {
            npcs: BTreeMap::new(),
            locations: BTreeMap::new(),
            events: Mutex::new(Vec::new()),
        };

        let names = ["Axel", "Vesper", "Jinx", "Rook", "Sloane", "Mirage", "Oracle"];
        for (i, name) in names.iter().enumerate() {
            let id = NpcId(i as u8 + 1);
            // Rook through Oracle run with Exodyne.
            let affiliation = if id.0 >= 4 {
                Affiliation::Exodyne
            } else {
                Affiliation::Stray
            };
            let personality = Personality::from_id(id.0).unwrap_or(Personality::Enigmatic);
            let npc = Npc::new(id, *name, personality, affiliation);
            world.log_event(format!(
                "Created NPC {id}: {name} ({personality}, {})",
                affiliation.label()
            ));
            world.npcs.insert(id, Mutex::new(npc));
        }

        world.seed_relationships();
        world.seed_locations();
        world.log_event("World seeded");
        info!(cast = world.npcs.len(), "world initialized");
        world
    }

    /// The 12 directed edges of the relationship graph. Asymmetric by
    /// design: Rook rates Sloane 80, Sloane rates Rook 85.
    fn seed_relationships(&mut self) {
        let edges: &[(u8, u8, &str, u8)] = &[
            (1, 2, "professional acquaintance but finds them irritating", 40),
            (2, 1, "necessary business contact but dislikes their flamboyance", 35),
            (2, 3, "distrusts their paranoid nature", 30),
            (2, 4, "respects their professionalism but wary of gang ties", 60),
            (3, 2, "suspects they have hidden agendas", 25),
            (4, 2, "useful business contact outside the gang", 65),
            (4, 5, "trusted lieutenant", 80),
            (4, 6, "reliable enforcer", 75),
            (5, 4, "gang leader respected for their leadership", 85),
            (6, 4, "gang leader but has some disagreements", 70),
            (6, 7, "only person they somewhat trust", 65),
            (7, 6, "only connection to the physical world", 60),
        ];
        for &(holder, target, description, strength) in edges {
            if let Some(npc) = self.npcs.get(&NpcId(holder)) {
                npc.lock()
                    .add_relationship(NpcId(target), description, strength);
            }
        }
        self.log_event("All relationships established");
    }

    /// Where each character stands in the bar. Static for the session.
    fn seed_locations(&mut self) {
        self.locations = BTreeMap::from([
            (NpcId(1), "by the window, preening"),
            (NpcId(2), "at the bar, making notes"),
            (NpcId(3), "behind the bar, serving drinks"),
            (NpcId(4), "at the bar, standing guard"),
            (NpcId(5), "by the window, watching the street"),
            (NpcId(6), "at the bar, nursing a drink"),
            (NpcId(7), "by the window, staring at the glass"),
        ]);
        self.log_event("NPC locations set");
    }

    /// Run a closure against one NPC's state under its lock.
    ///
    /// Returns `None` if the id is unknown. This is the only mutation
    /// path; at most one mutator per id runs at a time.
    pub fn with_npc<T>(&self, id: NpcId, f: impl FnOnce(&mut Npc) -> T) -> Option<T> {
        self.npcs.get(&id).map(|npc| f(&mut npc.lock()))
    }

    /// Whether the id is in the registry.
    #[must_use]
    pub fn contains(&self, id: NpcId) -> bool {
        self.npcs.contains_key(&id)
    }

    /// Static location line for a character.
    #[must_use]
    pub fn location_of(&self, id: NpcId) -> Option<&'static str> {
        self.locations.get(&id).copied()
    }

    /// Who hangs out where, by landmark. Static for the session, like the
    /// location map it summarizes.
    #[must_use]
    pub fn known_locations() -> &'static [(&'static str, &'static [NpcId])] {
        &[
            ("window", &[NpcId(7), NpcId(1), NpcId(5)]),
            ("bar", &[NpcId(6), NpcId(4), NpcId(2)]),
            ("bartender", &[NpcId(3)]),
        ]
    }

    /// `(id, name)` pairs in registry (id) order. Name-scan callers rely
    /// on this ordering being deterministic.
    #[must_use]
    pub fn names(&self) -> Vec<(NpcId, String)> {
        self.npcs
            .iter()
            .map(|(id, npc)| (*id, npc.lock().name.clone()))
            .collect()
    }

    /// Roster listing for the operator interface.
    #[must_use]
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.npcs
            .values()
            .map(|npc| {
                let npc = npc.lock();
                RosterEntry {
                    id: npc.id,
                    name: npc.name.clone(),
                    personality_description: npc.personality_description(),
                    affiliation: npc.affiliation.label().to_string(),
                }
            })
            .collect()
    }

    /// Status snapshot for one character.
    #[must_use]
    pub fn snapshot(&self, id: NpcId) -> Option<NpcSnapshot> {
        self.with_npc(id, |npc| npc.snapshot())
    }

    /// Append to the system event log.
    pub fn log_event(&self, event: impl Into<String>) {
        self.events.lock().push(SystemEvent {
            at: Utc::now(),
            event: event.into(),
        });
    }

    /// The most recent `n` system events, oldest first.
    #[must_use]
    pub fn recent_events(&self, n: usize) -> Vec<SystemEvent> {
        let events = self.events.lock();
        events[events.len().saturating_sub(n)..].to_vec()
    }

    /// Total events logged so far.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }
}
