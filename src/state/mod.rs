//! State management module for dino battles.
//!
//! This module provides the core battle types and the services around them:
//!
//! - `combatant` - Combatant stats and action catalogues
//! - `traits` - Trait sheet → action mapping and combatant lookup
//! - `roll` - Injectable random source for action multipliers
//! - `rules` - Stat caps
//! - `battle` - Match snapshots and the create/join/act engine
//! - `store` - Persistence contract and in-memory store
//! - `service` - Load → engine → persist orchestration
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          MatchService                            │
//! │                                                                  │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐    │
//! │  │   MatchStore   │   │ AttributeLookup│   │  RandomSource  │    │
//! │  │                │   │                │   │  (per call)    │    │
//! │  │ match_id →     │   │ ref →          │   │                │    │
//! │  │   Match (CAS)  │   │   Combatant    │   │ [min, max] →   │    │
//! │  │                │   │                │   │   multiplier   │    │
//! │  └───────┬────────┘   └───────┬────────┘   └───────┬────────┘    │
//! │          │ load/put           │ create             │ act         │
//! │          ▼                    ▼                    ▼             │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                Match (pure snapshot engine)                │  │
//! │  │                                                            │  │
//! │  │  AwaitingFirst ─▶ AwaitingSecond ─▶ P1Turn ⇄ P2Turn ─▶ Won │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use dino_battle_state::state::{Match, BattleRules, NoLookup};
//!
//! let game = Match::create(chrono::Utc::now(), &NoLookup, None, None);
//! let game = game.join("alice")?.join("bob")?;
//! let (game, hit) = game.act("alice", 0, &BattleRules::default(), &mut rand::thread_rng())?;
//! ```

pub mod battle;
pub mod combatant;
pub mod roll;
pub mod rules;
pub mod service;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use battle::{Appliance, Match, MatchError, MatchPhase, MatchView, Seat};
pub use combatant::{Action, Combatant, STARTING_HEALTH, STAT_CAP};
pub use roll::{FixedRoll, RandomSource};
pub use rules::BattleRules;
pub use service::{MatchService, ServiceError};
pub use store::{InMemoryMatchStore, MatchStore, StoreError};
pub use traits::{
    resolve_or_default, trait_action, AttributeLookup, MetadataSource, NoLookup, StaticMetadata,
    TraitAttribute, TraitLookup, TraitSheet,
};
