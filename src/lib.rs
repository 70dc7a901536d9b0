//! Dino Battle State Library
//!
//! This crate provides the state and rules for two-player, turn-based dino
//! battles.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Combatant Model** - Health, defense and an index-addressable action
//!   catalogue, derived from a creature's trait sheet or a built-in default.
//!
//! - **Match Engine** - The match state machine (join, take turns, win) and
//!   the damage/defense/heal formula.
//!
//! - **Persistence Contract** - A store trait with revision-checked writes,
//!   plus an in-memory implementation.
//!
//! # Design Principles
//!
//! 1. **Snapshots in, snapshots out** - Engine operations never mutate the
//!    caller's match; they return a new one or an error.
//!
//! 2. **No I/O in the engine** - Storage, metadata lookup and randomness are
//!    passed in.
//!
//! 3. **Serialization-ready** - Every persisted type derives serde.
//!
//! # Example
//!
//! ```rust
//! use dino_battle_state::state::{
//!     FixedRoll, InMemoryMatchStore, MatchPhase, MatchService, NoLookup,
//! };
//!
//! let service = MatchService::new(InMemoryMatchStore::new(), NoLookup);
//! let game = service.start(chrono::Utc::now(), None, None).unwrap();
//!
//! service.join(&game.id, "alice").unwrap();
//! let game = service.join(&game.id, "bob").unwrap();
//! assert_eq!(game.phase, MatchPhase::Player1Turn);
//!
//! // alice tackles for a flat 20
//! let (game, _) = service.play(&game.id, "alice", 2, &mut FixedRoll(1.0)).unwrap();
//! assert_eq!(game.combatant2.unwrap().health, 80);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
