//! Load, apply, persist.
//!
//! [`MatchService`] is what request adapters call. Each method loads the
//! current snapshot, runs one engine operation and writes the new snapshot
//! back. A concurrent writer that got there first surfaces as
//! [`StoreError::Conflict`]; the caller decides whether to re-fetch.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::battle::{Appliance, Match, MatchError};
use super::roll::RandomSource;
use super::rules::BattleRules;
use super::store::{MatchStore, StoreError};
use super::traits::AttributeLookup;

/// Errors from service calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Engine rejection, if this is one.
    pub fn as_match_error(&self) -> Option<&MatchError> {
        match self {
            Self::Match(err) => Some(err),
            Self::Store(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Match operations over a store.
#[derive(Debug)]
pub struct MatchService<S, L> {
    store: S,
    lookup: L,
    rules: BattleRules,
}

impl<S: MatchStore, L: AttributeLookup> MatchService<S, L> {
    pub fn new(store: S, lookup: L) -> Self {
        Self::with_rules(store, lookup, BattleRules::default())
    }

    pub fn with_rules(store: S, lookup: L, rules: BattleRules) -> Self {
        Self {
            store,
            lookup,
            rules,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    /// Create and persist a new match.
    pub fn start(
        &self,
        created_at: DateTime<Utc>,
        combatant1_ref: Option<&str>,
        combatant2_ref: Option<&str>,
    ) -> Result<Match> {
        let game = Match::create(created_at, &self.lookup, combatant1_ref, combatant2_ref);
        self.store.put(&game)?;
        tracing::info!(match_id = %game.id, "match started");
        Ok(game)
    }

    /// Load a match; absent IDs are `InvalidMatch`.
    pub fn get(&self, match_id: &str) -> Result<Match> {
        self.store
            .get(match_id)?
            .ok_or(ServiceError::Match(MatchError::InvalidMatch))
    }

    pub fn join(&self, match_id: &str, identity: &str) -> Result<Match> {
        let game = self.get(match_id)?.join(identity)?;
        self.store.put(&game)?;
        Ok(game)
    }

    pub fn play<R: RandomSource + ?Sized>(
        &self,
        match_id: &str,
        identity: &str,
        action_index: usize,
        rng: &mut R,
    ) -> Result<(Match, Appliance)> {
        let (game, appliance) =
            self.get(match_id)?
                .act(identity, action_index, &self.rules, rng)?;
        self.store.put(&game)?;

        if let Some(winner) = game.winner() {
            tracing::info!(match_id, %winner, "match finished");
        }
        Ok((game, appliance))
    }

    /// Most recently created matches.
    pub fn recent(&self, limit: usize) -> Result<Vec<Match>> {
        let mut games = Vec::new();
        for id in self.store.recent(limit)? {
            if let Some(game) = self.store.get(&id)? {
                games.push(game);
            }
        }
        Ok(games)
    }
}
