//! Match persistence contract.
//!
//! The engine never touches storage. Adapters load a snapshot, run one
//! engine operation and write the result back through a [`MatchStore`].
//! `put` is a compare-and-swap on [`Match::revision`], so two writers racing
//! from the same snapshot cannot both land.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::battle::Match;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match store lock was poisoned")]
    LockPoisoned,

    #[error("revision conflict for {match_id}: stored {stored:?}, incoming {incoming}")]
    Conflict {
        match_id: String,
        stored: Option<u64>,
        incoming: u64,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence gateway for match snapshots.
pub trait MatchStore: Send + Sync {
    /// Load a match by ID.
    fn get(&self, match_id: &str) -> Result<Option<Match>>;

    /// Store a snapshot.
    ///
    /// Accepted only when it is the direct successor of the stored record:
    /// revision 0 requires no record, revision `n` requires `n - 1`.
    fn put(&self, game: &Match) -> Result<()>;

    /// Match IDs, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<String>>;
}

/// Check the compare-and-swap rule for `put`.
pub fn check_revision(stored: Option<u64>, game: &Match) -> Result<()> {
    let expected = game.revision.checked_sub(1);
    if stored == expected {
        Ok(())
    } else {
        Err(StoreError::Conflict {
            match_id: game.id.clone(),
            stored,
            incoming: game.revision,
        })
    }
}

#[derive(Debug)]
struct StoredMatch {
    revision: u64,
    created_at: DateTime<Utc>,
    json: String,
}

/// In-memory store for tests and local runs.
///
/// Records are kept as JSON so every load goes through the same
/// serialization an external store would.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<String, StoredMatch>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches.
    pub fn count(&self) -> Result<usize> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(matches.len())
    }
}

impl MatchStore for InMemoryMatchStore {
    fn get(&self, match_id: &str) -> Result<Option<Match>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        matches
            .get(match_id)
            .map(|stored| serde_json::from_str::<Match>(&stored.json))
            .transpose()
            .map_err(StoreError::from)
    }

    fn put(&self, game: &Match) -> Result<()> {
        let json = serde_json::to_string(game)?;
        let mut matches = self.matches.write().map_err(|_| StoreError::LockPoisoned)?;

        let stored = matches.get(&game.id).map(|s| s.revision);
        if let Err(err) = check_revision(stored, game) {
            tracing::warn!(match_id = %game.id, error = %err, "rejected stale write");
            return Err(err);
        }

        matches.insert(
            game.id.clone(),
            StoredMatch {
                revision: game.revision,
                created_at: game.created_at,
                json,
            },
        );
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<String>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<(&DateTime<Utc>, &String)> = matches
            .iter()
            .map(|(id, stored)| (&stored.created_at, id))
            .collect();
        ids.sort_by(|a, b| b.cmp(a));
        Ok(ids.into_iter().take(limit).map(|(_, id)| id.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::traits::NoLookup;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn new_match_at(secs: i64) -> Match {
        let created = Utc.timestamp_opt(secs, 0).unwrap();
        Match::create(created, &NoLookup, None, None)
    }

    #[test]
    fn test_put_get_round_trip() {
        let store = InMemoryMatchStore::new();
        let game = new_match_at(1_700_000_000);

        assert!(store.get(&game.id).unwrap().is_none());
        store.put(&game).unwrap();
        assert_eq!(store.get(&game.id).unwrap(), Some(game.clone()));

        let joined = game.join("alice").unwrap();
        store.put(&joined).unwrap();
        assert_eq!(store.get(&game.id).unwrap(), Some(joined));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_stale_write_rejected() {
        let store = InMemoryMatchStore::new();
        let game = new_match_at(1_700_000_000);
        store.put(&game).unwrap();

        // Two callers race from the same snapshot
        let first = game.join("alice").unwrap();
        let second = game.join("bob").unwrap();

        store.put(&first).unwrap();
        let err = store.put(&second).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                stored: Some(1),
                incoming: 1,
                ..
            }
        ));

        assert_eq!(
            store.get(&game.id).unwrap().unwrap().player1.as_deref(),
            Some("alice")
        );

        // Re-creating an existing match is also a conflict
        assert!(store.put(&game).is_err());
    }

    #[test]
    fn test_skipped_revision_rejected() {
        let store = InMemoryMatchStore::new();
        let game = new_match_at(1_700_000_000);
        let joined = game.join("alice").unwrap();

        assert!(matches!(
            store.put(&joined),
            Err(StoreError::Conflict { stored: None, .. })
        ));
    }

    #[test]
    fn test_recent_newest_first() {
        let store = InMemoryMatchStore::new();
        let old = new_match_at(100);
        let mid = new_match_at(200);
        let new = new_match_at(300);
        for game in [&mid, &new, &old] {
            store.put(game).unwrap();
        }

        assert_eq!(
            store.recent(10).unwrap(),
            vec![new.id.clone(), mid.id.clone(), old.id.clone()]
        );
        assert_eq!(store.recent(1).unwrap(), vec![new.id]);
    }

    #[test]
    fn test_poisoned_lock_surfaces() {
        let store = InMemoryMatchStore::new();
        store.put(&new_match_at(100)).unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.matches.write().unwrap();
            panic!("writer died holding the lock");
        }));

        assert!(matches!(store.count(), Err(StoreError::LockPoisoned)));
        assert!(matches!(store.recent(1), Err(StoreError::LockPoisoned)));
    }
}
