//! The persistence capability the arena consumes, and the in-memory
//! implementation it ships with.
//!
//! The arena never talks to a concrete database; it sees only
//! [`EventStore`]. Looking up an unknown id is not an error — it returns
//! `Ok(None)` and the caller decides what that means. Match id 0 is the
//! implicit test match and is never persisted.

use std::collections::BTreeMap;

use crate::model::{Match, MatchType, Team};

/// Errors from the event store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A team with this number is already registered.
    #[error("team {0} already exists")]
    DuplicateTeam(u32),
    /// Saving a match that was never created.
    #[error("match {0} not found")]
    UnknownMatch(u32),
    /// Backend-specific failure (I/O, connection, ...).
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Persistence operations the arena requires.
///
/// Implementations must return matches from [`matches_by_type`] ordered
/// by id ascending; next-match selection depends on it.
///
/// [`matches_by_type`]: EventStore::matches_by_type
pub trait EventStore {
    /// Looks up a team by number. Unknown numbers yield `Ok(None)`.
    fn team_by_id(&self, id: u32) -> Result<Option<Team>, StoreError>;

    /// Looks up a match by id. Unknown ids yield `Ok(None)`.
    fn match_by_id(&self, id: u32) -> Result<Option<Match>, StoreError>;

    /// All matches of a type, ordered by id ascending.
    fn matches_by_type(&self, match_type: MatchType) -> Result<Vec<Match>, StoreError>;

    /// Updates an existing match row.
    fn save_match(&mut self, m: &Match) -> Result<(), StoreError>;

    /// Registers a team under its competition number.
    fn create_team(&mut self, team: Team) -> Result<(), StoreError>;

    /// Inserts a new match, assigning it the next id. Returns the stored
    /// match with its id filled in.
    fn create_match(&mut self, m: Match) -> Result<Match, StoreError>;
}

/// BTreeMap-backed store.
///
/// The shipped implementation: the relational layer proper lives outside
/// this crate, and the arena is exercised against the same store in tests
/// and in the demo server. Ids auto-assign from 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    teams: BTreeMap<u32, Team>,
    matches: BTreeMap<u32, Match>,
    next_match_id: u32,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            teams: BTreeMap::new(),
            matches: BTreeMap::new(),
            next_match_id: 1,
        }
    }
}

impl EventStore for MemoryStore {
    fn team_by_id(&self, id: u32) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.get(&id).cloned())
    }

    fn match_by_id(&self, id: u32) -> Result<Option<Match>, StoreError> {
        Ok(self.matches.get(&id).cloned())
    }

    fn matches_by_type(&self, match_type: MatchType) -> Result<Vec<Match>, StoreError> {
        // BTreeMap iteration is already id-ascending.
        Ok(self
            .matches
            .values()
            .filter(|m| m.match_type == match_type)
            .cloned()
            .collect())
    }

    fn save_match(&mut self, m: &Match) -> Result<(), StoreError> {
        match self.matches.get_mut(&m.id) {
            Some(row) => {
                *row = m.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownMatch(m.id)),
        }
    }

    fn create_team(&mut self, team: Team) -> Result<(), StoreError> {
        if self.teams.contains_key(&team.id) {
            return Err(StoreError::DuplicateTeam(team.id));
        }
        self.teams.insert(team.id, team);
        Ok(())
    }

    fn create_match(&mut self, mut m: Match) -> Result<Match, StoreError> {
        m.id = self.next_match_id;
        self.next_match_id += 1;
        self.matches.insert(m.id, m.clone());
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_absent_not_errors() {
        let store = MemoryStore::new();
        assert!(store.team_by_id(254).unwrap().is_none());
        assert!(store.match_by_id(1).unwrap().is_none());
    }

    #[test]
    fn teams_round_trip() {
        let mut store = MemoryStore::new();
        store.create_team(Team::with_id(254)).unwrap();
        assert_eq!(store.team_by_id(254).unwrap().unwrap().id, 254);
        assert!(matches!(
            store.create_team(Team::with_id(254)),
            Err(StoreError::DuplicateTeam(254))
        ));
    }

    #[test]
    fn match_ids_assign_from_one() {
        let mut store = MemoryStore::new();
        let a = store.create_match(Match::of_type(MatchType::Practice)).unwrap();
        let b = store.create_match(Match::of_type(MatchType::Practice)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn matches_by_type_filters_and_orders() {
        let mut store = MemoryStore::new();
        store.create_match(Match::of_type(MatchType::Practice)).unwrap();
        store
            .create_match(Match::of_type(MatchType::Qualification))
            .unwrap();
        store.create_match(Match::of_type(MatchType::Practice)).unwrap();

        let practice = store.matches_by_type(MatchType::Practice).unwrap();
        assert_eq!(
            practice.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(store
            .matches_by_type(MatchType::Elimination)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn save_updates_existing_rows_only() {
        let mut store = MemoryStore::new();
        let mut m = store.create_match(Match::of_type(MatchType::Practice)).unwrap();
        m.red1 = 107;
        store.save_match(&m).unwrap();
        assert_eq!(store.match_by_id(m.id).unwrap().unwrap().red1, 107);

        let phantom = Match {
            id: 99,
            ..Match::default()
        };
        assert!(matches!(
            store.save_match(&phantom),
            Err(StoreError::UnknownMatch(99))
        ));
    }
}
