//! The arena: the authoritative match state machine and command surface.
//!
//! One arena exists per field. External commands (assign, load,
//! substitute, start, abort, reset) mutate it synchronously; a
//! caller-driven [`update`] tick advances the phase from elapsed time and
//! paces driver station control packets. The caller owns the clock: every
//! time-sensitive entry point takes `now_ms` from a monotonic source,
//! which is also what makes the whole state machine testable without
//! sleeping.
//!
//! # Threading
//!
//! The arena itself is not thread-safe. A deployment runs one writer that
//! owns it (wrap in `Arc<Mutex<Arena<_>>>` to share with UI readers);
//! commands and the tick are serialized through that writer. The only
//! asynchronous side effect is field network configuration, which is
//! fire-and-forget through the [`NetworkSetup`] seam.
//!
//! # Example
//!
//! ```rust
//! use field_arena::{Arena, EventSettings, MatchPhase, MemoryStore, StationId};
//!
//! let mut arena = Arena::new(MemoryStore::new(), EventSettings::default());
//!
//! // Nobody showed up: bypass every station and start the match.
//! for id in StationId::ALL {
//!     arena.station_mut(id).bypass = true;
//! }
//! arena.start_match(1_000).unwrap();
//! arena.update(1_010);
//! assert_eq!(arena.state(), MatchPhase::AutoPeriod);
//! ```
//!
//! [`update`]: Arena::update

use tracing::{info, warn};

use crate::clock::MatchPhase;
use crate::config::EventSettings;
use crate::model::{Match, MatchType, Team};
use crate::network::{NetworkSetup, NullNetwork};
use crate::readiness::{self, NotReady};
use crate::schedule;
use crate::station::{AllianceStation, StationId, StationMap};
use crate::store::{EventStore, StoreError};

/// Error returned by an arena command.
///
/// Command-level errors go back to the caller; tick-level anomalies
/// (packet-emit failures) are logged and the tick continues.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// The station label is not one of R1..R3, B1..B3.
    #[error("Invalid alliance station '{0}'.")]
    InvalidStation(String),
    /// A match can only be loaded before one starts.
    #[error("Cannot load match while in {0}.")]
    CannotLoad(MatchPhase),
    /// A match can only be started before one starts.
    #[error("Cannot start match while in {0}.")]
    CannotStart(MatchPhase),
    /// Only a running match can be aborted.
    #[error("Cannot abort match when in {0}.")]
    CannotAbort(MatchPhase),
    /// The arena can only be reset between matches.
    #[error("Cannot reset match while in {0}.")]
    CannotReset(MatchPhase),
    /// The readiness gate rejected the start.
    #[error(transparent)]
    NotReady(#[from] NotReady),
    /// Qualification line-ups are fixed by the schedule.
    #[error("Can't substitute teams for qualification matches.")]
    SubstitutionForbidden,
    /// The team number is not registered at this event.
    #[error("Team {0} is not present at the event.")]
    UnknownTeam(u32),
    /// The event store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The arena controller. Generic over the event store so it runs the same
/// against the in-memory store and a wrapped database layer.
pub struct Arena<S: EventStore> {
    store: S,
    settings: EventSettings,
    network: Box<dyn NetworkSetup>,
    stations: StationMap,
    current_match: Match,
    state: MatchPhase,
    match_start_ms: Option<u64>,
    last_ds_packet_ms: u64,
}

impl<S: EventStore> Arena<S> {
    /// Creates an arena with no field network attached (network security
    /// can still be toggled later once a network is installed via
    /// [`Arena::with_network`]).
    pub fn new(store: S, settings: EventSettings) -> Self {
        Self::with_network(store, settings, Box::new(NullNetwork))
    }

    /// Creates an arena that reconfigures the field through `network`
    /// whenever a match is loaded with network security enabled.
    pub fn with_network(
        store: S,
        settings: EventSettings,
        network: Box<dyn NetworkSetup>,
    ) -> Self {
        let mut arena = Self {
            store,
            settings,
            network,
            stations: StationMap::new(),
            current_match: Match::test(),
            state: MatchPhase::PreMatch,
            match_start_ms: None,
            last_ds_packet_ms: 0,
        };
        arena.setup();
        arena
    }

    /// Returns the arena to a clean pre-match state: empty stations, a
    /// fresh test match, no clock running. Safe to call at any time;
    /// deliberately does not touch the field network.
    pub fn setup(&mut self) {
        self.stations.reset();
        self.current_match = Match::test();
        self.state = MatchPhase::PreMatch;
        self.match_start_ms = None;
        self.last_ds_packet_ms = 0;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current phase of the match state machine.
    pub fn state(&self) -> MatchPhase {
        self.state
    }

    /// The loaded match. Always present; defaults to the empty test
    /// match.
    pub fn current_match(&self) -> &Match {
        &self.current_match
    }

    /// Read access to one station.
    pub fn station(&self, id: StationId) -> &AllianceStation {
        &self.stations[id]
    }

    /// Write access to one station (flags, connection attachment).
    pub fn station_mut(&mut self, id: StationId) -> &mut AllianceStation {
        &mut self.stations[id]
    }

    /// Read access to the whole station map.
    pub fn stations(&self) -> &StationMap {
        &self.stations
    }

    /// Read access to the event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write access to the event store (schedule edits between matches).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The event settings the arena was built with.
    pub fn settings(&self) -> &EventSettings {
        &self.settings
    }

    /// Seconds elapsed since the match started, or `None` when no match
    /// clock is running.
    pub fn match_time_sec(&self, now_ms: u64) -> Option<u64> {
        self.match_start_ms
            .map(|start| now_ms.saturating_sub(start) / 1000)
    }

    /// Consistent snapshot of the arena for UI/telemetry readers.
    pub fn snapshot(&self, now_ms: u64) -> ArenaState {
        ArenaState {
            phase: self.state,
            match_id: self.current_match.id,
            match_display_name: self.current_match.display_name.clone(),
            match_time_sec: self.match_time_sec(now_ms),
            stations: StationId::ALL
                .iter()
                .map(|&id| {
                    let station = &self.stations[id];
                    StationSummary {
                        station: id,
                        team_id: station.team.as_ref().map(|t| t.id),
                        bypass: station.bypass,
                        emergency_stop: station.emergency_stop,
                        ds_connected: station.ds_conn.is_some(),
                        robot_linked: station
                            .ds_conn
                            .as_ref()
                            .is_some_and(|c| c.robot_linked),
                    }
                })
                .collect(),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Assigns a team to a station, or clears it when `team_id` is 0.
    ///
    /// Re-assigning the team already present preserves its driver station
    /// connection; any other change releases the station's connection.
    pub fn assign_team(&mut self, team_id: u32, station: &str) -> Result<(), ArenaError> {
        let id = Self::parse_station(station)?;
        self.assign_team_station(team_id, id)
    }

    /// Replaces the loaded match and assigns its six team slots.
    ///
    /// Clears every station's bypass and emergency-stop flags, then kicks
    /// off an asynchronous field network run when network security is
    /// enabled. Only permitted before a match starts. A failed team
    /// lookup rejects the whole load and leaves the arena untouched.
    pub fn load_match(&mut self, m: &Match) -> Result<(), ArenaError> {
        if self.state != MatchPhase::PreMatch {
            return Err(ArenaError::CannotLoad(self.state));
        }

        // Resolve every line-up slot before touching any state, so one
        // unknown team cannot leave a half-assigned field behind.
        let mut teams: [Option<Team>; 6] = Default::default();
        for station in StationId::ALL {
            let team_id = m.slot(station);
            if team_id == 0 {
                continue;
            }
            let team = match &self.stations[station].team {
                Some(team) if team.id == team_id => team.clone(),
                _ => self
                    .store
                    .team_by_id(team_id)?
                    .ok_or(ArenaError::UnknownTeam(team_id))?,
            };
            teams[station.index()] = Some(team);
        }

        self.current_match = m.clone();
        for station in StationId::ALL {
            match teams[station.index()].take() {
                Some(team) => self.stations[station].assign(team),
                None => self.stations[station].clear(),
            }
        }
        self.stations.clear_overrides();

        info!(
            match_id = m.id,
            match_type = m.match_type.as_str(),
            "match loaded"
        );

        if self.settings.network_security_enabled {
            self.network.configure(self.stations.team_ids());
        }
        Ok(())
    }

    /// Swaps a team into a station of the loaded match.
    ///
    /// Forbidden for qualification matches. For persisted match types the
    /// updated line-up is saved back to the match row.
    pub fn substitute_team(&mut self, team_id: u32, station: &str) -> Result<(), ArenaError> {
        let id = Self::parse_station(station)?;
        if self.current_match.match_type == MatchType::Qualification {
            return Err(ArenaError::SubstitutionForbidden);
        }

        self.assign_team_station(team_id, id)?;
        self.current_match.set_slot(id, team_id);
        if self.current_match.match_type != MatchType::Test {
            self.store.save_match(&self.current_match)?;
        }
        Ok(())
    }

    /// Loads the next unplayed match of the current type.
    ///
    /// A test match is always followed by a fresh empty test match. For
    /// scheduled types, the first match (by id) whose status is not
    /// "complete" is loaded; if every match of the type is complete, the
    /// current match stays loaded.
    pub fn load_next_match(&mut self) -> Result<(), ArenaError> {
        if self.current_match.match_type == MatchType::Test {
            return self.load_match(&Match::test());
        }

        let matches = self.store.matches_by_type(self.current_match.match_type)?;
        match schedule::next_match(&matches) {
            Some(next) => {
                let next = next.clone();
                self.load_match(&next)
            }
            None => Ok(()),
        }
    }

    /// Starts the loaded match, subject to the readiness gate.
    ///
    /// On success the arena enters the transient start state; the next
    /// [`update`](Arena::update) observes the autonomous period and emits
    /// an enabled packet.
    pub fn start_match(&mut self, now_ms: u64) -> Result<(), ArenaError> {
        if self.state != MatchPhase::PreMatch {
            return Err(ArenaError::CannotStart(self.state));
        }
        readiness::check_ready(&self.stations)?;

        self.match_start_ms = Some(now_ms);
        self.state = MatchPhase::StartMatch;
        info!(
            match_id = self.current_match.id,
            match_type = self.current_match.match_type.as_str(),
            "match started"
        );
        Ok(())
    }

    /// Aborts a running match, jumping straight to post-match. Robots are
    /// disabled by the next emitted packet.
    pub fn abort_match(&mut self) -> Result<(), ArenaError> {
        if !self.state.is_live() {
            return Err(ArenaError::CannotAbort(self.state));
        }
        warn!(match_id = self.current_match.id, "match aborted");
        self.state = MatchPhase::PostMatch;
        Ok(())
    }

    /// Clears station overrides and returns to pre-match. Permitted from
    /// post-match (the normal path) and from pre-match (idempotent).
    pub fn reset_match(&mut self) -> Result<(), ArenaError> {
        if !matches!(self.state, MatchPhase::PostMatch | MatchPhase::PreMatch) {
            return Err(ArenaError::CannotReset(self.state));
        }
        self.stations.clear_overrides();
        self.state = MatchPhase::PreMatch;
        self.match_start_ms = None;
        Ok(())
    }

    // ========================================================================
    // Update tick
    // ========================================================================

    /// One tick of the arena: advance the phase from the match clock,
    /// then emit driver station packets if the pacing interval elapsed or
    /// the phase just changed.
    ///
    /// Phase boundaries are honored to within one tick; the caller
    /// schedules ticks comfortably faster than the packet period.
    pub fn update(&mut self, now_ms: u64) {
        let previous = self.state;
        if self.state.is_live() {
            if let Some(start_ms) = self.match_start_ms {
                let phase = self
                    .settings
                    .timing
                    .phase_at(now_ms.saturating_sub(start_ms));
                if phase != self.state {
                    info!(from = previous.as_str(), to = phase.as_str(), "phase advanced");
                    self.state = phase;
                }
            }
        }

        // A phase change forces a packet so enable/disable takes effect
        // immediately; otherwise emission waits out the pacing interval.
        let transitioned = self.state != previous;
        let due =
            now_ms.saturating_sub(self.last_ds_packet_ms) >= self.settings.ds_packet_period_ms;
        if transitioned || due {
            self.send_ds_packets(now_ms);
        }
    }

    fn send_ds_packets(&mut self, now_ms: u64) {
        let auto = self.state.auto_flag();
        let enable = self.state.enable_flag();
        for id in StationId::ALL {
            let station = &mut self.stations[id];
            if let Some(conn) = station.ds_conn.as_mut() {
                conn.auto = auto;
                conn.enabled = enable && !station.emergency_stop && !station.bypass;
                if let Err(err) = conn.send_control_packet(now_ms) {
                    warn!(
                        station = id.as_str(),
                        team = conn.team_id,
                        %err,
                        "dropped driver station packet"
                    );
                }
            }
        }
        self.last_ds_packet_ms = now_ms;
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn parse_station(label: &str) -> Result<StationId, ArenaError> {
        StationId::from_label(label).ok_or_else(|| ArenaError::InvalidStation(label.to_string()))
    }

    fn assign_team_station(&mut self, team_id: u32, station: StationId) -> Result<(), ArenaError> {
        if team_id == 0 {
            self.stations[station].clear();
            return Ok(());
        }

        // Same team already in place: keep the existing connection.
        if let Some(team) = &self.stations[station].team {
            if team.id == team_id {
                return Ok(());
            }
        }

        let team = self
            .store
            .team_by_id(team_id)?
            .ok_or(ArenaError::UnknownTeam(team_id))?;
        self.stations[station].assign(team);
        Ok(())
    }
}

/// Snapshot of the arena for UI/telemetry readers.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaState {
    /// Current match phase.
    pub phase: MatchPhase,
    /// Id of the loaded match (0 = test match).
    pub match_id: u32,
    /// Display name of the loaded match.
    pub match_display_name: String,
    /// Seconds since the match started, if a clock is running.
    pub match_time_sec: Option<u64>,
    /// Per-station summaries in R1..B3 order.
    pub stations: Vec<StationSummary>,
}

/// One station's slice of the arena snapshot.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSummary {
    /// Which station.
    pub station: StationId,
    /// Assigned team number, if any.
    pub team_id: Option<u32>,
    /// Bypass flag.
    pub bypass: bool,
    /// Emergency stop flag.
    pub emergency_stop: bool,
    /// Whether a driver station is connected.
    pub ds_connected: bool,
    /// Whether the driver station reports a robot link.
    pub robot_linked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;
    use crate::store::MemoryStore;

    fn arena() -> Arena<MemoryStore> {
        Arena::new(MemoryStore::new(), EventSettings::default())
    }

    fn bypass_all(arena: &mut Arena<MemoryStore>) {
        for id in StationId::ALL {
            arena.station_mut(id).bypass = true;
        }
    }

    #[test]
    fn new_arena_holds_an_empty_test_match() {
        let arena = arena();
        assert_eq!(arena.state(), MatchPhase::PreMatch);
        assert_eq!(arena.current_match().id, 0);
        assert_eq!(arena.current_match().match_type, MatchType::Test);
        assert_eq!(arena.match_time_sec(5_000), None);
    }

    #[test]
    fn assign_rejects_unknown_stations_and_teams() {
        let mut arena = arena();
        let err = arena.assign_team(254, "R4").unwrap_err();
        assert!(err.to_string().contains("Invalid alliance station"));

        let err = arena.assign_team(254, "R1").unwrap_err();
        assert!(matches!(err, ArenaError::UnknownTeam(254)));
    }

    #[test]
    fn start_requires_pre_match_and_readiness() {
        let mut arena = arena();
        let err = arena.start_match(0).unwrap_err();
        assert!(err
            .to_string()
            .contains("until all robots are connected or bypassed"));

        bypass_all(&mut arena);
        arena.start_match(1_000).unwrap();
        assert_eq!(arena.state(), MatchPhase::StartMatch);

        let err = arena.start_match(1_001).unwrap_err();
        assert!(err.to_string().contains("Cannot start match while"));
    }

    #[test]
    fn snapshot_reflects_station_flags() {
        let mut arena = arena();
        arena.store_mut().create_team(Team::with_id(254)).unwrap();
        arena.assign_team(254, "B1").unwrap();
        arena.station_mut(StationId::B1).bypass = true;

        let snapshot = arena.snapshot(0);
        assert_eq!(snapshot.phase, MatchPhase::PreMatch);
        let b1 = &snapshot.stations[StationId::B1.index()];
        assert_eq!(b1.team_id, Some(254));
        assert!(b1.bypass);
        assert!(!b1.ds_connected);
    }

    #[test]
    fn setup_returns_to_a_clean_slate() {
        let mut arena = arena();
        arena.store_mut().create_team(Team::with_id(254)).unwrap();
        arena.assign_team(254, "R1").unwrap();
        bypass_all(&mut arena);
        arena.start_match(500).unwrap();

        arena.setup();
        assert_eq!(arena.state(), MatchPhase::PreMatch);
        assert!(arena.station(StationId::R1).team.is_none());
        assert!(!arena.station(StationId::R1).bypass);
        assert_eq!(arena.match_time_sec(10_000), None);
    }
}
