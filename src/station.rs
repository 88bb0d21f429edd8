//! Alliance stations and the fixed six-station field map.
//!
//! The six stations are a closed set: three red, three blue. String labels
//! ("R1".."B3") exist only at the edges (operator input, match schedules);
//! everything internal works with [`StationId`].

use crate::ds::DriverStationConnection;
use crate::model::Team;

/// One of the six fixed alliance station positions.
///
/// # Example
///
/// ```rust
/// use field_arena::StationId;
///
/// assert_eq!(StationId::from_label("B2"), Some(StationId::B2));
/// assert_eq!(StationId::from_label("R4"), None);
/// assert_eq!(StationId::B2.as_str(), "B2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StationId {
    /// Red alliance, station 1.
    R1,
    /// Red alliance, station 2.
    R2,
    /// Red alliance, station 3.
    R3,
    /// Blue alliance, station 1.
    B1,
    /// Blue alliance, station 2.
    B2,
    /// Blue alliance, station 3.
    B3,
}

impl StationId {
    /// All six stations in R1..B3 order.
    pub const ALL: [StationId; 6] = [
        StationId::R1,
        StationId::R2,
        StationId::R3,
        StationId::B1,
        StationId::B2,
        StationId::B3,
    ];

    /// Returns the station label used for external I/O.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StationId::R1 => "R1",
            StationId::R2 => "R2",
            StationId::R3 => "R3",
            StationId::B1 => "B1",
            StationId::B2 => "B2",
            StationId::B3 => "B3",
        }
    }

    /// Parses a station label. Any label outside the closed set is
    /// rejected with `None`.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "R1" => Some(StationId::R1),
            "R2" => Some(StationId::R2),
            "R3" => Some(StationId::R3),
            "B1" => Some(StationId::B1),
            "B2" => Some(StationId::B2),
            "B3" => Some(StationId::B3),
            _ => None,
        }
    }

    /// Position of this station in [`StationId::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            StationId::R1 => 0,
            StationId::R2 => 1,
            StationId::R3 => 2,
            StationId::B1 => 3,
            StationId::B2 => 4,
            StationId::B3 => 5,
        }
    }

    /// Whether this is a red-alliance station.
    pub const fn is_red(&self) -> bool {
        matches!(self, StationId::R1 | StationId::R2 | StationId::R3)
    }
}

impl core::fmt::Display for StationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-station readiness state.
///
/// E-stop dominates bypass for enable decisions, and either blocks the
/// robot from enabling.
#[derive(Debug, Default)]
pub struct AllianceStation {
    /// Assigned team, if any. An empty slot also has no connection.
    pub team: Option<Team>,
    /// Live driver station connection, if one has handshaken in.
    pub ds_conn: Option<DriverStationConnection>,
    /// Operator override removing this station from readiness checks
    /// while keeping its robot disabled.
    pub bypass: bool,
    /// Safety override forcing the robot disabled regardless of phase.
    pub emergency_stop: bool,
}

impl AllianceStation {
    /// Assigns a team to this station.
    ///
    /// Re-assigning the team already present is a no-op that preserves the
    /// existing connection. Assigning a different team releases the old
    /// connection; the departing team's socket must not keep addressing
    /// this station.
    pub fn assign(&mut self, team: Team) {
        if let Some(current) = &self.team {
            if current.id == team.id {
                return;
            }
        }
        self.team = Some(team);
        self.ds_conn = None;
    }

    /// Empties the station, releasing any connection.
    pub fn clear(&mut self) {
        self.team = None;
        self.ds_conn = None;
    }

    /// Whether this station satisfies the pre-match readiness rule:
    /// bypassed, or occupied with a linked robot.
    pub fn is_ready(&self) -> bool {
        if self.bypass {
            return true;
        }
        self.team.is_some()
            && self
                .ds_conn
                .as_ref()
                .is_some_and(|conn| conn.robot_linked)
    }
}

/// The fixed container of all six stations, keyed by [`StationId`].
#[derive(Debug, Default)]
pub struct StationMap([AllianceStation; 6]);

impl StationMap {
    /// Creates a map of six empty stations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates stations in R1..B3 order.
    pub fn iter(&self) -> impl Iterator<Item = (StationId, &AllianceStation)> + '_ {
        StationId::ALL.iter().map(move |id| (*id, &self[*id]))
    }

    /// Resets every station to empty with all flags cleared.
    pub fn reset(&mut self) {
        self.0 = Default::default();
    }

    /// Clears the bypass and emergency-stop flags on every station,
    /// leaving assignments and connections alone.
    pub fn clear_overrides(&mut self) {
        for station in &mut self.0 {
            station.bypass = false;
            station.emergency_stop = false;
        }
    }

    /// Whether any station has an active emergency stop.
    pub fn any_emergency_stop(&self) -> bool {
        self.0.iter().any(|s| s.emergency_stop)
    }

    /// Team numbers currently assigned, in R1..B3 order.
    pub fn team_ids(&self) -> [Option<u32>; 6] {
        let mut ids = [None; 6];
        for (i, station) in self.0.iter().enumerate() {
            ids[i] = station.team.as_ref().map(|t| t.id);
        }
        ids
    }
}

impl core::ops::Index<StationId> for StationMap {
    type Output = AllianceStation;

    fn index(&self, id: StationId) -> &AllianceStation {
        &self.0[id.index()]
    }
}

impl core::ops::IndexMut<StationId> for StationMap {
    fn index_mut(&mut self, id: StationId) -> &mut AllianceStation {
        &mut self.0[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::DriverStationConnection;

    #[test]
    fn labels_cover_the_closed_set() {
        for id in StationId::ALL {
            assert_eq!(StationId::from_label(id.as_str()), Some(id));
        }
        assert_eq!(StationId::from_label("R4"), None);
        assert_eq!(StationId::from_label("r1"), None);
        assert_eq!(StationId::from_label(""), None);
    }

    #[test]
    fn indices_match_all_order() {
        for (i, id) in StationId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn reassign_same_team_preserves_connection() {
        let mut station = AllianceStation::default();
        station.assign(Team::with_id(254));
        station.ds_conn = Some(DriverStationConnection::new(254));
        station.ds_conn.as_mut().unwrap().robot_linked = true;

        station.assign(Team::with_id(254));
        assert!(station.ds_conn.as_ref().unwrap().robot_linked);

        station.assign(Team::with_id(1114));
        assert!(station.ds_conn.is_none());
        assert_eq!(station.team.as_ref().unwrap().id, 1114);
    }

    #[test]
    fn readiness_rule() {
        let mut station = AllianceStation::default();
        // Empty and not bypassed.
        assert!(!station.is_ready());

        station.bypass = true;
        assert!(station.is_ready());
        station.bypass = false;

        station.assign(Team::with_id(118));
        assert!(!station.is_ready()); // no connection yet

        station.ds_conn = Some(DriverStationConnection::new(118));
        assert!(!station.is_ready()); // connected but robot not linked

        station.ds_conn.as_mut().unwrap().robot_linked = true;
        assert!(station.is_ready());
    }

    #[test]
    fn clear_overrides_keeps_assignments() {
        let mut map = StationMap::new();
        map[StationId::R1].assign(Team::with_id(33));
        map[StationId::R1].bypass = true;
        map[StationId::B3].emergency_stop = true;

        map.clear_overrides();
        assert!(!map[StationId::R1].bypass);
        assert!(!map[StationId::B3].emergency_stop);
        assert_eq!(map[StationId::R1].team.as_ref().unwrap().id, 33);
    }

    #[test]
    fn team_ids_in_station_order() {
        let mut map = StationMap::new();
        map[StationId::R2].assign(Team::with_id(254));
        map[StationId::B1].assign(Team::with_id(971));
        assert_eq!(
            map.team_ids(),
            [None, Some(254), None, Some(971), None, None]
        );
    }
}
