//! Team and match value types shared between the arena and the event store.
//!
//! These are plain values: the arena keeps its own copy of the loaded match
//! and never holds a reference into the store. Match id 0 is the implicit
//! test match and is never persisted.

use crate::station::StationId;

/// Match status value with schedule semantics.
///
/// The status field is otherwise free-form (scoring layers write their own
/// progress markers into it); only this value affects next-match selection.
pub const STATUS_COMPLETE: &str = "complete";

/// A team registered at the event.
///
/// Ids are the team's competition number and are assigned externally;
/// the store never generates them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    /// Competition team number. Never 0; 0 marks an empty station slot.
    pub id: u32,
    /// Team nickname for displays.
    pub nickname: String,
    /// Home city for displays.
    pub city: String,
}

impl Team {
    /// Creates a team with just a number, for callers that don't have
    /// roster details yet.
    pub fn with_id(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// The kind of match being played.
///
/// Substitution rules and next-match selection both key off this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatchType {
    /// Untracked test match (id 0, never persisted).
    #[default]
    Test,
    /// Practice match.
    Practice,
    /// Qualification match; team substitution is forbidden.
    Qualification,
    /// Elimination match.
    Elimination,
}

impl MatchType {
    /// Returns the type as its storage/display label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchType::Test => "test",
            MatchType::Practice => "practice",
            MatchType::Qualification => "qualification",
            MatchType::Elimination => "elimination",
        }
    }

    /// Parses a storage/display label. Input is trimmed and
    /// case-insensitive.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Some(MatchType::Test),
            "practice" => Some(MatchType::Practice),
            "qualification" => Some(MatchType::Qualification),
            "elimination" => Some(MatchType::Elimination),
            _ => None,
        }
    }
}

impl core::fmt::Display for MatchType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled (or test) match with its six team slots.
///
/// Team slots hold competition numbers; 0 means the slot is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// Store-assigned id; 0 denotes the implicit test match.
    pub id: u32,
    /// Kind of match.
    pub match_type: MatchType,
    /// Operator-facing name ("1", "Qual 12", "F-2", ...).
    pub display_name: String,
    /// Free-form status; [`STATUS_COMPLETE`] excludes the match from
    /// next-match selection.
    pub status: String,
    /// Red 1 team number (0 = empty).
    pub red1: u32,
    /// Red 2 team number (0 = empty).
    pub red2: u32,
    /// Red 3 team number (0 = empty).
    pub red3: u32,
    /// Blue 1 team number (0 = empty).
    pub blue1: u32,
    /// Blue 2 team number (0 = empty).
    pub blue2: u32,
    /// Blue 3 team number (0 = empty).
    pub blue3: u32,
}

impl Match {
    /// Creates a fresh, empty test match (id 0).
    pub fn test() -> Self {
        Self::default()
    }

    /// Creates an empty match of the given type.
    pub fn of_type(match_type: MatchType) -> Self {
        Self {
            match_type,
            ..Self::default()
        }
    }

    /// Whether this match has been played to completion.
    pub fn is_complete(&self) -> bool {
        self.status == STATUS_COMPLETE
    }

    /// Returns the team number in the slot for the given station
    /// (0 = empty).
    pub fn slot(&self, station: StationId) -> u32 {
        match station {
            StationId::R1 => self.red1,
            StationId::R2 => self.red2,
            StationId::R3 => self.red3,
            StationId::B1 => self.blue1,
            StationId::B2 => self.blue2,
            StationId::B3 => self.blue3,
        }
    }

    /// Writes a team number into the slot for the given station.
    pub fn set_slot(&mut self, station: StationId, team_id: u32) {
        match station {
            StationId::R1 => self.red1 = team_id,
            StationId::R2 => self.red2 = team_id,
            StationId::R3 => self.red3 = team_id,
            StationId::B1 => self.blue1 = team_id,
            StationId::B2 => self.blue2 = team_id,
            StationId::B3 => self.blue3 = team_id,
        }
    }

    /// Team numbers for all six stations in R1..B3 order.
    pub fn slots(&self) -> [u32; 6] {
        [
            self.red1, self.red2, self.red3, self.blue1, self.blue2, self.blue3,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_labels_round_trip() {
        for t in [
            MatchType::Test,
            MatchType::Practice,
            MatchType::Qualification,
            MatchType::Elimination,
        ] {
            assert_eq!(MatchType::from_label(t.as_str()), Some(t));
        }
        assert_eq!(MatchType::from_label("  Practice "), Some(MatchType::Practice));
        assert_eq!(MatchType::from_label("final"), None);
    }

    #[test]
    fn test_match_is_empty() {
        let m = Match::test();
        assert_eq!(m.id, 0);
        assert_eq!(m.match_type, MatchType::Test);
        assert!(!m.is_complete());
        assert_eq!(m.slots(), [0; 6]);
    }

    #[test]
    fn slots_map_to_stations() {
        let mut m = Match::test();
        m.set_slot(StationId::R2, 254);
        m.set_slot(StationId::B3, 1114);
        assert_eq!(m.red2, 254);
        assert_eq!(m.blue3, 1114);
        assert_eq!(m.slot(StationId::R2), 254);
        assert_eq!(m.slot(StationId::B3), 1114);
        assert_eq!(m.slot(StationId::R1), 0);
    }

    #[test]
    fn complete_status_is_exact() {
        let mut m = Match::test();
        m.status = "Complete".to_string();
        assert!(!m.is_complete());
        m.status = STATUS_COMPLETE.to_string();
        assert!(m.is_complete());
    }
}
