//! Match phases and the pure phase-from-elapsed-time derivation.
//!
//! Nothing here stores "time remaining": the current phase is always a
//! function of (match start time, phase durations, now). The arena feeds
//! the elapsed time in; this module owns the boundaries.
//!
//! # Example
//!
//! ```rust
//! use field_arena::{MatchPhase, MatchTiming};
//!
//! let timing = MatchTiming::default();
//! assert_eq!(timing.phase_at(0), MatchPhase::AutoPeriod);
//! assert_eq!(
//!     timing.phase_at(u64::from(timing.auto_duration_sec) * 1000),
//!     MatchPhase::PausePeriod,
//! );
//! ```

/// A time-bounded sub-interval of a match with distinct enable/auto
/// semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MatchPhase {
    /// No match running; robots stay disabled.
    #[default]
    PreMatch,
    /// Transient state between a successful start command and the first
    /// tick, which immediately observes the autonomous period.
    StartMatch,
    /// Autonomous period: robots enabled, running autonomous code.
    AutoPeriod,
    /// Pause between autonomous and teleop; robots disabled.
    PausePeriod,
    /// Teleoperated period: robots enabled under driver control.
    TeleopPeriod,
    /// Final stretch of teleop; same enable semantics, distinct for
    /// displays and game rules.
    EndgamePeriod,
    /// Match over; robots disabled until the arena is reset.
    PostMatch,
}

impl MatchPhase {
    /// Returns the phase as a short lowercase token.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::PreMatch => "pre-match",
            MatchPhase::StartMatch => "start-match",
            MatchPhase::AutoPeriod => "auto",
            MatchPhase::PausePeriod => "pause",
            MatchPhase::TeleopPeriod => "teleop",
            MatchPhase::EndgamePeriod => "endgame",
            MatchPhase::PostMatch => "post-match",
        }
    }

    /// Whether a match is underway (start through endgame). Live phases
    /// are the only ones the clock may advance, and the only ones a match
    /// abort is meaningful in.
    pub const fn is_live(&self) -> bool {
        matches!(
            self,
            MatchPhase::StartMatch
                | MatchPhase::AutoPeriod
                | MatchPhase::PausePeriod
                | MatchPhase::TeleopPeriod
                | MatchPhase::EndgamePeriod
        )
    }

    /// The autonomous bit commanded to driver stations in this phase.
    pub const fn auto_flag(&self) -> bool {
        matches!(
            self,
            MatchPhase::PreMatch | MatchPhase::StartMatch | MatchPhase::AutoPeriod
        )
    }

    /// Whether robots may enable in this phase, before per-station
    /// overrides are applied.
    pub const fn enable_flag(&self) -> bool {
        matches!(
            self,
            MatchPhase::AutoPeriod | MatchPhase::TeleopPeriod | MatchPhase::EndgamePeriod
        )
    }
}

impl core::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase durations for a match. Fixed for the lifetime of a running
/// match; `endgame_time_left_sec` must be less than
/// `teleop_duration_sec`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchTiming {
    /// Length of the autonomous period.
    pub auto_duration_sec: u32,
    /// Length of the pause between autonomous and teleop.
    pub pause_duration_sec: u32,
    /// Length of the teleoperated period, endgame included.
    pub teleop_duration_sec: u32,
    /// Time remaining in teleop at which the endgame period begins.
    pub endgame_time_left_sec: u32,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            auto_duration_sec: 10,
            pause_duration_sec: 1,
            teleop_duration_sec: 140,
            endgame_time_left_sec: 30,
        }
    }
}

impl MatchTiming {
    /// Total length of a match from start to post-match, in seconds.
    pub fn total_duration_sec(&self) -> u32 {
        self.auto_duration_sec + self.pause_duration_sec + self.teleop_duration_sec
    }

    /// Derives the phase for a live match from the elapsed time since
    /// the start command. Boundaries are half-open: an update landing
    /// exactly on a boundary is in the later phase.
    pub fn phase_at(&self, elapsed_ms: u64) -> MatchPhase {
        debug_assert!(self.endgame_time_left_sec < self.teleop_duration_sec);

        let auto_end = u64::from(self.auto_duration_sec) * 1000;
        let pause_end = auto_end + u64::from(self.pause_duration_sec) * 1000;
        let endgame_start = pause_end
            + u64::from(self.teleop_duration_sec - self.endgame_time_left_sec) * 1000;
        let match_end = pause_end + u64::from(self.teleop_duration_sec) * 1000;

        if elapsed_ms < auto_end {
            MatchPhase::AutoPeriod
        } else if elapsed_ms < pause_end {
            MatchPhase::PausePeriod
        } else if elapsed_ms < endgame_start {
            MatchPhase::TeleopPeriod
        } else if elapsed_ms < match_end {
            MatchPhase::EndgamePeriod
        } else {
            MatchPhase::PostMatch
        }
    }
}
