//! The pre-match readiness gate.
//!
//! Evaluated when a start command arrives; the first failing rule wins.
//! An active emergency stop anywhere on the field blocks the start before
//! unreadiness is even considered.

use crate::station::StationMap;

/// Reason the field is not ready to start a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotReady {
    /// At least one station has an active emergency stop.
    #[error("Cannot start match while an emergency stop is active.")]
    EmergencyStopActive,
    /// At least one station is neither bypassed nor occupied by a linked
    /// robot.
    #[error("Cannot start match until all robots are connected or bypassed.")]
    RobotsNotReady,
}

/// Evaluates the readiness gate over all six stations, scanning in the
/// fixed R1..B3 order so the outcome is deterministic.
pub fn check_ready(stations: &StationMap) -> Result<(), NotReady> {
    if stations.any_emergency_stop() {
        return Err(NotReady::EmergencyStopActive);
    }
    if stations.iter().any(|(_, station)| !station.is_ready()) {
        return Err(NotReady::RobotsNotReady);
    }
    Ok(())
}
