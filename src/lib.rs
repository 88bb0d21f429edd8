//! # field-arena
//!
//! The arena controller at the heart of a robotics-competition
//! field-management system: it owns the authoritative state of a live
//! match and the communication contract with each alliance station's
//! driver station.
//!
//! ## Features
//!
//! - **Timed state machine**: pre-match through post-match, phases derived
//!   purely from elapsed time with transition guards on every command
//! - **Driver station pacing**: one control packet per station per pacing
//!   interval, plus a forced packet at every phase boundary
//! - **Safety overrides**: emergency stop and bypass per station, enforced
//!   in the readiness gate and in every emitted enable bit
//! - **Match loading rules**: assignment identity, qualification
//!   substitution lockout, deterministic next-match selection
//! - **Field network configuration**: asynchronous, deadline-bounded
//!   access point and switch reconfiguration on match load
//!
//! ## Architecture
//!
//! The crate is structured so the whole state machine runs under test
//! with no sockets and no sleeping:
//!
//! - `station` - The six fixed alliance stations and their flags
//! - `ds` - Driver station connections and the control packet transport
//! - `clock` - Match phases and the pure phase-from-time derivation
//! - `readiness` - The pre-match readiness gate
//! - `schedule` - Deterministic next-match selection
//! - `store` - The persistence capability and the in-memory store
//! - `network` - Field access point / switch configuration
//! - `arena` - The controller that ties everything together
//! - `mock` - Transport and network test doubles
//!
//! ## Example
//!
//! ```rust
//! use field_arena::{
//!     Arena, DriverStationConnection, EventSettings, EventStore, MatchPhase, MemoryStore,
//!     StationId, Team,
//! };
//!
//! let mut store = MemoryStore::new();
//! store.create_team(Team::with_id(254)).unwrap();
//! let mut arena = Arena::new(store, EventSettings::default());
//!
//! // Put team 254 on Blue 3 with a linked robot; bypass the rest.
//! arena.assign_team(254, "B3").unwrap();
//! let mut conn = DriverStationConnection::new(254);
//! conn.robot_linked = true;
//! arena.station_mut(StationId::B3).ds_conn = Some(conn);
//! for id in [StationId::R1, StationId::R2, StationId::R3, StationId::B1, StationId::B2] {
//!     arena.station_mut(id).bypass = true;
//! }
//!
//! // Start and tick: the first update observes autonomous and enables.
//! arena.start_match(1_000).unwrap();
//! arena.update(1_010);
//! assert_eq!(arena.state(), MatchPhase::AutoPeriod);
//! assert!(arena.station(StationId::B3).ds_conn.as_ref().unwrap().enabled);
//! ```

#![warn(missing_docs)]

/// The arena controller: state machine, command surface, update tick.
pub mod arena;
/// Match phases and the pure phase-from-elapsed-time derivation.
pub mod clock;
/// Event settings for the arena and the field network.
pub mod config;
/// Driver station connections and control packets.
pub mod ds;
/// Transport and network test doubles.
pub mod mock;
/// Team and match value types.
pub mod model;
/// Asynchronous field network configuration.
pub mod network;
/// The pre-match readiness gate.
pub mod readiness;
/// Deterministic next-match selection.
pub mod schedule;
/// Alliance stations and the fixed six-station map.
pub mod station;
/// The persistence capability and the in-memory store.
pub mod store;

// Re-exports for convenience
pub use arena::{Arena, ArenaError, ArenaState, StationSummary};
pub use clock::{MatchPhase, MatchTiming};
pub use config::{AccessPointSettings, EventSettings, SwitchSettings};
pub use ds::{DriverStationConnection, DsPacket, DsTransport, UdpDsTransport};
pub use model::{Match, MatchType, Team, STATUS_COMPLETE};
pub use network::{FieldNetwork, NetworkSetup, NullNetwork, StationTeams};
pub use readiness::NotReady;
pub use station::{AllianceStation, StationId, StationMap};
pub use store::{EventStore, MemoryStore, StoreError};
