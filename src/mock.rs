//! Test doubles for the transport and network seams.
//!
//! These are real (if minimal) implementations usable from integration
//! tests and doc examples, mirroring how the crate is exercised without a
//! physical field.
//!
//! | Mock | Seam | Purpose |
//! |------|------|---------|
//! | [`MockDsTransport`] | [`DsTransport`] | Records emitted control packets |
//! | [`RecordingNetwork`] | [`NetworkSetup`] | Records configure requests |

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::ds::{DsPacket, DsTransport};
use crate::network::{NetworkSetup, StationTeams};

/// Driver station transport that records every packet.
///
/// The struct is a cheap cloneable handle: keep one clone in the test and
/// box another into the connection, then inspect what was sent.
///
/// # Example
///
/// ```rust
/// use field_arena::ds::DriverStationConnection;
/// use field_arena::mock::MockDsTransport;
///
/// let transport = MockDsTransport::new();
/// let mut conn = DriverStationConnection::with_transport(254, Box::new(transport.clone()));
/// conn.send_control_packet(0).unwrap();
/// assert_eq!(transport.sent().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockDsTransport {
    sent: Arc<Mutex<Vec<DsPacket>>>,
    fail: Arc<AtomicBool>,
}

impl MockDsTransport {
    /// Creates a transport that accepts every packet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets sent so far, oldest first.
    pub fn sent(&self) -> Vec<DsPacket> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recent packet, if any.
    pub fn last_sent(&self) -> Option<DsPacket> {
        self.sent.lock().unwrap().last().copied()
    }

    /// Makes subsequent sends fail (simulates a transport that would
    /// block).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl DsTransport for MockDsTransport {
    fn send(&mut self, packet: &DsPacket) -> io::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "transport full"));
        }
        self.sent.lock().unwrap().push(*packet);
        Ok(())
    }
}

/// Network setup that records each configure request instead of touching
/// any device.
#[derive(Clone, Debug, Default)]
pub struct RecordingNetwork {
    runs: Arc<Mutex<Vec<StationTeams>>>,
}

impl RecordingNetwork {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure requests received so far, oldest first.
    pub fn runs(&self) -> Vec<StationTeams> {
        self.runs.lock().unwrap().clone()
    }
}

impl NetworkSetup for RecordingNetwork {
    fn configure(&self, teams: StationTeams) {
        self.runs.lock().unwrap().push(teams);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_transport_records_and_fails_on_demand() {
        let transport = MockDsTransport::new();
        let mut boxed: Box<dyn DsTransport> = Box::new(transport.clone());

        let packet = DsPacket {
            team_id: 254,
            auto: true,
            enabled: false,
            robot_linked: false,
        };
        boxed.send(&packet).unwrap();
        assert_eq!(transport.sent(), vec![packet]);
        assert_eq!(transport.last_sent(), Some(packet));

        transport.set_fail(true);
        assert!(boxed.send(&packet).is_err());
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn recording_network_captures_requests() {
        let network = RecordingNetwork::new();
        network.configure([Some(254), None, None, None, None, Some(1114)]);
        let runs = network.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0][0], Some(254));
        assert_eq!(runs[0][5], Some(1114));
    }
}
