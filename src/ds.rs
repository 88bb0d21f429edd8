//! Driver station connections and the control packet they carry.
//!
//! One [`DriverStationConnection`] exists per handshaken driver station.
//! The arena writes the auto/enable flags into the connection on every
//! emission and the connection pushes one control packet through its
//! transport. Emission is non-blocking: a transport error drops the packet
//! (the arena logs it) and pacing resumes on the next tick.

use std::io;

/// Control packet sent to one driver station.
///
/// The robot-linked bit echoes the last link report back to the driver
/// station so its display agrees with the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DsPacket {
    /// Team number the packet addresses.
    pub team_id: u32,
    /// Robot should run autonomous code.
    pub auto: bool,
    /// Robot may enable.
    pub enabled: bool,
    /// Echo of the driver station's last robot-link report.
    pub robot_linked: bool,
}

impl DsPacket {
    /// Fixed on-wire encoding: team number big-endian, then one flag byte.
    pub fn encode(&self) -> [u8; 5] {
        let mut buf = [0u8; 5];
        buf[..4].copy_from_slice(&self.team_id.to_be_bytes());
        buf[4] = (self.auto as u8) | (self.enabled as u8) << 1 | (self.robot_linked as u8) << 2;
        buf
    }
}

/// Transport seam for delivering control packets to a driver station.
///
/// Implementations must not block: if the underlying socket would block,
/// return an error and let the packet drop.
pub trait DsTransport: Send {
    /// Delivers one control packet.
    fn send(&mut self, packet: &DsPacket) -> io::Result<()>;
}

/// Endpoint state for one team's driver station.
///
/// The arena owns the connection through its station; only the arena
/// writer mutates it. `packet_count` increases by exactly one per
/// successfully emitted packet.
pub struct DriverStationConnection {
    /// Team this connection belongs to.
    pub team_id: u32,
    /// Last commanded autonomous flag.
    pub auto: bool,
    /// Last commanded enable flag.
    pub enabled: bool,
    /// Whether the driver station reports a live radio link to its robot.
    pub robot_linked: bool,
    packet_count: u64,
    last_packet_ms: Option<u64>,
    transport: Option<Box<dyn DsTransport>>,
}

impl DriverStationConnection {
    /// Creates a connection with no transport attached.
    ///
    /// Used during bring-up before the socket handshake completes;
    /// emissions still count but go nowhere.
    pub fn new(team_id: u32) -> Self {
        Self {
            team_id,
            auto: false,
            enabled: false,
            robot_linked: false,
            packet_count: 0,
            last_packet_ms: None,
            transport: None,
        }
    }

    /// Creates a connection that delivers packets through `transport`.
    pub fn with_transport(team_id: u32, transport: Box<dyn DsTransport>) -> Self {
        Self {
            transport: Some(transport),
            ..Self::new(team_id)
        }
    }

    /// Number of packets successfully emitted on this connection.
    pub fn packet_count(&self) -> u64 {
        self.packet_count
    }

    /// Timestamp of the last successful emission, if any.
    pub fn last_packet_ms(&self) -> Option<u64> {
        self.last_packet_ms
    }

    /// Builds a control packet from the current flags and pushes it
    /// through the transport.
    ///
    /// On transport error the packet is dropped and the counter does not
    /// move; the caller decides whether to log.
    pub fn send_control_packet(&mut self, now_ms: u64) -> io::Result<()> {
        let packet = DsPacket {
            team_id: self.team_id,
            auto: self.auto,
            enabled: self.enabled,
            robot_linked: self.robot_linked,
        };
        if let Some(transport) = self.transport.as_mut() {
            transport.send(&packet)?;
        }
        self.packet_count += 1;
        self.last_packet_ms = Some(now_ms);
        Ok(())
    }
}

/// UDP transport to a driver station endpoint.
///
/// The socket is non-blocking: a send that would block returns the error
/// and the packet drops, keeping the arena tick free of stalls.
pub struct UdpDsTransport {
    socket: std::net::UdpSocket,
}

impl UdpDsTransport {
    /// Opens a non-blocking socket addressed at one driver station.
    pub fn connect(addr: std::net::SocketAddr) -> io::Result<Self> {
        let socket = std::net::UdpSocket::bind(("0.0.0.0", 0))?;
        socket.set_nonblocking(true)?;
        socket.connect(addr)?;
        Ok(Self { socket })
    }
}

impl DsTransport for UdpDsTransport {
    fn send(&mut self, packet: &DsPacket) -> io::Result<()> {
        self.socket.send(&packet.encode())?;
        Ok(())
    }
}

impl core::fmt::Debug for DriverStationConnection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DriverStationConnection")
            .field("team_id", &self.team_id)
            .field("auto", &self.auto)
            .field("enabled", &self.enabled)
            .field("robot_linked", &self.robot_linked)
            .field("packet_count", &self.packet_count)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDsTransport;

    #[test]
    fn packet_encoding() {
        let packet = DsPacket {
            team_id: 254,
            auto: true,
            enabled: false,
            robot_linked: true,
        };
        let bytes = packet.encode();
        assert_eq!(&bytes[..4], &254u32.to_be_bytes());
        assert_eq!(bytes[4], 0b101);
    }

    #[test]
    fn emission_without_transport_still_counts() {
        let mut conn = DriverStationConnection::new(254);
        assert_eq!(conn.packet_count(), 0);
        conn.send_control_packet(1000).unwrap();
        conn.send_control_packet(1250).unwrap();
        assert_eq!(conn.packet_count(), 2);
        assert_eq!(conn.last_packet_ms(), Some(1250));
    }

    #[test]
    fn emission_carries_current_flags() {
        let transport = MockDsTransport::new();
        let mut conn =
            DriverStationConnection::with_transport(1114, Box::new(transport.clone()));
        conn.auto = true;
        conn.enabled = true;
        conn.robot_linked = true;
        conn.send_control_packet(500).unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            DsPacket {
                team_id: 1114,
                auto: true,
                enabled: true,
                robot_linked: true,
            }
        );
    }

    #[test]
    fn transport_failure_drops_packet_without_counting() {
        let transport = MockDsTransport::new();
        transport.set_fail(true);
        let mut conn =
            DriverStationConnection::with_transport(103, Box::new(transport.clone()));

        assert!(conn.send_control_packet(100).is_err());
        assert_eq!(conn.packet_count(), 0);
        assert_eq!(conn.last_packet_ms(), None);

        transport.set_fail(false);
        conn.send_control_packet(400).unwrap();
        assert_eq!(conn.packet_count(), 1);
    }
}
