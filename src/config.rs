//! Event settings for the arena and the field network.
//!
//! # Example
//!
//! ```rust
//! use field_arena::config::{AccessPointSettings, EventSettings};
//!
//! // Use defaults
//! let settings = EventSettings::default();
//!
//! // Or customize
//! let settings = EventSettings::default()
//!     .with_network_security(true)
//!     .with_access_point(AccessPointSettings::default().with_ssh_port(10022));
//! ```

use crate::clock::MatchTiming;

/// Default minimum interval between driver station control packets.
pub const DEFAULT_DS_PACKET_PERIOD_MS: u64 = 250;

/// Default deadline for one network configuration session.
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// Main settings
// ============================================================================

/// Complete event configuration consumed by the arena.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSettings {
    /// Whether loading a match reconfigures the field network for the
    /// assigned teams.
    pub network_security_enabled: bool,
    /// Field access point endpoint.
    pub access_point: AccessPointSettings,
    /// Field network switch endpoint.
    pub switch: SwitchSettings,
    /// Match phase durations.
    pub timing: MatchTiming,
    /// Minimum interval between driver station packets, in milliseconds.
    pub ds_packet_period_ms: u64,
    /// Deadline for each network configuration session, in milliseconds.
    pub network_timeout_ms: u64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            network_security_enabled: false,
            access_point: AccessPointSettings::default(),
            switch: SwitchSettings::default(),
            timing: MatchTiming::default(),
            ds_packet_period_ms: DEFAULT_DS_PACKET_PERIOD_MS,
            network_timeout_ms: DEFAULT_NETWORK_TIMEOUT_MS,
        }
    }
}

impl EventSettings {
    /// Enable or disable network security.
    pub fn with_network_security(mut self, enabled: bool) -> Self {
        self.network_security_enabled = enabled;
        self
    }

    /// Set the access point endpoint.
    pub fn with_access_point(mut self, access_point: AccessPointSettings) -> Self {
        self.access_point = access_point;
        self
    }

    /// Set the switch endpoint.
    pub fn with_switch(mut self, switch: SwitchSettings) -> Self {
        self.switch = switch;
        self
    }

    /// Set the match timing.
    pub fn with_timing(mut self, timing: MatchTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Set the driver station packet period.
    pub fn with_ds_packet_period_ms(mut self, period_ms: u64) -> Self {
        self.ds_packet_period_ms = period_ms;
        self
    }

    /// Set the network configuration deadline.
    pub fn with_network_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.network_timeout_ms = timeout_ms;
        self
    }
}

// ============================================================================
// Endpoint settings
// ============================================================================

/// Field access point endpoint (configured over SSH).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessPointSettings {
    /// Access point address on the field network.
    pub host: String,
    /// SSH port; overridable for test fixtures.
    pub ssh_port: u16,
    /// Admin password.
    pub password: String,
    /// Base string the per-team WPA keys are derived from.
    pub wpa_key_base: String,
}

impl Default for AccessPointSettings {
    fn default() -> Self {
        Self {
            host: "10.0.100.2".to_string(),
            ssh_port: 22,
            password: String::new(),
            wpa_key_base: String::new(),
        }
    }
}

impl AccessPointSettings {
    /// Set the host address.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the SSH port.
    pub fn with_ssh_port(mut self, port: u16) -> Self {
        self.ssh_port = port;
        self
    }

    /// Set the admin password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the WPA key base.
    pub fn with_wpa_key_base(mut self, base: impl Into<String>) -> Self {
        self.wpa_key_base = base.into();
        self
    }
}

/// Field network switch endpoint (configured over Telnet).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchSettings {
    /// Switch address on the field network.
    pub host: String,
    /// Telnet port; overridable for test fixtures.
    pub telnet_port: u16,
    /// Admin password.
    pub password: String,
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self {
            host: "10.0.100.3".to_string(),
            telnet_port: 23,
            password: String::new(),
        }
    }
}

impl SwitchSettings {
    /// Set the host address.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the Telnet port.
    pub fn with_telnet_port(mut self, port: u16) -> Self {
        self.telnet_port = port;
        self
    }

    /// Set the admin password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = EventSettings::default();
        assert!(!settings.network_security_enabled);
        assert_eq!(settings.ds_packet_period_ms, 250);
        assert_eq!(settings.access_point.ssh_port, 22);
        assert_eq!(settings.switch.telnet_port, 23);
        assert_eq!(settings.timing.teleop_duration_sec, 140);
    }

    #[test]
    fn builder_overrides() {
        let settings = EventSettings::default()
            .with_network_security(true)
            .with_ds_packet_period_ms(100)
            .with_access_point(AccessPointSettings::default().with_ssh_port(10022))
            .with_switch(SwitchSettings::default().with_telnet_port(10023));
        assert!(settings.network_security_enabled);
        assert_eq!(settings.ds_packet_period_ms, 100);
        assert_eq!(settings.access_point.ssh_port, 10022);
        assert_eq!(settings.switch.telnet_port, 10023);
    }
}
