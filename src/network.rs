//! Asynchronous field network configuration for the loaded match.
//!
//! When a match is loaded with network security enabled, the arena hands
//! the six team assignments to a [`NetworkSetup`] and moves on. The real
//! implementation, [`FieldNetwork`], spawns one task per device — the
//! access point (SSH port) and the network switch (Telnet port) — each
//! bounded by the configured deadline. Failures are logged, never
//! surfaced: a half-configured field is an operator problem, not a reason
//! to refuse the match.
//!
//! The wire protocols themselves are out of scope here; the sessions push
//! a generated configuration script to the device endpoint and rely on
//! the device side for acknowledgment.

use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{error, info};

use crate::config::{AccessPointSettings, EventSettings, SwitchSettings};
use crate::station::StationId;

/// Log/error prefix for a failed switch configuration run.
pub const ETHERNET_FAILURE_MESSAGE: &str = "Failed to configure team Ethernet";

/// Log/error prefix for a failed access point configuration run.
pub const WIFI_FAILURE_MESSAGE: &str = "Failed to configure team WiFi";

/// Per-station team assignments in R1..B3 order (`None` = empty slot).
pub type StationTeams = [Option<u32>; 6];

/// Seam through which the arena requests field network reconfiguration.
///
/// `configure` must not block the arena: implementations either record
/// the request (test doubles) or spawn background work.
pub trait NetworkSetup: Send + Sync {
    /// Reconfigures the field for the given team assignments.
    fn configure(&self, teams: StationTeams);
}

/// No-op network setup, used when network security is disabled or in
/// unit tests that don't care about the field network.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNetwork;

impl NetworkSetup for NullNetwork {
    fn configure(&self, _teams: StationTeams) {}
}

// ============================================================================
// Addressing plan
// ============================================================================

/// VLAN number for a station: 10/20/30 red, 40/50/60 blue.
pub const fn station_vlan(station: StationId) -> u16 {
    (station.index() as u16 + 1) * 10
}

/// The team's /24 network prefix in `10.TE.AM` form (team 254 lives in
/// `10.2.54.0/24`).
pub fn team_subnet(team_id: u32) -> String {
    format!("10.{}.{}", team_id / 100, team_id % 100)
}

/// Per-team WPA key, derived from the event's key base.
pub fn team_wpa_key(base: &str, team_id: u32) -> String {
    format!("{base}{team_id:04}")
}

// ============================================================================
// Field network implementation
// ============================================================================

/// Configures the real access point and switch over TCP sessions.
///
/// Cloneable so each spawned task owns its own copy of the endpoint
/// settings; the arena keeps no handle to in-flight work.
#[derive(Clone, Debug)]
pub struct FieldNetwork {
    access_point: AccessPointSettings,
    switch: SwitchSettings,
    timeout_ms: u64,
}

impl FieldNetwork {
    /// Builds a field network from the event settings.
    pub fn new(settings: &EventSettings) -> Self {
        Self {
            access_point: settings.access_point.clone(),
            switch: settings.switch.clone(),
            timeout_ms: settings.network_timeout_ms,
        }
    }

    /// Pushes per-station SSID/WPA entries to the access point.
    ///
    /// The returned error chain starts with [`WIFI_FAILURE_MESSAGE`].
    pub async fn configure_team_wifi(&self, teams: StationTeams) -> anyhow::Result<()> {
        self.run_session(
            &self.access_point.host,
            self.access_point.ssh_port,
            access_point_script(&self.access_point, &teams),
            "access point",
        )
        .await
        .context(WIFI_FAILURE_MESSAGE)
    }

    /// Pushes per-station VLAN/IP plans to the network switch.
    ///
    /// The returned error chain starts with [`ETHERNET_FAILURE_MESSAGE`].
    pub async fn configure_team_ethernet(&self, teams: StationTeams) -> anyhow::Result<()> {
        self.run_session(
            &self.switch.host,
            self.switch.telnet_port,
            switch_script(&self.switch, &teams),
            "switch",
        )
        .await
        .context(ETHERNET_FAILURE_MESSAGE)
    }

    async fn run_session(
        &self,
        host: &str,
        port: u16,
        script: String,
        device: &str,
    ) -> anyhow::Result<()> {
        let deadline = Duration::from_millis(self.timeout_ms);
        timeout(deadline, async {
            let addr = format!("{host}:{port}");
            let mut stream = TcpStream::connect(&addr)
                .await
                .with_context(|| format!("connecting to {device} at {addr}"))?;
            stream
                .write_all(script.as_bytes())
                .await
                .with_context(|| format!("writing {device} configuration"))?;
            stream.shutdown().await.ok();
            Ok(())
        })
        .await
        .unwrap_or_else(|_| Err(anyhow!("{device} configuration timed out after {deadline:?}")))
    }
}

impl NetworkSetup for FieldNetwork {
    /// Spawns the two device sessions; must be called from within a tokio
    /// runtime.
    fn configure(&self, teams: StationTeams) {
        info!(?teams, "configuring field network");

        let net = self.clone();
        tokio::spawn(async move {
            if let Err(err) = net.configure_team_ethernet(teams).await {
                error!("{err:#}");
            }
        });

        let net = self.clone();
        tokio::spawn(async move {
            if let Err(err) = net.configure_team_wifi(teams).await {
                error!("{err:#}");
            }
        });
    }
}

// ============================================================================
// Configuration scripts
// ============================================================================

fn access_point_script(settings: &AccessPointSettings, teams: &StationTeams) -> String {
    let mut script = String::new();
    for (i, team) in teams.iter().enumerate() {
        match team {
            Some(team_id) => {
                script.push_str(&format!(
                    "set wireless.@wifi-iface[{i}].disabled=0\n\
                     set wireless.@wifi-iface[{i}].ssid={team_id}\n\
                     set wireless.@wifi-iface[{i}].key={}\n",
                    team_wpa_key(&settings.wpa_key_base, *team_id),
                ));
            }
            None => {
                script.push_str(&format!("set wireless.@wifi-iface[{i}].disabled=1\n"));
            }
        }
    }
    script.push_str("commit wireless\nexit\n");
    script
}

fn switch_script(settings: &SwitchSettings, teams: &StationTeams) -> String {
    let mut script = format!("{}\nenable\nconfigure terminal\n", settings.password);
    for station in StationId::ALL {
        let vlan = station_vlan(station);
        match teams[station.index()] {
            Some(team_id) => {
                let subnet = team_subnet(team_id);
                script.push_str(&format!(
                    "no ip dhcp pool dhcp{vlan}\n\
                     ip dhcp pool dhcp{vlan}\n\
                     network {subnet}.0 255.255.255.0\n\
                     default-router {subnet}.61\n\
                     interface Vlan{vlan}\n\
                     ip address {subnet}.61 255.255.255.0\n",
                ));
            }
            None => {
                script.push_str(&format!(
                    "no ip dhcp pool dhcp{vlan}\n\
                     interface Vlan{vlan}\n\
                     no ip address\n",
                ));
            }
        }
    }
    script.push_str("end\ncopy running-config startup-config\n\nexit\n");
    script
}
