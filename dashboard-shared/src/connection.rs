//! Connection status tracking.
//!
//! Every poll produces an [`Observation`]; the tracker turns it into the
//! displayed [`ConnectionStatus`]. There is no debouncing: the latest
//! observation always wins.

use crate::client::Backend;
use crate::types::SensorSource;

/// How the device is currently reaching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    None,
    Serial,
    Wifi,
}

/// Why the status is [`ConnectionStatus::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Nothing has been polled yet.
    Connecting,
    NoData,
    BackendUnreachable,
    WaitingForDevice,
}

impl DisconnectReason {
    pub fn message(&self) -> &'static str {
        match self {
            DisconnectReason::Connecting => "connecting to backend",
            DisconnectReason::NoData => "no data yet",
            DisconnectReason::BackendUnreachable => "backend unreachable",
            DisconnectReason::WaitingForDevice => "waiting for device",
        }
    }
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of classifying one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Reading arrived over the serial link, or the serial probe reports it up.
    Serial,
    Wifi,
    /// Source was unknown and the serial probe reports the link down.
    SerialLinkDown,
    /// Backend answered with no content.
    NoData,
    /// A request to the backend failed.
    Unreachable,
}

/// Classify a snapshot source, probing the serial link when the source is
/// unknown or absent.
pub async fn classify_source<B: Backend>(
    backend: &B,
    source: Option<SensorSource>,
) -> Observation {
    match source {
        Some(SensorSource::Serial) => Observation::Serial,
        Some(SensorSource::Wifi) => Observation::Wifi,
        Some(SensorSource::Unknown) | None => match backend.serial_status().await {
            Ok(status) if status.connected => Observation::Serial,
            Ok(_) => Observation::SerialLinkDown,
            Err(e) => {
                log::warn!("Serial status probe failed: {e}");
                Observation::Unreachable
            }
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatusTracker {
    status: ConnectionStatus,
    reason: Option<DisconnectReason>,
}

impl Default for ConnectionStatusTracker {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::None,
            reason: Some(DisconnectReason::Connecting),
        }
    }
}

impl ConnectionStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Set only while the status is [`ConnectionStatus::None`].
    pub fn reason(&self) -> Option<DisconnectReason> {
        self.reason
    }

    /// Apply an observation. Returns true if the displayed state changed.
    pub fn observe(&mut self, observation: Observation) -> bool {
        let (status, reason) = match observation {
            Observation::Serial => (ConnectionStatus::Serial, None),
            Observation::Wifi => (ConnectionStatus::Wifi, None),
            Observation::SerialLinkDown => (
                ConnectionStatus::None,
                Some(DisconnectReason::WaitingForDevice),
            ),
            Observation::NoData => (ConnectionStatus::None, Some(DisconnectReason::NoData)),
            Observation::Unreachable => (
                ConnectionStatus::None,
                Some(DisconnectReason::BackendUnreachable),
            ),
        };
        let changed = self.status != status || self.reason != reason;
        if changed {
            log::debug!("Connection status {:?} -> {:?} ({:?})", self.status, status, reason);
        }
        self.status = status;
        self.reason = reason;
        changed
    }

    /// CSS class of the status indicator dot.
    pub fn indicator_class(&self) -> &'static str {
        match self.status {
            ConnectionStatus::Wifi => "wifi",
            ConnectionStatus::Serial => "serial",
            ConnectionStatus::None => "offline",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.status {
            ConnectionStatus::Wifi => "WiFi link",
            ConnectionStatus::Serial => "Serial link",
            ConnectionStatus::None => "Not connected",
        }
    }

    pub fn footer(&self) -> &'static str {
        match (self.status, self.reason) {
            (ConnectionStatus::Wifi, _) => "WiFi connection - TCP port 3203",
            (ConnectionStatus::Serial, _) => "Serial connection - COM port",
            (ConnectionStatus::None, Some(reason)) => reason.message(),
            (ConnectionStatus::None, None) => "Waiting for data...",
        }
    }
}
