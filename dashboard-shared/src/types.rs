//! Wire and state types shared by the dashboard engine and the frontend.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Where the backend says the latest reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    Serial,
    Wifi,
    #[serde(other)]
    Unknown,
}

/// Timestamp attached to every reading by the backend.
///
/// The backend may send either epoch milliseconds or an ISO-8601 string.
/// Strings that parse are normalized to epoch milliseconds so that the same
/// instant compares equal regardless of its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordTime {
    EpochMillis(i64),
    Text(String),
}

impl RecordTime {
    /// Normalize a textual timestamp, keeping the raw text if it doesn't parse.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return RecordTime::EpochMillis(dt.timestamp_millis());
        }
        // Zone-less timestamps are interpreted as UTC.
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return RecordTime::EpochMillis(naive.and_utc().timestamp_millis());
            }
        }
        if let Ok(millis) = trimmed.parse::<i64>() {
            return RecordTime::EpochMillis(millis);
        }
        RecordTime::Text(trimmed.to_string())
    }

    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            RecordTime::EpochMillis(ms) => Some(*ms),
            RecordTime::Text(_) => None,
        }
    }
}

impl From<i64> for RecordTime {
    fn from(ms: i64) -> Self {
        RecordTime::EpochMillis(ms)
    }
}

impl<'de> Deserialize<'de> for RecordTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(ms) => RecordTime::EpochMillis(ms),
            Raw::Float(ms) => RecordTime::EpochMillis(ms.round() as i64),
            Raw::Text(text) => RecordTime::from_text(&text),
        })
    }
}

/// One polled reading of sensor and device state.
///
/// Every field is optional; missing fields leave the dashboard's prior state
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub record_time: Option<RecordTime>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub light_value: Option<f64>,
    #[serde(default)]
    pub relay_state: Option<bool>,
    #[serde(default)]
    pub auto_mode: Option<bool>,
    #[serde(default)]
    pub source: Option<SensorSource>,
}

/// A monitored physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Temperature,
    Humidity,
    Light,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Light];

    /// Top of the chart's vertical axis, matched to the expected sensor range.
    pub fn max_scale(&self) -> f64 {
        match self {
            Channel::Temperature => 60.0,
            Channel::Humidity => 100.0,
            Channel::Light => 3300.0,
        }
    }

    /// Bar colour for the channel's chart.
    pub fn color(&self) -> &'static str {
        match self {
            Channel::Temperature => "#ff7043",
            Channel::Humidity => "#4caf50",
            Channel::Light => "#ffd54f",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
            Channel::Light => "Light",
        }
    }

    /// Stable id used for canvas elements and CSS hooks.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Light => "light",
        }
    }

    /// The snapshot's value for this channel, if present.
    pub fn reading(&self, snapshot: &Snapshot) -> Option<f64> {
        match self {
            Channel::Temperature => snapshot.temperature,
            Channel::Humidity => snapshot.humidity,
            Channel::Light => snapshot.light_value,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Visual state of an on/off button pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TogglePair {
    pub on_active: bool,
    pub off_active: bool,
}

impl TogglePair {
    /// Exactly one side is active for a known state, neither when unknown.
    pub fn from_state(state: Option<bool>) -> Self {
        match state {
            Some(true) => Self {
                on_active: true,
                off_active: false,
            },
            Some(false) => Self {
                on_active: false,
                off_active: true,
            },
            None => Self::default(),
        }
    }
}

/// Device mode and relay state as last seen or last confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub is_auto: Option<bool>,
    pub relay_on: Option<bool>,
}

impl DeviceState {
    pub fn auto_buttons(&self) -> TogglePair {
        TogglePair::from_state(self.is_auto)
    }

    pub fn relay_buttons(&self) -> TogglePair {
        TogglePair::from_state(self.relay_on)
    }

    /// Apply the device fields of a snapshot. Returns true if anything changed.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        let before = *self;
        if let Some(relay) = snapshot.relay_state {
            self.relay_on = Some(relay);
        }
        if let Some(auto) = snapshot.auto_mode {
            self.is_auto = Some(auto);
        }
        before != *self
    }
}
