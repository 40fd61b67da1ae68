//! Dashboard state and snapshot reconciliation.

use crate::config::DEFAULT_THRESHOLD;
use crate::connection::ConnectionStatusTracker;
use crate::readout::{Comfort, StatsRow};
use crate::series::{ChannelSeries, StatsView};
use crate::types::{Channel, DeviceState, Snapshot};

/// Everything the dashboard displays, owned in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub series: ChannelSeries,
    pub device: DeviceState,
    pub connection: ConnectionStatusTracker,
    /// Set once a temperature has been seen.
    pub comfort: Option<Comfort>,
    /// Humidity threshold slider position, in percent.
    pub threshold: u8,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl DashboardState {
    pub fn new(threshold: u8) -> Self {
        Self {
            series: ChannelSeries::default(),
            device: DeviceState::default(),
            connection: ConnectionStatusTracker::new(),
            comfort: None,
            threshold,
        }
    }

    pub fn view(&self, channel: Channel) -> StatsView {
        self.series.view(channel)
    }

    pub fn stats_row(&self, channel: Channel) -> StatsRow {
        StatsRow::from_view(channel, &self.view(channel))
    }
}

/// What a reconciliation touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Channels that received a new sample, in [`Channel::ALL`] order.
    pub updated: Vec<Channel>,
    /// Channels whose value was present but not a finite number.
    pub rejected: Vec<Channel>,
    pub device_changed: bool,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && !self.device_changed
    }
}

/// Apply the reading and device fields of a snapshot to `state`.
///
/// Absent fields leave the corresponding state untouched. Connection status
/// is handled by the polling loop, not here.
pub fn reconcile(state: &mut DashboardState, snapshot: &Snapshot) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for channel in Channel::ALL {
        let Some(value) = channel.reading(snapshot) else {
            continue;
        };
        if !value.is_finite() {
            log::warn!("Ignoring non-finite {channel} reading: {value}");
            report.rejected.push(channel);
            continue;
        }
        state.series.get_mut(channel).push(value);
        report.updated.push(channel);
        if channel == Channel::Temperature {
            state.comfort = Some(Comfort::classify(value));
        }
    }

    report.device_changed = state.device.apply_snapshot(snapshot);
    report
}
