//! Client-side engine for the live telemetry dashboard.
//!
//! Holds everything that does not touch the DOM: wire types, the backend
//! client, rolling per-channel series with statistics, connection status
//! tracking, command dispatch with transport fallback, poll bookkeeping and
//! the bar-chart renderer (against an abstract drawing surface). All of it
//! is WASM-compatible and testable natively.

pub mod chart;
pub mod client;
pub mod command;
pub mod config;
pub mod connection;
pub mod dispatcher;
mod http;
pub mod polling;
pub mod readout;
pub mod reconciler;
pub mod series;
pub mod types;

pub use chart::{render_bar_chart, ChartLayout, ChartSurface};
pub use client::{Backend, ClientError, CommandAck, DashboardClient, SerialStatus};
pub use command::{Command, NetworkCommand, ToggleKind};
pub use config::{ConfigError, DashboardConfig};
pub use connection::{
    classify_source, ConnectionStatus, ConnectionStatusTracker, DisconnectReason, Observation,
};
pub use dispatcher::{DispatchOutcome, DispatchTicket, Transport, TransportDispatcher};
pub use polling::{PollOutcome, PollTicket, PollingLoop, TickReport};
pub use readout::{Comfort, StatsRow};
pub use reconciler::{reconcile, DashboardState, ReconcileReport};
pub use series::{ChannelSeries, RollingSeries, SeriesStats, StatsView, SERIES_CAPACITY};
pub use types::{Channel, DeviceState, RecordTime, SensorSource, Snapshot, TogglePair};
