//! Poll scheduling bookkeeping.
//!
//! The timer itself lives in the frontend. Each tick calls [`PollingLoop::begin`],
//! awaits [`PollingLoop::fetch`] without holding any state borrow, then hands
//! the outcome to [`PollingLoop::complete`]. Fetches may overlap on a slow
//! network; completions carrying an older ticket than one already completed
//! are discarded, and a reading whose record time equals the last applied one
//! leaves the series alone.

use crate::client::{Backend, ClientError};
use crate::connection::{classify_source, Observation};
use crate::reconciler::{reconcile, DashboardState, ReconcileReport};
use crate::types::{RecordTime, Snapshot};

/// Identifies one issued poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollTicket {
    seq: u64,
}

impl PollTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What one fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Backend has no reading yet.
    NoData,
    /// A reading, with the connection observation derived from its source.
    /// The observation is `None` when the reading has no record time.
    Snapshot {
        snapshot: Snapshot,
        observation: Option<Observation>,
    },
    Failed(ClientError),
}

/// What completing a poll did to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum TickReport {
    /// A newer poll had already completed.
    Superseded,
    NoData,
    Failed,
    /// Reading carried no record time.
    Ignored,
    /// Same record time as the last applied reading.
    Unchanged,
    Applied(ReconcileReport),
}

impl TickReport {
    /// Whether charts and readouts need repainting.
    pub fn needs_redraw(&self) -> bool {
        matches!(self, TickReport::Applied(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PollingLoop {
    started: bool,
    next_seq: u64,
    last_completed: Option<u64>,
    last_record_time: Option<RecordTime>,
}

impl PollingLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the loop as started. Returns false if it already was.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn last_record_time(&self) -> Option<&RecordTime> {
        self.last_record_time.as_ref()
    }

    pub fn begin(&mut self) -> PollTicket {
        self.next_seq += 1;
        PollTicket { seq: self.next_seq }
    }

    /// Fetch the latest reading and classify its source.
    pub async fn fetch<B: Backend>(backend: &B) -> PollOutcome {
        match backend.latest_snapshot().await {
            Ok(None) => PollOutcome::NoData,
            Ok(Some(snapshot)) => {
                let observation = match snapshot.record_time {
                    Some(_) => Some(classify_source(backend, snapshot.source).await),
                    None => None,
                };
                PollOutcome::Snapshot {
                    snapshot,
                    observation,
                }
            }
            Err(e) => {
                log::warn!("Failed to fetch latest reading: {e}");
                PollOutcome::Failed(e)
            }
        }
    }

    /// Apply a finished poll to `state`.
    pub fn complete(
        &mut self,
        ticket: PollTicket,
        outcome: PollOutcome,
        state: &mut DashboardState,
    ) -> TickReport {
        if self.last_completed.is_some_and(|last| ticket.seq <= last) {
            log::debug!("Discarding superseded poll {}", ticket.seq);
            return TickReport::Superseded;
        }
        self.last_completed = Some(ticket.seq);

        match outcome {
            PollOutcome::NoData => {
                state.connection.observe(Observation::NoData);
                TickReport::NoData
            }
            PollOutcome::Failed(_) => {
                state.connection.observe(Observation::Unreachable);
                TickReport::Failed
            }
            PollOutcome::Snapshot {
                snapshot,
                observation,
            } => {
                let Some(record_time) = snapshot.record_time.clone() else {
                    return TickReport::Ignored;
                };
                if let Some(observation) = observation {
                    state.connection.observe(observation);
                }
                if self.last_record_time.as_ref() == Some(&record_time) {
                    return TickReport::Unchanged;
                }
                log::trace!("Applying reading {record_time:?}");
                self.last_record_time = Some(record_time);
                TickReport::Applied(reconcile(state, &snapshot))
            }
        }
    }

    /// Begin, fetch and complete a single poll.
    pub async fn poll_once<B: Backend>(
        &mut self,
        backend: &B,
        state: &mut DashboardState,
    ) -> TickReport {
        let ticket = self.begin();
        let outcome = Self::fetch(backend).await;
        self.complete(ticket, outcome, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CommandAck, SerialStatus};
    use crate::command::{Command, NetworkCommand};
    use crate::connection::{ConnectionStatus, DisconnectReason};
    use crate::readout::Comfort;
    use crate::types::{Channel, SensorSource};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Serves queued `latest` replies in order.
    struct QueuedBackend {
        replies: RefCell<VecDeque<Result<Option<Snapshot>, ClientError>>>,
        serial_connected: bool,
    }

    impl QueuedBackend {
        fn new(replies: Vec<Result<Option<Snapshot>, ClientError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                serial_connected: false,
            }
        }
    }

    impl Backend for QueuedBackend {
        async fn latest_snapshot(&self) -> Result<Option<Snapshot>, ClientError> {
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(None))
        }

        async fn serial_status(&self) -> Result<SerialStatus, ClientError> {
            Ok(SerialStatus {
                connected: self.serial_connected,
            })
        }

        async fn send_network_command(
            &self,
            _body: &NetworkCommand,
        ) -> Result<CommandAck, ClientError> {
            Ok(CommandAck { success: false })
        }

        async fn send_serial_command(
            &self,
            _command: &Command,
        ) -> Result<CommandAck, ClientError> {
            Ok(CommandAck { success: false })
        }
    }

    fn reading(time: i64, temperature: f64, source: SensorSource) -> Snapshot {
        Snapshot {
            record_time: Some(RecordTime::EpochMillis(time)),
            temperature: Some(temperature),
            source: Some(source),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_end_to_end_wifi_reading_then_repeat() {
        let first = reading(1000, 21.5, SensorSource::Wifi);
        let repeat = Snapshot {
            humidity: Some(40.0),
            ..reading(1000, 23.0, SensorSource::Wifi)
        };
        let backend = QueuedBackend::new(vec![Ok(Some(first)), Ok(Some(repeat))]);
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert!(report.needs_redraw());
        assert_eq!(state.connection.status(), ConnectionStatus::Wifi);
        assert_eq!(state.series.get(Channel::Temperature).len(), 1);
        assert_eq!(state.comfort.map(|c| c.as_str()), Some("comfortable"));

        let before = state.clone();
        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::Unchanged);
        assert!(!report.needs_redraw());
        assert_eq!(state, before);
    }

    #[test]
    fn test_equal_time_in_different_encodings_is_unchanged() {
        let text = Snapshot {
            record_time: Some(RecordTime::from_text("1970-01-01T00:00:01Z")),
            temperature: Some(20.0),
            ..Snapshot::default()
        };
        let backend = QueuedBackend::new(vec![
            Ok(Some(reading(1000, 20.0, SensorSource::Serial))),
            Ok(Some(text)),
        ]);
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        tokio_test::block_on(polling.poll_once(&backend, &mut state));
        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::Unchanged);
        assert_eq!(state.series.get(Channel::Temperature).len(), 1);
    }

    #[test]
    fn test_unchanged_reading_still_refreshes_status() {
        let mut backend = QueuedBackend::new(vec![
            Ok(Some(reading(7, 20.0, SensorSource::Wifi))),
            Ok(Some(Snapshot {
                source: None,
                ..reading(7, 20.0, SensorSource::Wifi)
            })),
        ]);
        backend.serial_connected = true;
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(state.connection.status(), ConnectionStatus::Wifi);

        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::Unchanged);
        assert_eq!(state.connection.status(), ConnectionStatus::Serial);
    }

    #[test]
    fn test_no_data_and_failure_downgrade_status() {
        let backend = QueuedBackend::new(vec![
            Ok(Some(reading(1, 20.0, SensorSource::Serial))),
            Ok(None),
            Err(ClientError::Http("connection refused".into())),
            Ok(Some(reading(2, 21.0, SensorSource::Serial))),
        ]);
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(state.connection.status(), ConnectionStatus::Serial);

        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::NoData);
        assert_eq!(state.connection.reason(), Some(DisconnectReason::NoData));

        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::Failed);
        assert_eq!(
            state.connection.reason(),
            Some(DisconnectReason::BackendUnreachable)
        );

        // The loop keeps going after a failure.
        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert!(report.needs_redraw());
        assert_eq!(state.series.get(Channel::Temperature).len(), 2);
    }

    #[test]
    fn test_reading_without_record_time_is_ignored() {
        let backend = QueuedBackend::new(vec![Ok(Some(Snapshot {
            temperature: Some(35.0),
            source: Some(SensorSource::Wifi),
            ..Snapshot::default()
        }))]);
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        let report = tokio_test::block_on(polling.poll_once(&backend, &mut state));
        assert_eq!(report, TickReport::Ignored);
        assert_eq!(state, DashboardState::default());
        assert!(polling.last_record_time().is_none());
    }

    #[test]
    fn test_superseded_poll_is_discarded() {
        let mut polling = PollingLoop::new();
        let mut state = DashboardState::default();

        let slow = polling.begin();
        let fast = polling.begin();

        let newer = PollOutcome::Snapshot {
            snapshot: reading(2000, 24.0, SensorSource::Wifi),
            observation: Some(Observation::Wifi),
        };
        let older = PollOutcome::Snapshot {
            snapshot: reading(1000, 10.0, SensorSource::Serial),
            observation: Some(Observation::Serial),
        };

        assert!(polling.complete(fast, newer, &mut state).needs_redraw());
        assert_eq!(polling.complete(slow, older, &mut state), TickReport::Superseded);

        let temps = state.series.get(Channel::Temperature).to_vec();
        assert_eq!(temps, vec![24.0]);
        assert_eq!(state.connection.status(), ConnectionStatus::Wifi);
        assert_eq!(state.comfort, Some(Comfort::Comfortable));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut polling = PollingLoop::new();
        assert!(!polling.is_started());
        assert!(polling.start());
        assert!(!polling.start());
        assert!(polling.is_started());
    }
}
