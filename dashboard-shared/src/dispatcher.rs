//! Command delivery with network-relay then serial-relay fallback.
//!
//! When the device is on WiFi the command token is first relayed over the
//! device's network link. Anything short of an explicit success falls
//! through to the backend's serial relay, which is tried exactly once. A
//! command that reached the device over the network but whose reply was
//! lost can therefore be delivered twice; device tokens are idempotent.
//!
//! Each dispatch carries a sequence number. Optimistic updates to the local
//! [`DeviceState`] are only applied when no later command for the same
//! toggle has already been applied, so a slow reply cannot roll the
//! displayed state back.

use std::collections::HashMap;

use crate::client::{Backend, ClientError};
use crate::command::{Command, ToggleKind};
use crate::connection::ConnectionStatus;
use crate::types::DeviceState;

/// One of the two delivery paths for device commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    NetworkRelay,
    SerialRelay,
}

/// Final result of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The named transport reported success.
    Delivered(Transport),
    /// The serial relay answered but did not report success.
    Rejected,
    /// The serial relay request itself failed.
    Failed(ClientError),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered(_))
    }
}

/// Handle for an in-flight dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTicket {
    seq: u64,
    command: Command,
}

impl DispatchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn command(&self) -> Command {
        self.command
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransportDispatcher {
    next_seq: u64,
    applied: HashMap<ToggleKind, u64>,
}

impl TransportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new dispatch and return its ticket.
    pub fn begin(&mut self, command: Command) -> DispatchTicket {
        self.next_seq += 1;
        DispatchTicket {
            seq: self.next_seq,
            command,
        }
    }

    /// Deliver a command over the transport(s) the current status allows.
    ///
    /// Does not borrow the dispatcher, so several deliveries may be in
    /// flight at once.
    pub async fn deliver<B: Backend>(
        backend: &B,
        command: &Command,
        status: ConnectionStatus,
    ) -> DispatchOutcome {
        if status == ConnectionStatus::Wifi {
            match backend.send_network_command(&command.network_body()).await {
                Ok(ack) if ack.success => {
                    log::info!("{command} delivered via network relay");
                    return DispatchOutcome::Delivered(Transport::NetworkRelay);
                }
                Ok(_) => {
                    log::warn!("Network relay rejected {command}, trying serial relay");
                }
                Err(e) => {
                    log::warn!("Network relay failed for {command}: {e}, trying serial relay");
                }
            }
        }

        match backend.send_serial_command(command).await {
            Ok(ack) if ack.success => {
                log::info!("{command} delivered via serial relay");
                DispatchOutcome::Delivered(Transport::SerialRelay)
            }
            Ok(_) => {
                log::warn!("Serial relay rejected {command}");
                DispatchOutcome::Rejected
            }
            Err(e) => {
                log::warn!("Serial relay failed for {command}: {e}");
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Finish a dispatch, applying the optimistic device update if the
    /// command was delivered and has not been superseded.
    ///
    /// Returns true if `device` was modified.
    pub fn complete(
        &mut self,
        ticket: DispatchTicket,
        outcome: &DispatchOutcome,
        device: &mut DeviceState,
    ) -> bool {
        if !outcome.is_delivered() {
            return false;
        }
        let Some((kind, enable)) = ticket.command.toggle() else {
            return false;
        };
        if let Some(&applied) = self.applied.get(&kind) {
            if applied > ticket.seq {
                log::debug!(
                    "Dropping optimistic update for {} (seq {} superseded by {})",
                    ticket.command,
                    ticket.seq,
                    applied
                );
                return false;
            }
        }
        self.applied.insert(kind, ticket.seq);
        match kind {
            ToggleKind::Auto => device.is_auto = Some(enable),
            ToggleKind::Relay => device.relay_on = Some(enable),
        }
        true
    }

    /// Begin, deliver and complete a single command.
    pub async fn send<B: Backend>(
        &mut self,
        backend: &B,
        command: Command,
        status: ConnectionStatus,
        device: &mut DeviceState,
    ) -> DispatchOutcome {
        let ticket = self.begin(command);
        let outcome = Self::deliver(backend, &command, status).await;
        self.complete(ticket, &outcome, device);
        outcome
    }
}
