//! HTTP client for the telemetry backend API.
//!
//! Works in both native Rust and WASM environments. The engine talks to the
//! backend only through the [`Backend`] trait, so polling and dispatch logic
//! can be driven by scripted fakes in tests.

use serde::{de::DeserializeOwned, Deserialize};

use crate::command::{Command, NetworkCommand};
use crate::http::{HttpReply, HttpTransport};
use crate::types::Snapshot;

/// Error type for backend requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Request could not be completed
    #[error("HTTP error: {0}")]
    Http(String),
    /// Response body was not what the contract promises
    #[error("Parse error: {0}")]
    Parse(String),
    /// Backend answered with a non-success status
    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
}

/// Response of `GET /serial/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SerialStatus {
    #[serde(default)]
    pub connected: bool,
}

/// Response of both command endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CommandAck {
    #[serde(default)]
    pub success: bool,
}

/// The backend operations the dashboard depends on.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Latest reading, or `None` when the backend has no data yet.
    async fn latest_snapshot(&self) -> Result<Option<Snapshot>, ClientError>;

    /// Liveness of the backend's serial link to the device.
    async fn serial_status(&self) -> Result<SerialStatus, ClientError>;

    /// Relay a command token over the device's network link.
    async fn send_network_command(&self, body: &NetworkCommand)
        -> Result<CommandAck, ClientError>;

    /// Relay a command through the backend's local serial port.
    async fn send_serial_command(&self, command: &Command) -> Result<CommandAck, ClientError>;
}

/// Client for the telemetry backend HTTP API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    http: HttpTransport,
}

impl DashboardClient {
    /// Create a new client pointing to the given API root
    /// (e.g. "http://localhost:8080/api").
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            http: HttpTransport::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of the serial-relay endpoint for a command, without query string.
    pub fn control_url(&self, command: &Command) -> String {
        self.url(&format!("/control/{}", command.control_path()))
    }
}

fn check_status(reply: &HttpReply) -> Result<(), ClientError> {
    if reply.is_success() {
        return Ok(());
    }
    let message = if reply.body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        reply.body.clone()
    };
    Err(ClientError::ServerError {
        status: reply.status,
        message,
    })
}

fn parse_body<T: DeserializeOwned>(reply: &HttpReply) -> Result<T, ClientError> {
    serde_json::from_str(&reply.body).map_err(|e| ClientError::Parse(e.to_string()))
}

impl Backend for DashboardClient {
    async fn latest_snapshot(&self) -> Result<Option<Snapshot>, ClientError> {
        let reply = self.http.get(&self.url("/sensor/latest")).await?;
        check_status(&reply)?;
        if reply.status == 204 || reply.body.trim().is_empty() {
            return Ok(None);
        }
        // A JSON `null` body behaves like a reading without a record time.
        let snapshot: Option<Snapshot> = parse_body(&reply)?;
        Ok(Some(snapshot.unwrap_or_default()))
    }

    async fn serial_status(&self) -> Result<SerialStatus, ClientError> {
        let reply = self.http.get(&self.url("/serial/status")).await?;
        check_status(&reply)?;
        parse_body(&reply)
    }

    async fn send_network_command(
        &self,
        body: &NetworkCommand,
    ) -> Result<CommandAck, ClientError> {
        let reply = self.http.post_json(&self.url("/tcp/command"), body).await?;
        check_status(&reply)?;
        parse_body(&reply)
    }

    async fn send_serial_command(&self, command: &Command) -> Result<CommandAck, ClientError> {
        let reply = self
            .http
            .post_query(&self.control_url(command), &command.query_params())
            .await?;
        check_status(&reply)?;
        parse_body(&reply)
    }
}
