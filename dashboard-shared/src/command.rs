//! Device control commands and their encodings for both transports.

use serde::Serialize;

/// Line terminator the device expects on relayed network commands.
pub const COMMAND_TERMINATOR: &str = "\r\n";

/// A user-issued device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch automatic humidity control on or off.
    Auto { enable: bool },
    /// Switch the relay on or off (manual mode).
    Relay { enable: bool },
    /// Set the humidity threshold, in percent.
    Threshold { value: u8 },
}

/// Which locally mirrored toggle a command affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKind {
    Auto,
    Relay,
}

impl Command {
    /// Transport-agnostic device token, e.g. `AUTO=1` or `THR=65`.
    pub fn token(&self) -> String {
        match self {
            Command::Auto { enable } => format!("AUTO={}", u8::from(*enable)),
            Command::Relay { enable } => format!("RELAY={}", u8::from(*enable)),
            Command::Threshold { value } => format!("THR={value}"),
        }
    }

    /// Path segment used by the serial-relay control endpoint.
    pub fn control_path(&self) -> &'static str {
        match self {
            Command::Auto { .. } => "auto",
            Command::Relay { .. } => "relay",
            Command::Threshold { .. } => "threshold",
        }
    }

    /// Raw parameters as query key/value pairs for the serial relay.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Command::Auto { enable } | Command::Relay { enable } => {
                vec![("enable", enable.to_string())]
            }
            Command::Threshold { value } => vec![("value", value.to_string())],
        }
    }

    /// The toggle and target state this command sets, if it mirrors local state.
    pub fn toggle(&self) -> Option<(ToggleKind, bool)> {
        match self {
            Command::Auto { enable } => Some((ToggleKind::Auto, *enable)),
            Command::Relay { enable } => Some((ToggleKind::Relay, *enable)),
            Command::Threshold { .. } => None,
        }
    }

    /// Body for the network-relay endpoint.
    pub fn network_body(&self) -> NetworkCommand {
        NetworkCommand {
            command: format!("{}{COMMAND_TERMINATOR}", self.token()),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

/// JSON body posted to the network relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkCommand {
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(Command::Auto { enable: true }.token(), "AUTO=1");
        assert_eq!(Command::Auto { enable: false }.token(), "AUTO=0");
        assert_eq!(Command::Relay { enable: true }.token(), "RELAY=1");
        assert_eq!(Command::Relay { enable: false }.token(), "RELAY=0");
        assert_eq!(Command::Threshold { value: 65 }.token(), "THR=65");
    }

    #[test]
    fn test_network_body_has_crlf() {
        let body = Command::Relay { enable: true }.network_body();
        assert_eq!(body.command, "RELAY=1\r\n");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"command":"RELAY=1\r\n"}"#
        );
    }

    #[test]
    fn test_serial_relay_params() {
        let auto = Command::Auto { enable: false };
        assert_eq!(auto.control_path(), "auto");
        assert_eq!(auto.query_params(), vec![("enable", "false".to_string())]);

        let thr = Command::Threshold { value: 40 };
        assert_eq!(thr.control_path(), "threshold");
        assert_eq!(thr.query_params(), vec![("value", "40".to_string())]);
    }

    #[test]
    fn test_threshold_has_no_mirrored_toggle() {
        assert_eq!(Command::Threshold { value: 10 }.toggle(), None);
        assert_eq!(
            Command::Relay { enable: true }.toggle(),
            Some((ToggleKind::Relay, true))
        );
    }
}
