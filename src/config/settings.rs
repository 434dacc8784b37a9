//! Endpoint settings and the edits that change them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;
use crate::core::constants::{DEFAULT_RECEIVE_PORT, DEFAULT_SEND_HOST, DEFAULT_SEND_PORT};

/// Receive port and send destination, persisted as JSON.
///
/// Keys missing from the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// UDP port VMC is received on.
    #[serde(rename = "ReceivePort")]
    pub receive_port: u16,
    /// Host the Mop consumer listens on.
    #[serde(rename = "SendIP")]
    pub send_host: String,
    /// Port the Mop consumer listens on.
    #[serde(rename = "SendPort")]
    pub send_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            receive_port: DEFAULT_RECEIVE_PORT,
            send_host: DEFAULT_SEND_HOST.to_string(),
            send_port: DEFAULT_SEND_PORT,
        }
    }
}

/// A single settings change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconfigure {
    /// New inbound port.
    ReceivePort(u16),
    /// New outbound host.
    SendHost(String),
    /// New outbound port.
    SendPort(u16),
}

impl Reconfigure {
    /// Whether this change restarts the inbound transport (otherwise the outbound one).
    pub fn affects_inbound(&self) -> bool {
        matches!(self, Reconfigure::ReceivePort(_))
    }
}

impl fmt::Display for Reconfigure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconfigure::ReceivePort(port) => write!(f, "ReceivePort={port}"),
            Reconfigure::SendHost(host) => write!(f, "SendIP={host}"),
            Reconfigure::SendPort(port) => write!(f, "SendPort={port}"),
        }
    }
}

/// An editable settings field, named as in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    /// `ReceivePort`
    ReceivePort,
    /// `SendIP`
    SendHost,
    /// `SendPort`
    SendPort,
}

impl FromStr for SettingsField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReceivePort" => Ok(Self::ReceivePort),
            "SendIP" => Ok(Self::SendHost),
            "SendPort" => Ok(Self::SendPort),
            other => Err(ConfigError::UnknownField(other.to_string())),
        }
    }
}

impl Settings {
    /// Apply a change. Returns `false` if the value was already set.
    pub fn apply(&mut self, change: &Reconfigure) -> bool {
        match change {
            Reconfigure::ReceivePort(port) => replace(&mut self.receive_port, *port),
            Reconfigure::SendHost(host) => replace(&mut self.send_host, host.clone()),
            Reconfigure::SendPort(port) => replace(&mut self.send_port, *port),
        }
    }

    /// Apply a text edit to one field.
    ///
    /// Port text must be a whole number in `0..=65535`; anything else is
    /// rejected and the settings are left untouched. Returns the change, or
    /// `None` if the field already held that value.
    pub fn apply_edit(
        &mut self,
        field: SettingsField,
        text: &str,
    ) -> Result<Option<Reconfigure>, ConfigError> {
        let change = Self::parse_edit(field, text)?;
        Ok(self.apply(&change).then_some(change))
    }

    /// Parse a text edit without applying it.
    pub fn parse_edit(field: SettingsField, text: &str) -> Result<Reconfigure, ConfigError> {
        Ok(match field {
            SettingsField::ReceivePort => Reconfigure::ReceivePort(parse_port(text)?),
            SettingsField::SendHost => Reconfigure::SendHost(text.to_string()),
            SettingsField::SendPort => Reconfigure::SendPort(parse_port(text)?),
        })
    }

    /// Changes that turn `previous` into `self`.
    pub fn changes_from(&self, previous: &Settings) -> Vec<Reconfigure> {
        let mut changes = Vec::new();
        if self.receive_port != previous.receive_port {
            changes.push(Reconfigure::ReceivePort(self.receive_port));
        }
        if self.send_host != previous.send_host {
            changes.push(Reconfigure::SendHost(self.send_host.clone()));
        }
        if self.send_port != previous.send_port {
            changes.push(Reconfigure::SendPort(self.send_port));
        }
        changes
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn parse_port(text: &str) -> Result<u16, ConfigError> {
    text.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.receive_port, 39539);
        assert_eq!(settings.send_host, "127.0.0.1");
        assert_eq!(settings.send_port, 39540);
    }

    #[test]
    fn test_json_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ReceivePort": 39539,
                "SendIP": "127.0.0.1",
                "SendPort": 39540,
            })
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "SendPort": 5000 }"#).unwrap();
        assert_eq!(settings.send_port, 5000);
        assert_eq!(settings.receive_port, DEFAULT_RECEIVE_PORT);
        assert_eq!(settings.send_host, DEFAULT_SEND_HOST);
    }

    #[test]
    fn test_apply_edit_valid_port() {
        let mut settings = Settings::default();
        let change = settings.apply_edit(SettingsField::ReceivePort, " 40000 ").unwrap();
        assert_eq!(change, Some(Reconfigure::ReceivePort(40000)));
        assert_eq!(settings.receive_port, 40000);

        let change = settings.apply_edit(SettingsField::ReceivePort, "40000").unwrap();
        assert_eq!(change, None);
    }

    #[test]
    fn test_apply_edit_rejects_bad_port() {
        let mut settings = Settings::default();
        for text in ["", "abc", "-1", "65536", "12.5"] {
            let err = settings.apply_edit(SettingsField::SendPort, text).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPort(t) if t == text));
        }
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_apply_edit_host() {
        let mut settings = Settings::default();
        let change = settings.apply_edit(SettingsField::SendHost, "192.168.0.7").unwrap();
        assert_eq!(change, Some(Reconfigure::SendHost("192.168.0.7".into())));
        assert_eq!(settings.send_host, "192.168.0.7");
    }

    #[test]
    fn test_field_names() {
        assert_eq!("SendIP".parse::<SettingsField>().unwrap(), SettingsField::SendHost);
        assert!(matches!(
            "sendip".parse::<SettingsField>(),
            Err(ConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn test_changes_from() {
        let before = Settings::default();
        let mut after = before.clone();
        after.send_host = "10.0.0.2".into();
        after.receive_port = 1234;

        assert_eq!(
            after.changes_from(&before),
            vec![
                Reconfigure::ReceivePort(1234),
                Reconfigure::SendHost("10.0.0.2".into())
            ]
        );
        assert!(before.changes_from(&before).is_empty());
    }

    #[test]
    fn test_reconfigure_scope() {
        assert!(Reconfigure::ReceivePort(1).affects_inbound());
        assert!(!Reconfigure::SendPort(1).affects_inbound());
        assert_eq!(Reconfigure::SendHost("h".into()).to_string(), "SendIP=h");
    }
}
