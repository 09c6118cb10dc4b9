use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CtlError, Result};

/// Address of the bench device when nothing else is given.
pub const DEFAULT_DEVICE_URL: &str = "ws://192.168.0.156:7777";

/// Commands sent when the CLI is invoked without a subcommand.
pub const DEMO_SEQUENCE: [Command; 4] = [
    Command::SetValue(128),
    Command::GetStatus,
    Command::Enable(true),
    Command::Enable(false),
];

/// A command object as it travels over the wire.
///
/// `SetValue` and `Enable` carry a `value` field, `GetStatus` carries none:
/// `{"command":"setValue","value":128}`, `{"command":"getStatus"}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum Command {
    SetValue(u8),
    GetStatus,
    /// Drives the enable pin high (`true`) or low (`false`).
    Enable(bool),
}

impl Command {
    /// Tag used in the `command` field.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetValue(_) => "setValue",
            Command::GetStatus => "getStatus",
            Command::Enable(_) => "enable",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::SetValue(value) => write!(f, "{} value={}", self.name(), value),
            Command::GetStatus => write!(f, "{}", self.name()),
            Command::Enable(state) => write!(f, "{} value={}", self.name(), state),
        }
    }
}

/// Parses the command-line form: `set-value=128`, `get-status`, `enable`,
/// `disable` or `enable=false`. Wire tags work as names too.
impl FromStr for Command {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Command> {
        let mut parts = s.splitn(2, '=');
        let name = parts.next().unwrap_or_default();
        let value = parts.next();
        match (name, value) {
            ("set-value", Some(v)) | ("setValue", Some(v)) => v
                .parse::<u8>()
                .map(Command::SetValue)
                .map_err(|e| CtlError::InvalidValue(name.to_owned(), format!("{:?} ({})", v, e))),
            ("set-value", None) | ("setValue", None) => Err(CtlError::InvalidValue(
                name.to_owned(),
                "missing value, expected 0-255".to_owned(),
            )),
            ("get-status", None) | ("getStatus", None) => Ok(Command::GetStatus),
            ("enable", None) => Ok(Command::Enable(true)),
            ("disable", None) => Ok(Command::Enable(false)),
            ("enable", Some(v)) => v
                .parse::<bool>()
                .map(Command::Enable)
                .map_err(|e| CtlError::InvalidValue(name.to_owned(), format!("{:?} ({})", v, e))),
            _ => Err(CtlError::UnknownCommand(s.to_owned())),
        }
    }
}

/// The single frame the device sends back. Its content is device-defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    text: String,
}

impl Response {
    pub fn new(text: String) -> Response {
        Response { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Tries to read the reply as JSON. Not every firmware answers in JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.text)?)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_value_has_command_and_value_only() {
        for v in 0..=255u8 {
            let encoded = serde_json::to_string(&Command::SetValue(v)).unwrap();
            assert_eq!(encoded, format!(r#"{{"command":"setValue","value":{}}}"#, v));
        }
    }

    #[test]
    fn enable_carries_a_boolean() {
        for &b in &[true, false] {
            let encoded = serde_json::to_value(&Command::Enable(b)).unwrap();
            assert_eq!(encoded, json!({"command": "enable", "value": b}));
        }
    }

    #[test]
    fn get_status_has_no_value() {
        let encoded = serde_json::to_value(&Command::GetStatus).unwrap();
        let object = encoded.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(!object.contains_key("value"));
        assert_eq!(object["command"], "getStatus");
    }

    #[test]
    fn decode_rejects_out_of_range_and_unknown() {
        let cmd: Command = serde_json::from_str(r#"{"command":"getStatus"}"#).unwrap();
        assert_eq!(cmd, Command::GetStatus);
        let cmd: Command = serde_json::from_str(r#"{"command":"setValue","value":255}"#).unwrap();
        assert_eq!(cmd, Command::SetValue(255));

        assert!(serde_json::from_str::<Command>(r#"{"command":"setValue","value":256}"#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"command":"setValue","value":-1}"#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"command":"enable","value":1}"#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"command":"reboot"}"#).is_err());
    }

    #[test]
    fn parse_command_line_forms() {
        assert_eq!("set-value=128".parse::<Command>().unwrap(), Command::SetValue(128));
        assert_eq!("setValue=0".parse::<Command>().unwrap(), Command::SetValue(0));
        assert_eq!("get-status".parse::<Command>().unwrap(), Command::GetStatus);
        assert_eq!("getStatus".parse::<Command>().unwrap(), Command::GetStatus);
        assert_eq!("enable".parse::<Command>().unwrap(), Command::Enable(true));
        assert_eq!("disable".parse::<Command>().unwrap(), Command::Enable(false));
        assert_eq!("enable=false".parse::<Command>().unwrap(), Command::Enable(false));
    }

    #[test]
    fn parse_errors_are_classified() {
        match "set-value=256".parse::<Command>() {
            Err(CtlError::InvalidValue(name, _)) => assert_eq!(name, "set-value"),
            other => panic!("unexpected: {:?}", other),
        }
        match "set-value".parse::<Command>() {
            Err(CtlError::InvalidValue(..)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        match "enable=yes".parse::<Command>() {
            Err(CtlError::InvalidValue(..)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        match "reboot".parse::<Command>() {
            Err(CtlError::UnknownCommand(s)) => assert_eq!(s, "reboot"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn display_names_the_wire_tag() {
        assert_eq!(Command::SetValue(7).to_string(), "setValue value=7");
        assert_eq!(Command::GetStatus.to_string(), "getStatus");
        assert_eq!(Command::Enable(false).to_string(), "enable value=false");
    }

    #[test]
    fn response_is_opaque_until_asked() {
        let res = Response::new("ready".to_owned());
        assert_eq!(res.as_str(), "ready");
        assert!(res.json().is_err());

        let res = Response::new(r#"{"value":3}"#.to_owned());
        assert_eq!(res.json().unwrap()["value"], 3);
    }
}
