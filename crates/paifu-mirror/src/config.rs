//! The routing table.
//!
//! A table is a JSON object keyed by fully-qualified message name:
//!
//! ```json
//! {
//!   ".lq.Lobby.fetchGameRecord": {
//!     "request_direction": "outbound",
//!     "action": {"command": "RPUSH", "key": "game-detail"}
//!   },
//!   ".lq.Lobby.heatbeat": {"request_direction": "both", "action": "NOP"}
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use paifu_capture::Direction;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::store::{PushCommand, SetOptions};

// ---------------------------------------------------------------------------
// Direction filter
// ---------------------------------------------------------------------------

/// Which request directions a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    Inbound,
    Outbound,
    Both,
}

impl DirectionFilter {
    pub fn accepts(self, direction: Direction) -> bool {
        match self {
            Self::Inbound => direction == Direction::Inbound,
            Self::Outbound => direction == Direction::Outbound,
            Self::Both => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A store command. Expiry options exist only on `SET`, so they are
/// unknown fields anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", deny_unknown_fields)]
pub enum Command {
    #[serde(rename = "LPUSH")]
    Lpush { key: String },
    #[serde(rename = "LPUSHX")]
    Lpushx { key: String },
    #[serde(rename = "RPUSH")]
    Rpush { key: String },
    #[serde(rename = "RPUSHX")]
    Rpushx { key: String },
    #[serde(rename = "SET")]
    Set {
        key: String,
        /// Expiry in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ex: Option<u64>,
        /// Expiry in milliseconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        px: Option<u64>,
        /// Only set if the key does not exist.
        #[serde(default)]
        nx: bool,
        /// Only set if the key already exists.
        #[serde(default)]
        xx: bool,
    },
}

impl Command {
    pub fn key(&self) -> &str {
        match self {
            Self::Lpush { key }
            | Self::Lpushx { key }
            | Self::Rpush { key }
            | Self::Rpushx { key }
            | Self::Set { key, .. } => key,
        }
    }

    /// The list command, or `None` for `SET`.
    pub fn push_command(&self) -> Option<PushCommand> {
        match self {
            Self::Lpush { .. } => Some(PushCommand::Lpush),
            Self::Lpushx { .. } => Some(PushCommand::Lpushx),
            Self::Rpush { .. } => Some(PushCommand::Rpush),
            Self::Rpushx { .. } => Some(PushCommand::Rpushx),
            Self::Set { .. } => None,
        }
    }

    /// The options of a `SET`, or `None` for the list commands.
    pub fn set_options(&self) -> Option<SetOptions> {
        match *self {
            Self::Set { ex, px, nx, xx, .. } => Some(SetOptions {
                expiry: ex
                    .map(Duration::from_secs)
                    .or(px.map(Duration::from_millis)),
                nx,
                xx,
            }),
            _ => None,
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.key().is_empty() {
            return Err("the key must not be empty".into());
        }
        if let Self::Set { ex, px, nx, xx, .. } = *self {
            if ex.is_some() && px.is_some() {
                return Err("`ex` and `px` are mutually exclusive".into());
            }
            if ex == Some(0) || px == Some(0) {
                return Err("an expiry must be positive".into());
            }
            if nx && xx {
                return Err("`nx` and `xx` are mutually exclusive".into());
            }
        }
        Ok(())
    }
}

/// What to do with a matching exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Drop it without a warning.
    Nop,
    Command(Command),
}

const NOP: &str = "NOP";

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nop => serializer.serialize_str(NOP),
            Self::Command(command) => command.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Keyword(String),
            Command(Command),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Keyword(keyword) if keyword == NOP => Ok(Self::Nop),
            Raw::Keyword(keyword) => Err(de::Error::custom(format!(
                "{keyword}: an action must be \"{NOP}\" or a command object"
            ))),
            Raw::Command(command) => Ok(Self::Command(command)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nop => f.write_str(NOP),
            Self::Command(Command::Lpush { key }) => write!(f, "LPUSH {key}"),
            Self::Command(Command::Lpushx { key }) => write!(f, "LPUSHX {key}"),
            Self::Command(Command::Rpush { key }) => write!(f, "RPUSH {key}"),
            Self::Command(Command::Rpushx { key }) => write!(f, "RPUSHX {key}"),
            Self::Command(Command::Set { key, .. }) => write!(f, "SET {key}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub request_direction: DirectionFilter,
    pub action: Action,
}

/// Rules keyed by fully-qualified message name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorConfig {
    rules: BTreeMap<String, Rule>,
}

impl MirrorConfig {
    /// Builds a table from rules, checking every entry.
    pub fn new(rules: impl IntoIterator<Item = (String, Rule)>) -> Result<Self, ConfigError> {
        let config = Self {
            rules: rules.into_iter().collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and checks a JSON table.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what the JSON shape alone cannot: names and command
    /// options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rule) in &self.rules {
            if name.len() < 2 || !name.starts_with('.') {
                return Err(ConfigError::InvalidName(name.clone()));
            }
            if let Action::Command(command) = &rule.action {
                command.check().map_err(|reason| ConfigError::InvalidAction {
                    name: name.clone(),
                    reason,
                })?;
            }
        }
        Ok(())
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str_reads_every_action() {
        let config = MirrorConfig::from_json_str(
            r#"{
                ".lq.Lobby.fetchGameRecord": {
                    "request_direction": "outbound",
                    "action": {"command": "RPUSH", "key": "game-detail"}
                },
                ".lq.Lobby.heatbeat": {"request_direction": "both", "action": "NOP"},
                ".lq.NotifyAccountUpdate": {
                    "request_direction": "inbound",
                    "action": {"command": "SET", "key": "account", "ex": 60, "nx": true}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(config.rule(".lq.Lobby.heatbeat").unwrap().action, Action::Nop);

        let set = &config.rule(".lq.NotifyAccountUpdate").unwrap().action;
        let Action::Command(command) = set else {
            panic!("expected a command");
        };
        let options = command.set_options().unwrap();
        assert_eq!(options.expiry, Some(Duration::from_secs(60)));
        assert!(options.nx && !options.xx);
        assert_eq!(command.push_command(), None);
    }

    #[test]
    fn test_from_json_str_rejects_unknown_keys() {
        let err = MirrorConfig::from_json_str(
            r#"{".lq.A": {"request_direction": "both", "action": "NOP", "extra": 1}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_str_rejects_expiry_on_push() {
        let err = MirrorConfig::from_json_str(
            r#"{".lq.A": {"request_direction": "both",
                          "action": {"command": "LPUSH", "key": "k", "ex": 5}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_str_rejects_unknown_keyword() {
        let err = MirrorConfig::from_json_str(
            r#"{".lq.A": {"request_direction": "both", "action": "DROP"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_requires_dot_prefixed_names() {
        let err = MirrorConfig::from_json_str(
            r#"{"lq.A": {"request_direction": "both", "action": "NOP"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(ref name) if name == "lq.A"));
    }

    #[test]
    fn test_validate_rejects_conflicting_set_options() {
        let rule = |action| Rule {
            request_direction: DirectionFilter::Both,
            action: Action::Command(action),
        };
        let both = Command::Set {
            key: "k".into(),
            ex: Some(1),
            px: Some(1000),
            nx: false,
            xx: false,
        };
        assert!(matches!(
            MirrorConfig::new([(".lq.A".to_string(), rule(both))]),
            Err(ConfigError::InvalidAction { .. })
        ));
        let flags = Command::Set {
            key: "k".into(),
            ex: None,
            px: None,
            nx: true,
            xx: true,
        };
        assert!(MirrorConfig::new([(".lq.A".to_string(), rule(flags))]).is_err());
    }

    #[test]
    fn test_direction_filter_accepts() {
        assert!(DirectionFilter::Both.accepts(Direction::Inbound));
        assert!(DirectionFilter::Outbound.accepts(Direction::Outbound));
        assert!(!DirectionFilter::Outbound.accepts(Direction::Inbound));
    }

    #[test]
    fn test_action_serializes_back_to_config_shape() {
        assert_eq!(serde_json::to_string(&Action::Nop).unwrap(), "\"NOP\"");
        let push = Action::Command(Command::Rpush { key: "q".into() });
        assert_eq!(
            serde_json::to_string(&push).unwrap(),
            r#"{"command":"RPUSH","key":"q"}"#
        );
        assert_eq!(push.to_string(), "RPUSH q");
    }
}
