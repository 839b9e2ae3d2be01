//! Process configuration.
//!
//! One [`Config`] is loaded at startup and handed by reference to every
//! component that needs a piece of it. Every section has defaults, so an
//! empty JSON object is a valid configuration:
//!
//! ```json
//! {
//!   "logging": {"filter": "info,paifu_mirror=debug"},
//!   "demux": {"stale_policy": "overwrite"},
//!   "mirror": {
//!     ".lq.Lobby.fetchGameRecord": {
//!       "request_direction": "outbound",
//!       "action": {"command": "RPUSH", "key": "game-detail-list"}
//!     }
//!   },
//!   "archive": {"detail_prefix": "game-detail/%Y/%m/%d"}
//! }
//! ```

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use paifu_mirror::MirrorConfig;
use paifu_protocol::DemuxConfig;
use serde::{Deserialize, Serialize};

use crate::PaifuError;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// How the log subscriber is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive. `RUST_LOG` overrides it when set.
    pub filter: String,

    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}

/// Where the archiver reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// The list the sniffer pushes `fetchGameRecord` exchanges to.
    pub queue_key: String,

    /// Refreshed with the current time after every pop.
    pub heartbeat_key: String,

    /// `strftime` template for raw responses, applied to the game's
    /// start time. The uuid is appended as the last path segment.
    pub detail_prefix: String,

    /// `strftime` template for decoded game records. `None` skips them.
    pub record_prefix: Option<String>,

    /// Run the whole-detail schema validation before storing.
    pub validate: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            queue_key: "game-detail-list".into(),
            heartbeat_key: "archiver.heartbeat".into(),
            detail_prefix: "game-detail/%Y/%m/%d".into(),
            record_prefix: None,
            validate: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logging: LoggingConfig,
    pub demux: DemuxConfig,
    /// Routing rules keyed by message name.
    pub mirror: MirrorConfig,
    pub archive: ArchiveConfig,
}

impl Config {
    /// Reads and checks a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PaifuError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PaifuError::ReadFile {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PaifuError> {
        let config: Self = serde_json::from_str(json).map_err(PaifuError::Config)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what deserialization alone cannot.
    pub fn validate(&self) -> Result<(), PaifuError> {
        self.mirror.validate()?;
        let archive = &self.archive;
        for (field, value) in [
            ("queue_key", &archive.queue_key),
            ("heartbeat_key", &archive.heartbeat_key),
            ("detail_prefix", &archive.detail_prefix),
        ] {
            if value.trim_end_matches('/').is_empty() {
                return Err(PaifuError::InvalidConfig(format!(
                    "archive.{field} must not be empty"
                )));
            }
        }
        for template in std::iter::once(&archive.detail_prefix).chain(&archive.record_prefix) {
            if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
                return Err(PaifuError::InvalidConfig(format!(
                    "{template}: an invalid key template"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paifu_protocol::StalePolicy;

    use super::*;

    #[test]
    fn test_from_json_str_empty_object_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.mirror.is_empty());
        assert!(config.archive.validate);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_from_json_str_reads_sections() {
        let config = Config::from_json_str(
            r#"{
                "logging": {"filter": "debug", "json": true},
                "demux": {"stale_policy": "reject"},
                "mirror": {
                    ".lq.Lobby.fetchGameRecord": {
                        "request_direction": "outbound",
                        "action": {"command": "RPUSH", "key": "game-detail-list"}
                    }
                },
                "archive": {"record_prefix": "game-record/%Y", "validate": false}
            }"#,
        )
        .unwrap();
        assert!(config.logging.json);
        assert_eq!(config.demux.stale_policy, StalePolicy::Reject);
        assert_eq!(config.mirror.len(), 1);
        assert_eq!(config.archive.record_prefix.as_deref(), Some("game-record/%Y"));
        assert!(!config.archive.validate);
        assert_eq!(config.archive.queue_key, "game-detail-list");
    }

    #[test]
    fn test_from_json_str_rejects_unknown_section() {
        let err = Config::from_json_str(r#"{"s3": {}}"#).unwrap_err();
        assert!(matches!(err, PaifuError::Config(_)));
    }

    #[test]
    fn test_from_json_str_checks_mirror_rules() {
        let err = Config::from_json_str(
            r#"{"mirror": {"lq.A": {"request_direction": "both", "action": "NOP"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PaifuError::MirrorConfig(_)));
    }

    #[test]
    fn test_from_json_str_rejects_empty_prefix() {
        let err = Config::from_json_str(r#"{"archive": {"detail_prefix": "//"}}"#).unwrap_err();
        assert!(err.to_string().contains("archive.detail_prefix"));
    }

    #[test]
    fn test_from_json_str_rejects_bad_key_template() {
        let err = Config::from_json_str(r#"{"archive": {"record_prefix": "record/%Q"}}"#)
            .unwrap_err();
        assert!(matches!(err, PaifuError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Config::from_path("/nonexistent/paifu.json").unwrap_err();
        assert!(matches!(err, PaifuError::ReadFile { .. }));
    }
}
