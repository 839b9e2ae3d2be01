//! Error types for schema validation.

use std::fmt;

use paifu_protocol::{ProtocolError, hex};
use paifu_tile::Chang;

/// One field that broke its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// Dotted path to the field, e.g. `hules[0].fu`.
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Where in a game detail a record sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub chang: u32,
    pub ju: u32,
    pub ben: u32,
    /// Message name of the failing record.
    pub header: String,
    /// Position of the record in the detail, from 0.
    pub index: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Chang::from_index(self.chang) {
            Ok(chang) => write!(f, "{chang}")?,
            Err(_) => write!(f, "chang {}", self.chang)?,
        }
        write!(
            f,
            "{}局{}本場, header = {}, index = {}",
            self.ju + 1,
            self.ben,
            self.header,
            self.index
        )
    }
}

fn location_suffix(location: &Option<Location>) -> String {
    location
        .as_ref()
        .map(|l| format!(", {l}"))
        .unwrap_or_default()
}

/// What went wrong inside a game detail.
#[derive(Debug, thiserror::Error)]
pub enum ValidationCause {
    #[error(transparent)]
    Violation(#[from] SchemaViolation),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("an unknown record: {}", hex(.0))]
    UnknownRecord(Vec<u8>),
}

/// A game detail that failed validation, with what is needed to replay
/// the failure offline.
#[derive(Debug, thiserror::Error)]
#[error("Failed to validate the detail of the game {uuid}{}: {cause}", location_suffix(.location))]
pub struct ValidationError {
    /// Empty if the failure happened before the summary was decoded.
    pub uuid: String,
    /// Set for failures inside a round.
    pub location: Option<Location>,
    /// The bytes of the failing message.
    pub raw: Vec<u8>,
    /// A JSON dump of the failing message, or `null` if it did not
    /// decode at all.
    pub json: serde_json::Value,
    #[source]
    pub cause: ValidationCause,
}
